//! Customer registration, authentication and lookups.

mod service;

pub use service::{CustomerService, Registration};
