//! Account queries, opening, retyping and closing.

mod service;

pub use service::AccountService;
