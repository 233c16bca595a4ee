//! Read access to transaction and transfer history.

mod service;

pub use service::HistoryService;
