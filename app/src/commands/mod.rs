//! Command handlers.

pub mod history;
pub mod scan;
pub mod session;
