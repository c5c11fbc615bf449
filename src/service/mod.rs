//! Service Layer
//!
//! The async facade callers use; owns transaction boundaries.

mod ordering_service;

#[cfg(test)]
mod tests;

pub use ordering_service::OrderingService;
