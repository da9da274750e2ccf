//! Session transition events.

pub mod bus;

pub use bus::EventBus;
