//! Presence tracking core
//!
//! This crate owns the household roster: who is known to the system and
//! whether each person is currently home or away. All mutation goes through
//! the [`OccupancyStore`].

pub mod store;
pub mod user;

pub use store::{OccupancyStore, PresenceError};
pub use user::{PresenceState, Transition, User};
