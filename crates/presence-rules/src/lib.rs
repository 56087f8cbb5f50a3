//! Presence rule engine
//!
//! Maps user presence transitions to lighting commands: the last occupant
//! leaving turns a configured set of lights off, the first occupant arriving
//! turns a second configured set on.

pub mod engine;
pub mod model;

pub use engine::PresenceRuleEngine;
pub use model::{LightCommand, LightSets};
