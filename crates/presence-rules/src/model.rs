//! Data models for the rule engine

use serde::{Deserialize, Serialize};

/// A single lighting instruction for the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightCommand {
    /// Bridge-assigned light identifier
    pub light_id: u32,
    /// Desired on/off state
    pub on: bool,
}

/// The two deployment-configured light groups the engine acts on
///
/// The groups are independent; deployments commonly turn off more lights on
/// departure than they turn on for an arrival.
#[derive(Debug, Clone)]
pub struct LightSets {
    last_out: Vec<u32>,
    first_in: Vec<u32>,
}

impl LightSets {
    /// Build the light sets, normalizing each to ascending unique ids
    ///
    /// Command emission order follows this ordering.
    #[must_use]
    pub fn new(mut last_out: Vec<u32>, mut first_in: Vec<u32>) -> Self {
        last_out.sort_unstable();
        last_out.dedup();
        first_in.sort_unstable();
        first_in.dedup();
        Self { last_out, first_in }
    }

    /// Lights to turn off when the last occupant leaves
    #[must_use]
    pub fn last_out(&self) -> &[u32] {
        &self.last_out
    }

    /// Lights to turn on when the first occupant arrives
    #[must_use]
    pub fn first_in(&self) -> &[u32] {
        &self.first_in
    }
}
