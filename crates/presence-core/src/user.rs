//! User and presence state models

use serde::{Deserialize, Serialize};

/// Presence state of a single user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    Home,
    Away,
}

impl std::fmt::Display for PresenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
        }
    }
}

impl std::str::FromStr for PresenceState {
    type Err = crate::store::PresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "away" => Ok(Self::Away),
            other => Err(crate::store::PresenceError::InvalidState(other.to_string())),
        }
    }
}

/// A tracked member of the household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (immutable after startup)
    pub id: String,
    /// Display name
    pub name: String,
    /// Current presence state
    pub state: PresenceState,
}

/// A single user's observed state change
///
/// Produced by [`crate::OccupancyStore::set_state`] after the mutation has
/// been applied; `user` is a snapshot of the post-mutation record.
#[derive(Debug, Clone)]
pub struct Transition {
    pub user: User,
    pub previous: PresenceState,
    pub current: PresenceState,
}

impl Transition {
    /// The update did not actually change the state
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}
