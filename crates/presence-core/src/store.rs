//! Occupancy store: single source of truth for user presence

use crate::user::{PresenceState, Transition, User};
use dashmap::DashMap;
use thiserror::Error;

/// Errors from occupancy store operations
#[derive(Error, Debug)]
pub enum PresenceError {
    /// No user with the given id exists in the roster
    #[error("No user exists with ID {0}")]
    UnknownUser(String),

    /// State value outside {home, away}
    #[error("Invalid user state \"{0}\" provided - state must be either \"home\" or \"away\"")]
    InvalidState(String),
}

/// Thread-safe store of every known user's presence state
///
/// The roster is fixed at construction; only each user's `state` field
/// changes afterwards. Per-user mutations are atomic: the read of the old
/// state and the write of the new one happen under the same entry guard, so
/// two concurrent updates for the same user cannot observe the same
/// previous state.
pub struct OccupancyStore {
    /// Users keyed by id
    users: DashMap<String, User>,
    /// Roster insertion order, for stable listing
    order: Vec<String>,
}

impl OccupancyStore {
    /// Build a store from the configured roster
    #[must_use]
    pub fn new(roster: Vec<User>) -> Self {
        let users = DashMap::with_capacity(roster.len());
        let mut order = Vec::with_capacity(roster.len());

        for user in roster {
            if users.contains_key(&user.id) {
                tracing::warn!("Duplicate roster entry for user {}, skipping", user.id);
                continue;
            }
            order.push(user.id.clone());
            users.insert(user.id.clone(), user);
        }

        Self { users, order }
    }

    /// Look up a user by id
    #[must_use]
    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|r| r.value().clone())
    }

    /// All users in roster insertion order
    #[must_use]
    pub fn list_users(&self) -> Vec<User> {
        self.order
            .iter()
            .filter_map(|id| self.users.get(id).map(|r| r.value().clone()))
            .collect()
    }

    /// Update a user's presence state
    ///
    /// Both inputs are re-validated here regardless of what the HTTP layer
    /// already checked. Nothing is mutated on any error. The returned
    /// [`Transition`] captures the state before and after the write; callers
    /// must treat `previous == current` as a no-op and skip rule evaluation.
    pub fn set_state(&self, id: &str, state: &str) -> Result<Transition, PresenceError> {
        // Unknown id is checked first, then the state literal; nothing is
        // written until both pass
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| PresenceError::UnknownUser(id.to_string()))?;

        let current: PresenceState = state.parse()?;

        let previous = entry.state;
        entry.state = current;
        let user = entry.value().clone();
        drop(entry);

        Ok(Transition {
            user,
            previous,
            current,
        })
    }

    /// Count users currently in the given state
    ///
    /// Always a fresh O(n) scan; the count is never cached, so it cannot
    /// drift from the per-user records.
    #[must_use]
    pub fn count_by_state(&self, state: PresenceState) -> usize {
        self.users.iter().filter(|r| r.state == state).count()
    }

    /// Count users currently home
    #[must_use]
    pub fn count_home(&self) -> usize {
        self.count_by_state(PresenceState::Home)
    }
}
