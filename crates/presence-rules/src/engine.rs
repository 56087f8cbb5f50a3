//! Transition evaluation

use crate::model::{LightCommand, LightSets};
use presence_core::{OccupancyStore, PresenceState, Transition};
use std::sync::Arc;

/// Decides which lighting commands follow a presence transition
///
/// The engine keeps no state of its own: every evaluation re-queries the
/// occupancy store, so the aggregate count can never drift from the per-user
/// records. The caller must invoke `evaluate` only after the triggering
/// mutation has been applied to the store.
pub struct PresenceRuleEngine {
    store: Arc<OccupancyStore>,
    lights: LightSets,
}

impl PresenceRuleEngine {
    /// Create an engine over the given store and light configuration
    #[must_use]
    pub fn new(store: Arc<OccupancyStore>, lights: LightSets) -> Self {
        Self { store, lights }
    }

    /// Evaluate a transition, returning the commands to issue in order
    #[must_use]
    pub fn evaluate(&self, transition: &Transition) -> Vec<LightCommand> {
        // Spurious re-submission of the current state; nothing to do
        if transition.is_noop() {
            return Vec::new();
        }

        match (transition.previous, transition.current) {
            (PresenceState::Home, PresenceState::Away) => self.on_departure(transition),
            (PresenceState::Away, PresenceState::Home) => self.on_arrival(transition),
            // Unreachable with a two-value state and the no-op guard above,
            // but kept total so a new state variant cannot silently fire
            _ => {
                tracing::debug!(
                    "Transition for user {} changed nothing of interest",
                    transition.user.id
                );
                Vec::new()
            }
        }
    }

    /// A user left; if the house is now empty, shut everything off
    fn on_departure(&self, transition: &Transition) -> Vec<LightCommand> {
        let home_count = self.store.count_home();
        if home_count > 0 {
            tracing::debug!(
                "User {} left, {} still home - leaving lights alone",
                transition.user.id,
                home_count
            );
            return Vec::new();
        }

        tracing::debug!("All users have left - shutting lights off");
        self.lights
            .last_out()
            .iter()
            .map(|&light_id| LightCommand {
                light_id,
                on: false,
            })
            .collect()
    }

    /// A user arrived; if they are the first one home, turn the lights on
    fn on_arrival(&self, transition: &Transition) -> Vec<LightCommand> {
        let home_count = self.store.count_home();
        if home_count != 1 {
            tracing::debug!(
                "User {} arrived but {} users are home - lights presumed on already",
                transition.user.id,
                home_count
            );
            return Vec::new();
        }

        tracing::debug!("This is the first user to come home - turning on the lights");
        self.lights
            .first_in()
            .iter()
            .map(|&light_id| LightCommand { light_id, on: true })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::User;

    fn store(states: &[(&str, PresenceState)]) -> Arc<OccupancyStore> {
        let roster = states
            .iter()
            .map(|(id, state)| User {
                id: (*id).to_string(),
                name: (*id).to_string(),
                state: *state,
            })
            .collect();
        Arc::new(OccupancyStore::new(roster))
    }

    fn engine(store: &Arc<OccupancyStore>) -> PresenceRuleEngine {
        PresenceRuleEngine::new(
            Arc::clone(store),
            LightSets::new(vec![4, 7, 8, 9], vec![4, 7, 8, 9]),
        )
    }

    #[test]
    fn noop_transition_emits_nothing() {
        let store = store(&[("a", PresenceState::Home)]);
        let engine = engine(&store);

        let transition = store.set_state("a", "home").unwrap();
        assert!(transition.is_noop());
        assert!(engine.evaluate(&transition).is_empty());
    }

    #[test]
    fn last_user_leaving_turns_all_configured_lights_off() {
        let store = store(&[("a", PresenceState::Home), ("b", PresenceState::Away)]);
        let engine = engine(&store);

        let transition = store.set_state("a", "away").unwrap();
        let commands = engine.evaluate(&transition);

        let expected: Vec<LightCommand> = [4, 7, 8, 9]
            .iter()
            .map(|&light_id| LightCommand {
                light_id,
                on: false,
            })
            .collect();
        assert_eq!(commands, expected);
    }

    #[test]
    fn departure_with_someone_still_home_emits_nothing() {
        let store = store(&[("a", PresenceState::Home), ("b", PresenceState::Home)]);
        let engine = engine(&store);

        let transition = store.set_state("a", "away").unwrap();
        assert!(engine.evaluate(&transition).is_empty());
    }

    #[test]
    fn first_arrival_turns_configured_lights_on() {
        let store = store(&[("a", PresenceState::Away), ("b", PresenceState::Away)]);
        let engine = engine(&store);

        let transition = store.set_state("b", "home").unwrap();
        let commands = engine.evaluate(&transition);

        let expected: Vec<LightCommand> = [4, 7, 8, 9]
            .iter()
            .map(|&light_id| LightCommand { light_id, on: true })
            .collect();
        assert_eq!(commands, expected);
    }

    #[test]
    fn second_arrival_emits_nothing() {
        let store = store(&[("a", PresenceState::Home), ("b", PresenceState::Away)]);
        let engine = engine(&store);

        let transition = store.set_state("b", "home").unwrap();
        assert!(engine.evaluate(&transition).is_empty());
    }

    #[test]
    fn asymmetric_light_sets_are_respected() {
        let store = store(&[("a", PresenceState::Home)]);
        let engine = PresenceRuleEngine::new(
            Arc::clone(&store),
            LightSets::new((1..=11).collect(), vec![4, 7, 8, 9]),
        );

        let departure = store.set_state("a", "away").unwrap();
        let off = engine.evaluate(&departure);
        assert_eq!(off.len(), 11);
        assert!(off.iter().all(|c| !c.on));
        assert_eq!(off[0].light_id, 1);
        assert_eq!(off[10].light_id, 11);

        let arrival = store.set_state("a", "home").unwrap();
        let on = engine.evaluate(&arrival);
        assert_eq!(on.len(), 4);
        assert!(on.iter().all(|c| c.on));
    }

    #[test]
    fn commands_emitted_in_ascending_light_id_order() {
        let store = store(&[("a", PresenceState::Home)]);
        let engine = PresenceRuleEngine::new(
            Arc::clone(&store),
            LightSets::new(vec![9, 4, 8, 7], vec![]),
        );

        let transition = store.set_state("a", "away").unwrap();
        let ids: Vec<u32> = engine
            .evaluate(&transition)
            .iter()
            .map(|c| c.light_id)
            .collect();
        assert_eq!(ids, vec![4, 7, 8, 9]);
    }

    #[test]
    fn departure_then_arrival_round_trip() {
        // Roster A home / B away, both light sets [4,7,8,9]
        let store = store(&[("A", PresenceState::Home), ("B", PresenceState::Away)]);
        let engine = engine(&store);

        let departure = store.set_state("A", "away").unwrap();
        assert_eq!(store.count_home(), 0);
        let off: Vec<(u32, bool)> = engine
            .evaluate(&departure)
            .iter()
            .map(|c| (c.light_id, c.on))
            .collect();
        assert_eq!(off, vec![(4, false), (7, false), (8, false), (9, false)]);

        let arrival = store.set_state("B", "home").unwrap();
        assert_eq!(store.count_home(), 1);
        let on: Vec<(u32, bool)> = engine
            .evaluate(&arrival)
            .iter()
            .map(|c| (c.light_id, c.on))
            .collect();
        assert_eq!(on, vec![(4, true), (7, true), (8, true), (9, true)]);
    }
}
