//! Status effects - Timed modifiers tracked per combatant
//!
//! Effects store absolute timestamps on the engine clock, so they stay
//! correct under any tick rate. This module only tracks timers; the side
//! effects of applying and removing an effect live in the combat engine.

use crate::types::StatusEffectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An active status effect on a combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: StatusEffectKind,
    /// Engine time of the first application (not moved by refreshes)
    pub applied_at: u64,
    pub expires_at: u64,
    pub magnitude: f64,
    /// Next periodic damage instant, for poison and burn
    pub next_tick_at: u64,
}

impl ActiveEffect {
    /// Time left before expiry
    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

/// Outcome of applying an effect to a set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// A new entry was created; its on-apply hook should fire
    Applied,
    /// An existing entry was refreshed in place
    Refreshed { previous_magnitude: f64 },
}

/// Per-combatant set of effects, at most one entry per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectSet {
    entries: BTreeMap<StatusEffectKind, ActiveEffect>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect or refresh the existing one of the same kind.
    /// Refreshing replaces duration and magnitude but keeps the tick cadence.
    pub fn apply(
        &mut self,
        kind: StatusEffectKind,
        now: u64,
        duration_ms: u64,
        magnitude: f64,
        tick_ms: u64,
    ) -> ApplyOutcome {
        let expires_at = now.saturating_add(duration_ms);
        match self.entries.get_mut(&kind) {
            Some(existing) => {
                let previous_magnitude = existing.magnitude;
                existing.expires_at = expires_at;
                existing.magnitude = magnitude;
                ApplyOutcome::Refreshed { previous_magnitude }
            }
            None => {
                self.entries.insert(
                    kind,
                    ActiveEffect {
                        kind,
                        applied_at: now,
                        expires_at,
                        magnitude,
                        next_tick_at: now.saturating_add(tick_ms.max(1)),
                    },
                );
                ApplyOutcome::Applied
            }
        }
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&ActiveEffect> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: StatusEffectKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn remove(&mut self, kind: StatusEffectKind) -> Option<ActiveEffect> {
        self.entries.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.entries.values()
    }

    /// Advance damage-over-time cadences up to `now`.
    ///
    /// Returns how many ticks each poison/burn entry owes: one per tick
    /// instant that is at or before `now` and strictly before expiry.
    pub fn collect_dot_ticks(&mut self, now: u64, tick_ms: u64) -> Vec<(StatusEffectKind, u32)> {
        let step = tick_ms.max(1);
        let mut due = Vec::new();
        for effect in self.entries.values_mut() {
            if !effect.kind.is_damage_over_time() {
                continue;
            }
            let mut ticks = 0;
            while effect.next_tick_at <= now && effect.next_tick_at < effect.expires_at {
                ticks += 1;
                effect.next_tick_at += step;
            }
            if ticks > 0 {
                due.push((effect.kind, ticks));
            }
        }
        due
    }

    /// Remove and return every effect whose expiry is at or before `now`
    pub fn take_expired(&mut self, now: u64) -> Vec<ActiveEffect> {
        let expired: Vec<StatusEffectKind> = self
            .entries
            .values()
            .filter(|e| e.expires_at <= now)
            .map(|e| e.kind)
            .collect();
        expired
            .into_iter()
            .filter_map(|kind| self.entries.remove(&kind))
            .collect()
    }

    /// Remove and return every effect
    pub fn drain(&mut self) -> Vec<ActiveEffect> {
        std::mem::take(&mut self.entries).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_refresh_replaces_duration() {
        let mut set = EffectSet::new();
        assert_eq!(
            set.apply(StatusEffectKind::Slow, 0, 3000, 0.3, 1000),
            ApplyOutcome::Applied
        );
        let outcome = set.apply(StatusEffectKind::Slow, 2000, 3000, 0.5, 1000);
        assert_eq!(outcome, ApplyOutcome::Refreshed { previous_magnitude: 0.3 });

        assert_eq!(set.len(), 1);
        let slow = set.get(StatusEffectKind::Slow).unwrap();
        // Remaining equals the second duration, not the sum
        assert_eq!(slow.remaining_ms(2000), 3000);
        assert!((slow.magnitude - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dot_ticks_once_per_window() {
        let mut set = EffectSet::new();
        set.apply(StatusEffectKind::Poison, 0, 5000, 0.0, 1000);

        assert!(set.collect_dot_ticks(999, 1000).is_empty());
        assert_eq!(set.collect_dot_ticks(1000, 1000), vec![(StatusEffectKind::Poison, 1)]);
        assert!(set.collect_dot_ticks(1500, 1000).is_empty());
        // A long frame covers two windows
        assert_eq!(set.collect_dot_ticks(3200, 1000), vec![(StatusEffectKind::Poison, 2)]);
        // The instant at expiry does not tick
        assert_eq!(set.collect_dot_ticks(6000, 1000), vec![(StatusEffectKind::Poison, 1)]);
    }

    #[test]
    fn test_refresh_keeps_cadence() {
        let mut set = EffectSet::new();
        set.apply(StatusEffectKind::Burn, 0, 3000, 0.0, 1000);
        set.apply(StatusEffectKind::Burn, 1500, 3000, 0.0, 1000);
        // Next tick is still at 2000, not 2500
        assert_eq!(set.collect_dot_ticks(2000, 1000), vec![(StatusEffectKind::Burn, 2)]);
        assert_eq!(set.get(StatusEffectKind::Burn).unwrap().expires_at, 4500);
    }

    #[test]
    fn test_non_dot_effects_never_tick() {
        let mut set = EffectSet::new();
        set.apply(StatusEffectKind::Stun, 0, 2000, 0.0, 1000);
        assert!(set.collect_dot_ticks(1500, 1000).is_empty());
    }

    #[test]
    fn test_take_expired() {
        let mut set = EffectSet::new();
        set.apply(StatusEffectKind::Stun, 0, 2000, 0.0, 1000);
        set.apply(StatusEffectKind::Slow, 0, 3000, 0.3, 1000);

        assert!(set.take_expired(1999).is_empty());
        let expired = set.take_expired(2000);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, StatusEffectKind::Stun);
        assert!(set.contains(StatusEffectKind::Slow));

        assert_eq!(set.drain().len(), 1);
        assert!(set.is_empty());
    }

    proptest! {
        #[test]
        fn prop_dot_ticks_bounded_by_windows(
            duration in 1u64..20_000,
            steps in prop::collection::vec(1u64..2_500, 1..40),
        ) {
            let mut set = EffectSet::new();
            set.apply(StatusEffectKind::Poison, 0, duration, 0.0, 1000);

            let mut now = 0;
            let mut total = 0;
            for step in steps {
                now += step;
                for (_, ticks) in set.collect_dot_ticks(now, 1000) {
                    total += ticks as u64;
                }
                // Never more ticks than completed windows
                prop_assert!(total <= now / 1000);
            }
            // Never more ticks than fit inside the lifetime
            prop_assert!(total <= (duration - 1) / 1000);
        }
    }
}
