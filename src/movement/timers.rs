//! Movement domain: per-controller table of fire-once delayed actions.

use std::time::Duration;

use bevy::prelude::*;

/// Delayed actions owned by the movement controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementTimer {
    /// Ground contact lost for long enough to go airborne.
    Unground,
    /// Post-jump cooldown. Ground contact never shortcuts it.
    JumpCooldown,
    /// Generic jump re-arm (spawn delay). Cancelled by ground contact.
    JumpRearm,
    CrouchRearm,
}

/// Small keyed table of one-shot timers, polled once per fixed step.
///
/// Scheduling a key that is already pending replaces it, so re-scheduling is the
/// same as cancel-then-schedule.
#[derive(Component, Debug, Clone)]
pub struct ControllerTimers<K: Copy + Eq + Send + Sync + 'static> {
    entries: Vec<(K, Timer)>,
}

impl<K: Copy + Eq + Send + Sync + 'static> Default for ControllerTimers<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Send + Sync + 'static> ControllerTimers<K> {
    pub fn schedule(&mut self, key: K, delay_secs: f32) {
        let timer = Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = timer,
            None => self.entries.push((key, timer)),
        }
    }

    /// Returns true if a pending timer was removed.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn remaining_secs(&self, key: K) -> Option<f32> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, t)| t.remaining_secs())
    }

    /// Advances every pending timer and returns the keys that fired, in the
    /// order they were scheduled. Fired entries are removed.
    pub fn tick(&mut self, delta: Duration) -> Vec<K> {
        let mut fired = Vec::new();
        for (key, timer) in &mut self.entries {
            timer.tick(delta);
            if timer.remaining().is_zero() {
                fired.push(*key);
            }
        }
        self.entries.retain(|(_, timer)| !timer.remaining().is_zero());
        fired
    }
}
