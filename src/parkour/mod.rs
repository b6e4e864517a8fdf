//! Parkour domain: vaulting, layered on top of the movement controller.
//!
//! The vault reads the movement controller's ground state and orientation and
//! drives crouching through the same `begin_crouch`/`end_crouch` transitions the
//! crouch control uses.

mod systems;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::MovementSet;
use crate::parkour::systems::{
    attach_parkour, detect_vaultable, track_vault_airborne, try_vault, update_parkour_timers,
};

pub use systems::vault_offset;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct ParkourTuning {
    pub vault_speed: f32,
    /// Length of the forward ray looking for a vaultable obstacle.
    pub vault_check_distance: f32,
    /// How far below the body centre the vault ray starts.
    pub vault_ray_drop: f32,
    /// Upward part of the warp direction, relative to the unit forward part.
    pub vault_lift: f32,
    /// Time after leaving the ground before the tuck is released.
    pub vault_recover_delay: f32,
}

impl Default for ParkourTuning {
    fn default() -> Self {
        Self {
            vault_speed: 5.0,
            vault_check_distance: 0.75,
            vault_ray_drop: 0.7,
            vault_lift: 7.5,
            vault_recover_delay: 1.0,
        }
    }
}

/// Parkour sensing, attached next to the movement components.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ParkourState {
    pub vaultable: bool,
}

/// Delayed actions owned by the parkour controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkourTimer {
    VaultRecover,
}

pub struct ParkourPlugin;

impl Plugin for ParkourPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParkourTuning>()
            .add_systems(
                Update,
                (attach_parkour, detect_vaultable, try_vault)
                    .chain()
                    .after(MovementSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                (
                    update_parkour_timers.in_set(MovementSet::Sense),
                    track_vault_airborne.in_set(MovementSet::Act),
                ),
            );
    }
}
