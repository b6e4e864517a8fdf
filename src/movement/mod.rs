//! Movement domain: first-person locomotion on a dynamic rigid body.

mod bootstrap;
mod components;
#[cfg(feature = "dev-tools")]
mod dev;
pub mod look;
mod resources;
pub mod sensors;
pub mod shaper;
pub mod state;
mod systems;
#[cfg(test)]
mod tests;
mod timers;

pub use components::{
    GameLayer, GroundContact, LookState, Motor, MovementState, Orientation, Player, PlayerCamera,
    StandingScale, WallContact, WallSide,
};
pub use resources::{MovementInput, MovementTuning};
pub use state::{CrouchKind, Locomotion};
pub use timers::{ControllerTimers, MovementTimer};

use bevy::prelude::*;

use crate::movement::bootstrap::{lock_cursor, spawn_player};
use crate::movement::systems::{
    apply_head_bob, apply_locomotion, apply_mouse_look, consume_input_edges, detect_ground,
    detect_walls, follow_camera, read_input, resolve_motor, update_timers, update_wallrun_tilt,
};

/// Ordering anchors for systems that hook into the controller.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovementSet {
    /// Update: input sampling and mouse look.
    Input,
    /// Update: wall rays. FixedUpdate: timers and ground contacts.
    Sense,
    /// FixedUpdate: state transitions and forces.
    Act,
    /// FixedUpdate: fold forces into velocity, then drop consumed input edges.
    Resolve,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .configure_sets(Update, (MovementSet::Input, MovementSet::Sense).chain())
            .configure_sets(
                FixedUpdate,
                (MovementSet::Sense, MovementSet::Act, MovementSet::Resolve).chain(),
            )
            .add_systems(Startup, (spawn_player, lock_cursor))
            .add_systems(
                Update,
                (
                    (read_input, apply_mouse_look)
                        .chain()
                        .in_set(MovementSet::Input),
                    (detect_walls, update_wallrun_tilt)
                        .chain()
                        .in_set(MovementSet::Sense),
                    follow_camera.after(MovementSet::Sense),
                ),
            )
            .add_systems(
                FixedUpdate,
                (
                    (update_timers, detect_ground)
                        .chain()
                        .in_set(MovementSet::Sense),
                    (apply_locomotion, apply_head_bob)
                        .chain()
                        .in_set(MovementSet::Act),
                    (resolve_motor, consume_input_edges)
                        .chain()
                        .in_set(MovementSet::Resolve),
                ),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_test_course);
    }
}
