//! Movement domain: player bootstrap.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::movement::{
    ControllerTimers, GameLayer, GroundContact, LookState, Motor, MovementState, MovementTimer,
    MovementTuning, Orientation, Player, PlayerCamera, StandingScale, WallContact,
};

/// Spawns the player body and its first-person camera.
pub(crate) fn spawn_player(mut commands: Commands, tuning: Res<MovementTuning>) {
    let mut timers = ControllerTimers::<MovementTimer>::default();
    timers.schedule(MovementTimer::JumpRearm, tuning.spawn_jump_delay);

    let standing_scale = Vec3::ONE;
    let capsule_length = (tuning.body_height - 2.0 * tuning.body_radius).max(0.0);

    let player = commands
        .spawn((
            // Identity & Movement
            (
                Player,
                MovementState::default(),
                GroundContact::default(),
                WallContact::default(),
                Orientation::default(),
                LookState::default(),
                timers,
                Motor::default(),
                StandingScale(standing_scale),
            ),
            Transform::from_xyz(0.0, tuning.body_height, 0.0).with_scale(standing_scale),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::capsule(tuning.body_radius, capsule_length),
                LockedAxes::ROTATION_LOCKED,
                Mass(tuning.body_mass),
                LinearVelocity::default(),
                GravityScale(1.0),
                Friction::new(0.0),
                CollisionLayers::new(
                    GameLayer::Player,
                    [
                        GameLayer::Default,
                        GameLayer::Ground,
                        GameLayer::Wall,
                        GameLayer::Vaultable,
                    ],
                ),
            ),
        ))
        .id();

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, tuning.body_height + tuning.eye_height, 0.0),
        PlayerCamera { target: player },
    ));

    info!(
        "Spawned player: walk={}, run={}, max_speed={}, jump_force={}, max_slope={}",
        tuning.walk_speed,
        tuning.run_speed,
        tuning.max_speed,
        tuning.jump_force,
        tuning.max_slope_angle
    );
}

/// Locks and hides the cursor for mouse look.
pub(crate) fn lock_cursor(mut cursor_options: Query<&mut CursorOptions, With<Window>>) {
    if let Ok(mut cursor) = cursor_options.single_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}
