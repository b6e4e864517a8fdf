//! Movement domain: locomotion systems for timers and physics.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::look::update_head_bob;
use crate::movement::state::{Locomotor, apply_timer};
use crate::movement::{
    ControllerTimers, GroundContact, LookState, Motor, MovementInput, MovementState,
    MovementTimer, MovementTuning, Orientation, Player, StandingScale, WallContact,
};

pub(crate) fn update_timers(
    time: Res<Time>,
    mut query: Query<
        (
            &mut ControllerTimers<MovementTimer>,
            &mut MovementState,
            &mut GroundContact,
        ),
        With<Player>,
    >,
) {
    for (mut timers, mut state, mut ground) in &mut query {
        for key in timers.tick(time.delta()) {
            apply_timer(key, &mut state, &mut ground);
        }
    }
}

/// One physics step of the locomotion controller: edge-triggered actions,
/// wall-running, slide decay and the drive force.
pub(crate) fn apply_locomotion(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &mut MovementState,
            &mut ControllerTimers<MovementTimer>,
            &GroundContact,
            &WallContact,
            &Orientation,
            &mut LinearVelocity,
            &mut Motor,
            &mut Transform,
            &StandingScale,
            &mut GravityScale,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (
        mut state,
        mut timers,
        ground,
        walls,
        orientation,
        mut velocity,
        mut motor,
        mut transform,
        standing,
        mut gravity,
    ) in &mut query
    {
        state.sprinting = input.sprint_held;

        let mut locomotor = Locomotor {
            state: &mut state,
            timers: &mut timers,
            ground,
            walls,
            orientation,
            velocity: &mut velocity.0,
            motor: &mut motor,
            scale: &mut transform.scale,
            standing_scale: standing.0,
            tuning: &tuning,
            dt,
        };

        if input.jump_just_pressed {
            locomotor.try_jump();
        }
        if input.crouch_just_pressed {
            locomotor.press_crouch();
        }
        if input.crouch_just_released {
            locomotor.release_crouch();
        }
        if input.wallrun_just_released {
            locomotor.release_wallrun();
        }
        locomotor.state.wallrun_held = input.wallrun_held;

        locomotor.wallrun();
        locomotor.update_slide();
        locomotor.drive(input.axis);

        gravity.0 = state.gravity_scale();
    }
}

/// Folds the step's accumulated forces into the body velocity.
pub(crate) fn resolve_motor(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&mut Motor, &mut LinearVelocity), With<Player>>,
) {
    let dt = time.delta_secs();

    for (mut motor, mut velocity) in &mut query {
        velocity.0 = motor.resolve(velocity.0, tuning.body_mass, dt);
        motor.clear();
    }
}

pub(crate) fn apply_head_bob(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&MovementState, &GroundContact, &LinearVelocity, &mut LookState), With<Player>>,
) {
    if !tuning.enable_head_bob {
        return;
    }
    let dt = time.delta_secs();

    for (state, ground, velocity, mut look) in &mut query {
        let bobbing = ground.grounded
            && !state.locomotion.is_crouched()
            && velocity.length() > tuning.bob_speed_threshold;
        update_head_bob(&mut look, bobbing, dt, &tuning);
    }
}
