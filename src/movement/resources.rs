//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Feel constants for the first-person controller.
///
/// Forces are expressed the way the controller applies them: a per-second value
/// that is multiplied by the fixed timestep before being handed to the body.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct MovementTuning {
    /// Contacts steeper than this (degrees from world up) never ground the body.
    pub max_slope_angle: f32,
    /// Physics steps a lost ground contact is tolerated before going airborne.
    pub unground_delay_steps: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Drive multiplier while crouched on the ground but not sliding.
    pub crouch_speed_multiplier: f32,
    /// Drive multiplier while airborne and not wall-running.
    pub air_control: f32,
    pub max_speed: f32,
    pub counter_movement: f32,
    /// Relative speed below which no counter force is applied.
    pub counter_threshold: f32,
    /// Constant downward force added every step on top of engine gravity.
    pub extra_gravity: f32,
    pub body_mass: f32,

    pub jump_force: f32,
    pub jump_cooldown: f32,
    /// Delay before the first jump is allowed after spawning.
    pub spawn_jump_delay: f32,

    pub slide_force: f32,
    pub slide_counter_movement: f32,
    pub slide_velocity_threshold: f32,
    pub slide_stop_threshold: f32,
    pub crouch_cooldown: f32,
    /// Vertical scale factor applied to the body while crouched.
    pub crouch_scale: f32,

    pub wall_check_distance: f32,
    pub wallrun_force: f32,
    pub max_wall_speed: f32,
    pub max_wallrun_camera_tilt: f32,

    pub sensitivity: f32,
    pub sensitivity_multiplier: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,

    pub enable_head_bob: bool,
    pub bob_amount: f32,
    pub bob_speed: f32,
    pub bob_speed_threshold: f32,

    pub body_height: f32,
    pub body_radius: f32,
    pub eye_height: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_slope_angle: 35.0,
            unground_delay_steps: 3.0,
            walk_speed: 200.0,
            run_speed: 650.0,
            crouch_speed_multiplier: 0.5,
            air_control: 0.1,
            max_speed: 20.0,
            counter_movement: 0.225,
            counter_threshold: 0.03,
            extra_gravity: 10.0,
            body_mass: 1.0,

            jump_force: 450.0,
            jump_cooldown: 0.2,
            spawn_jump_delay: 1.0,

            slide_force: 400.0,
            slide_counter_movement: 0.2,
            slide_velocity_threshold: 5.0,
            slide_stop_threshold: 3.0,
            crouch_cooldown: 0.25,
            crouch_scale: 0.5,

            wall_check_distance: 1.0,
            wallrun_force: 3500.0,
            max_wall_speed: 7.0,
            max_wallrun_camera_tilt: 15.0,

            sensitivity: 50.0,
            sensitivity_multiplier: 1.0,
            min_pitch: -90.0,
            max_pitch: 65.0,

            enable_head_bob: true,
            bob_amount: 0.05,
            bob_speed: 12.0,
            bob_speed_threshold: 0.5,

            body_height: 2.0,
            body_radius: 0.5,
            eye_height: 0.6,
        }
    }
}

impl MovementTuning {
    /// Vertical impulse of a ground jump.
    pub fn jump_impulse(&self, fixed_dt: f32) -> f32 {
        self.jump_force * 0.75 * fixed_dt
    }

    /// Delay before losing ground contact becomes an airborne transition.
    pub fn unground_delay(&self, fixed_dt: f32) -> f32 {
        self.unground_delay_steps * fixed_dt
    }
}

/// Per-frame input snapshot.
///
/// Held values are overwritten every frame. Edge flags are latched until the next
/// fixed step consumes them, so a press is never lost on a frame without physics.
#[derive(Resource, Debug, Default, Clone)]
pub struct MovementInput {
    pub axis: Vec2,
    pub look_delta: Vec2,
    pub jump_just_pressed: bool,
    pub crouch_just_pressed: bool,
    pub crouch_just_released: bool,
    pub crouch_held: bool,
    pub sprint_held: bool,
    pub wallrun_held: bool,
    pub wallrun_just_released: bool,
    pub parkour_held: bool,
}

impl MovementInput {
    /// Clears the latched edges once a fixed step has acted on them.
    pub fn consume_edges(&mut self) {
        self.jump_just_pressed = false;
        self.crouch_just_pressed = false;
        self.crouch_just_released = false;
        self.wallrun_just_released = false;
    }
}
