//! Movement domain: velocity shaping (projection, counter-movement, speed limits).

use bevy::prelude::*;

use crate::movement::{Motor, MovementTuning, Orientation};

/// Input magnitude below which an axis counts as released.
const INPUT_DEADZONE: f32 = 0.05;

/// Heading of a horizontal direction in degrees, measured like `Orientation::yaw`
/// (zero along -Z, positive turning toward -X).
fn heading_degrees(v: Vec3) -> f32 {
    (-v.x).atan2(-v.z).to_degrees()
}

/// Shortest signed difference `to - from`, wrapped into (-180, 180].
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let mut d = (to - from) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Splits horizontal velocity into components along the orientation's right
/// and forward axes. Returns `(right, forward)`.
pub fn velocity_relative_to_look(velocity: Vec3, yaw: f32) -> Vec2 {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let magnitude = horizontal.length();
    if magnitude <= f32::EPSILON {
        return Vec2::ZERO;
    }

    let look_angle = yaw.to_degrees();
    let move_angle = heading_degrees(horizontal);

    let u = delta_angle(move_angle, look_angle);
    let v = 90.0 - u;

    let forward = magnitude * u.to_radians().cos();
    let right = magnitude * v.to_radians().cos();
    Vec2::new(right, forward)
}

/// Rescales horizontal velocity down to `max_speed`, keeping the vertical part.
pub fn clamp_horizontal_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    let horizontal = Vec2::new(velocity.x, velocity.z);
    if horizontal.length() <= max_speed {
        return velocity;
    }
    let clamped = horizontal.normalize_or_zero() * max_speed;
    Vec3::new(clamped.x, velocity.y, clamped.y)
}

/// Zeroes input axes that would push relative velocity further past the limit.
pub fn clamp_input(mut input: Vec2, relative: Vec2, max_speed: f32) -> Vec2 {
    if input.x > 0.0 && relative.x > max_speed {
        input.x = 0.0;
    }
    if input.x < 0.0 && relative.x < -max_speed {
        input.x = 0.0;
    }
    if input.y > 0.0 && relative.y > max_speed {
        input.y = 0.0;
    }
    if input.y < 0.0 && relative.y < -max_speed {
        input.y = 0.0;
    }
    input
}

fn needs_counter(drift: f32, input: f32, threshold: f32) -> bool {
    (drift.abs() > threshold && input.abs() < INPUT_DEADZONE)
        || (drift < -threshold && input > 0.0)
        || (drift > threshold && input < 0.0)
}

/// What the caller knows about the body when shaping this step.
#[derive(Debug, Clone, Copy)]
pub struct ShapeContext {
    pub grounded: bool,
    pub jumping: bool,
    pub sliding: bool,
    pub dt: f32,
}

/// Damps drift the player is not asking for, then hard-clamps horizontal speed.
///
/// Adds forces to `motor` and may overwrite `velocity` directly (the clamp).
pub fn counter_movement(
    ctx: ShapeContext,
    input: Vec2,
    relative: Vec2,
    orientation: &Orientation,
    velocity: &mut Vec3,
    motor: &mut Motor,
    tuning: &MovementTuning,
) {
    if !ctx.grounded || ctx.jumping {
        return;
    }

    if ctx.sliding {
        // zero velocity normalises to zero, so a stopped slide adds nothing
        let damping = -velocity.normalize_or_zero()
            * tuning.run_speed
            * ctx.dt
            * tuning.slide_counter_movement;
        motor.add_force(damping);
        return;
    }

    let threshold = tuning.counter_threshold;
    if needs_counter(relative.x, input.x, threshold) {
        motor.add_force(
            orientation.right() * tuning.run_speed * ctx.dt * -relative.x * tuning.counter_movement,
        );
    }
    if needs_counter(relative.y, input.y, threshold) {
        motor.add_force(
            orientation.forward() * tuning.run_speed * ctx.dt * -relative.y * tuning.counter_movement,
        );
    }

    *velocity = clamp_horizontal_speed(*velocity, tuning.max_speed);
}

/// Situational scale applied to the drive force.
#[derive(Debug, Clone, Copy)]
pub struct DriveContext {
    pub grounded: bool,
    pub wall_running: bool,
    pub sliding: bool,
    pub crouched: bool,
    pub sprinting: bool,
}

pub fn drive_multiplier(ctx: DriveContext, tuning: &MovementTuning) -> f32 {
    if ctx.sliding {
        0.0
    } else if !ctx.grounded && !ctx.wall_running {
        tuning.air_control
    } else if ctx.grounded && ctx.crouched {
        tuning.crouch_speed_multiplier
    } else {
        1.0
    }
}

/// Input rotated into world space and scaled to a force.
pub fn drive_force(
    ctx: DriveContext,
    input: Vec2,
    orientation: &Orientation,
    dt: f32,
    tuning: &MovementTuning,
) -> Vec3 {
    let speed = if ctx.sprinting {
        tuning.run_speed
    } else {
        tuning.walk_speed
    };
    let direction = orientation.transform_direction(Vec3::new(input.x, 0.0, -input.y));
    direction * speed * dt * drive_multiplier(ctx, tuning)
}

/// Constant downward nudge added every step on top of engine gravity.
pub fn extra_gravity(dt: f32, tuning: &MovementTuning) -> Vec3 {
    Vec3::NEG_Y * tuning.extra_gravity * dt
}
