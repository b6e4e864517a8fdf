//! Movement domain: mouse look, wall-run camera tilt and head-bob.

use bevy::prelude::*;

use crate::movement::{LookState, MovementTuning, WallContact, WallSide};

/// Accumulates a mouse delta (pixels this frame) into yaw and pitch.
///
/// Positive x turns right, positive y (mouse moved down) looks down.
pub fn apply_mouse_delta(look: &mut LookState, delta: Vec2, fixed_dt: f32, tuning: &MovementTuning) {
    let scale = tuning.sensitivity * fixed_dt * tuning.sensitivity_multiplier;
    look.yaw -= delta.x * scale;
    look.pitch = (look.pitch + delta.y * scale).clamp(tuning.min_pitch, tuning.max_pitch);
}

/// Blends the roll toward the wall-run tilt, or back toward level once no
/// wall is in reach.
pub fn update_tilt(
    tilt: f32,
    wall_running: Option<WallSide>,
    walls: WallContact,
    dt: f32,
    max_tilt: f32,
) -> f32 {
    let engage = dt * max_tilt * 5.0;
    let relax = dt * max_tilt * 2.0;

    let mut tilt = tilt;
    if let Some(side) = wall_running
        && tilt.abs() < max_tilt
    {
        tilt = (tilt + engage * side.sign()).clamp(-max_tilt, max_tilt);
    }

    if !walls.any() {
        if tilt > 0.0 {
            tilt = (tilt - relax).max(0.0);
        } else if tilt < 0.0 {
            tilt = (tilt + relax).min(0.0);
        }
    }
    tilt
}

/// Advances the head-bob oscillator. Outside of ground running the camera
/// holds its default height.
pub fn update_head_bob(look: &mut LookState, bobbing: bool, dt: f32, tuning: &MovementTuning) {
    if !bobbing {
        look.bob_offset = 0.0;
        return;
    }
    look.bob_timer += dt * tuning.bob_speed;
    look.bob_offset = look.bob_timer.sin() * tuning.bob_amount;
}

/// Camera rotation for the current look state.
pub fn camera_rotation(look: &LookState) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        look.yaw.to_radians(),
        -look.pitch.to_radians(),
        look.tilt.to_radians(),
    )
}
