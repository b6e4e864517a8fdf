//! Movement domain: slope-filtered ground sensing.

use bevy::prelude::*;

use crate::movement::{ControllerTimers, GroundContact, MovementState, MovementTimer};

/// Whether a contact normal is flat enough to stand on.
pub fn is_floor(normal: Vec3, max_slope_angle: f32) -> bool {
    let Some(normal) = normal.try_normalize() else {
        return false;
    };
    normal.angle_between(Vec3::Y).to_degrees() < max_slope_angle
}

/// Last walkable normal among this step's contacts.
pub fn walkable_normal(
    normals: impl IntoIterator<Item = Vec3>,
    max_slope_angle: f32,
) -> Option<Vec3> {
    normals
        .into_iter()
        .filter(|n| is_floor(*n, max_slope_angle))
        .last()
}

/// Folds one physics step of contact results into the ground state.
///
/// A walkable contact grounds the body at once. Losing it only schedules the
/// airborne transition, which absorbs single-step gaps in contact reporting.
pub fn update_ground(
    ground: &mut GroundContact,
    state: &mut MovementState,
    timers: &mut ControllerTimers<MovementTimer>,
    walkable: Option<Vec3>,
    unground_delay: f32,
) {
    match walkable {
        Some(normal) => {
            if !ground.grounded {
                debug!("Landed on normal {:?}", normal);
            }
            ground.grounded = true;
            ground.normal = normal;
            timers.cancel(MovementTimer::Unground);
            if !timers.is_pending(MovementTimer::JumpCooldown) {
                state.jump_ready = true;
                timers.cancel(MovementTimer::JumpRearm);
            }
        }
        None => {
            if ground.grounded && !timers.is_pending(MovementTimer::Unground) {
                timers.schedule(MovementTimer::Unground, unground_delay);
            }
        }
    }
}
