//! Movement domain: first-person look and camera placement.

use bevy::prelude::*;

use crate::movement::look::{apply_mouse_delta, camera_rotation, update_tilt};
use crate::movement::{
    LookState, MovementInput, MovementState, MovementTuning, Orientation, Player, PlayerCamera,
    WallContact,
};

pub(crate) fn apply_mouse_look(
    fixed_time: Res<Time<Fixed>>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&mut LookState, &mut Orientation), With<Player>>,
) {
    let fixed_dt = fixed_time.timestep().as_secs_f32();

    for (mut look, mut orientation) in &mut query {
        apply_mouse_delta(&mut look, input.look_delta, fixed_dt, &tuning);
        orientation.yaw = look.yaw.to_radians();
    }
}

pub(crate) fn update_wallrun_tilt(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&MovementState, &WallContact, &mut LookState), With<Player>>,
) {
    let dt = time.delta_secs();

    for (state, walls, mut look) in &mut query {
        look.tilt = update_tilt(
            look.tilt,
            state.locomotion.wall_side(),
            *walls,
            dt,
            tuning.max_wallrun_camera_tilt,
        );
    }
}

/// Places each player camera at its body's eye height.
pub(crate) fn follow_camera(
    tuning: Res<MovementTuning>,
    bodies: Query<(&Transform, &LookState), (With<Player>, Without<PlayerCamera>)>,
    mut cameras: Query<(&PlayerCamera, &mut Transform)>,
) {
    for (camera, mut camera_transform) in &mut cameras {
        let Ok((body, look)) = bodies.get(camera.target) else {
            continue;
        };
        let eye = tuning.eye_height * body.scale.y + look.bob_offset;
        camera_transform.translation = body.translation + Vec3::Y * eye;
        camera_transform.rotation = camera_rotation(look);
    }
}
