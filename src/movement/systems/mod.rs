//! Movement domain: system modules for locomotion updates.

pub(crate) mod camera;
pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub(crate) use camera::{apply_mouse_look, follow_camera, update_wallrun_tilt};
pub(crate) use collisions::{detect_ground, detect_walls};
pub(crate) use input::{consume_input_edges, read_input};
pub(crate) use movement::{apply_head_bob, apply_locomotion, resolve_motor, update_timers};
