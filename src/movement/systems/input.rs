//! Movement domain: input sampling for locomotion.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::movement::MovementInput;

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut input: ResMut<MovementInput>,
) {
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    input.axis = Vec2::new(x, y);
    input.look_delta = mouse_motion.delta;

    // Edges stay latched until a fixed step consumes them
    input.jump_just_pressed |= keyboard.just_pressed(KeyCode::Space);
    input.crouch_just_pressed |=
        keyboard.just_pressed(KeyCode::ControlLeft) || keyboard.just_pressed(KeyCode::KeyC);
    input.crouch_just_released |=
        keyboard.just_released(KeyCode::ControlLeft) || keyboard.just_released(KeyCode::KeyC);
    input.wallrun_just_released |= keyboard.just_released(KeyCode::KeyE);

    input.crouch_held = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::KeyC);
    input.sprint_held = keyboard.pressed(KeyCode::ShiftLeft);
    input.wallrun_held = keyboard.pressed(KeyCode::KeyE);
    input.parkour_held = keyboard.pressed(KeyCode::KeyQ) || keyboard.pressed(KeyCode::AltLeft);
}

pub(crate) fn consume_input_edges(mut input: ResMut<MovementInput>) {
    input.consume_edges();
}
