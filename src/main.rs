mod content;
mod movement;
mod parkour;

use avian3d::prelude::*;
use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Parkour Controller".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .insert_resource(Time::<Fixed>::from_hz(50.0))
        .add_plugins((
            content::ContentPlugin,
            movement::MovementPlugin,
            parkour::ParkourPlugin,
        ))
        .run();
}
