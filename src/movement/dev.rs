//! Movement domain: debug-only test course.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::GameLayer;

/// One static block of the course.
struct Block {
    size: Vec3,
    position: Vec3,
    rotation: Quat,
    layer: GameLayer,
    color: Color,
}

impl Block {
    fn new(size: Vec3, position: Vec3, layer: GameLayer, color: Color) -> Self {
        Self {
            size,
            position,
            rotation: Quat::IDENTITY,
            layer,
            color,
        }
    }

    fn tilted(mut self, degrees: f32) -> Self {
        self.rotation = Quat::from_rotation_x(degrees.to_radians());
        self
    }
}

pub(crate) fn spawn_test_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let vault_color = Color::srgb(0.6, 0.45, 0.3);

    let blocks = [
        // Floor
        Block::new(
            Vec3::new(80.0, 1.0, 80.0),
            Vec3::new(0.0, -0.5, 0.0),
            GameLayer::Ground,
            ground_color,
        ),
        // Walkable ramp, under the slope limit
        Block::new(
            Vec3::new(6.0, 0.5, 12.0),
            Vec3::new(-12.0, 1.5, -10.0),
            GameLayer::Ground,
            ground_color,
        )
        .tilted(20.0),
        // Steep ramp, over the slope limit
        Block::new(
            Vec3::new(6.0, 0.5, 12.0),
            Vec3::new(-20.0, 3.0, -10.0),
            GameLayer::Ground,
            ground_color,
        )
        .tilted(50.0),
        // Wall-run corridor
        Block::new(
            Vec3::new(0.5, 6.0, 30.0),
            Vec3::new(8.0, 3.0, -15.0),
            GameLayer::Wall,
            wall_color,
        ),
        Block::new(
            Vec3::new(0.5, 6.0, 30.0),
            Vec3::new(12.0, 3.0, -15.0),
            GameLayer::Wall,
            wall_color,
        ),
        // Vault crate
        Block::new(
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(0.0, 0.5, -8.0),
            GameLayer::Vaultable,
            vault_color,
        ),
    ];

    for block in blocks {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(block.size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: block.color,
                ..default()
            })),
            Transform::from_translation(block.position).with_rotation(block.rotation),
            RigidBody::Static,
            Collider::cuboid(block.size.x, block.size.y, block.size.z),
            CollisionLayers::new(block.layer, [GameLayer::Player]),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
