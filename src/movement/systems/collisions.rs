//! Movement domain: ground and wall detection systems.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::sensors::{update_ground, walkable_normal};
use crate::movement::{
    ControllerTimers, GameLayer, GroundContact, MovementState, MovementTimer, MovementTuning,
    Orientation, Player, WallContact,
};

pub(crate) fn detect_ground(
    time: Res<Time>,
    collisions: Collisions,
    layers: Query<&CollisionLayers>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            Entity,
            &mut GroundContact,
            &mut MovementState,
            &mut ControllerTimers<MovementTimer>,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, mut ground, mut state, mut timers) in &mut query {
        let mut normals = Vec::new();
        for pair in collisions.collisions_with(entity) {
            // Manifold normals point from collider1 into collider2; flip them so
            // they always point from the surface into the player.
            let (other, sign) = if pair.collider1 == entity {
                (pair.collider2, -1.0)
            } else {
                (pair.collider1, 1.0)
            };

            let on_ground_layer = layers
                .get(other)
                .is_ok_and(|l| l.memberships.has_all(GameLayer::Ground));
            if !on_ground_layer {
                continue;
            }

            normals.extend(pair.manifolds.iter().map(|m| m.normal * sign));
        }

        let walkable = walkable_normal(normals, tuning.max_slope_angle);
        update_ground(
            &mut ground,
            &mut state,
            &mut timers,
            walkable,
            tuning.unground_delay(dt),
        );
    }
}

pub(crate) fn detect_walls(
    spatial_query: SpatialQuery,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &Transform,
            &Orientation,
            &mut WallContact,
            &mut MovementState,
            &mut GravityScale,
        ),
        With<Player>,
    >,
) {
    // Filter to only hit Wall layer entities
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::Wall);

    for (transform, orientation, mut walls, mut state, mut gravity) in &mut query {
        let origin = transform.translation;
        let right = Dir3::new(orientation.right()).unwrap_or(Dir3::X);

        let right_hit = spatial_query.cast_ray(
            origin,
            right,
            tuning.wall_check_distance,
            true,
            &wall_filter,
        );
        let left_hit = spatial_query.cast_ray(
            origin,
            -right,
            tuning.wall_check_distance,
            true,
            &wall_filter,
        );

        *walls = WallContact {
            left: left_hit.is_some(),
            right: right_hit.is_some(),
        };

        if !walls.any() && state.stop_wallrun() {
            gravity.0 = state.gravity_scale();
        }
    }
}
