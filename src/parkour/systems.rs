//! Parkour domain: vault detection, warp and tuck recovery.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::{
    ControllerTimers, CrouchKind, GameLayer, GroundContact, Locomotion, MovementInput,
    MovementState, MovementTimer, MovementTuning, Orientation, Player, StandingScale,
};
use crate::parkour::{ParkourState, ParkourTimer, ParkourTuning};

/// Per-frame translation of a vault: mostly up, a little forward.
pub fn vault_offset(orientation: &Orientation, fixed_dt: f32, tuning: &ParkourTuning) -> Vec3 {
    let forward = orientation.forward();
    Vec3::new(forward.x, tuning.vault_lift, forward.z) * fixed_dt * tuning.vault_speed
}

pub(crate) fn attach_parkour(mut commands: Commands, added: Query<Entity, Added<Player>>) {
    for entity in &added {
        commands.entity(entity).insert((
            ParkourState::default(),
            ControllerTimers::<ParkourTimer>::default(),
        ));
    }
}

pub(crate) fn detect_vaultable(
    spatial_query: SpatialQuery,
    tuning: Res<ParkourTuning>,
    mut query: Query<(&Transform, &Orientation, &mut ParkourState), With<Player>>,
) {
    let vault_filter = SpatialQueryFilter::from_mask(GameLayer::Vaultable);

    for (transform, orientation, mut parkour) in &mut query {
        let origin = transform.translation - Vec3::Y * tuning.vault_ray_drop;
        let Ok(forward) = Dir3::new(orientation.forward()) else {
            parkour.vaultable = false;
            continue;
        };

        parkour.vaultable = spatial_query
            .cast_ray(
                origin,
                forward,
                tuning.vault_check_distance,
                true,
                &vault_filter,
            )
            .is_some();
    }
}

pub(crate) fn try_vault(
    fixed_time: Res<Time<Fixed>>,
    input: Res<MovementInput>,
    movement_tuning: Res<MovementTuning>,
    tuning: Res<ParkourTuning>,
    mut query: Query<
        (
            &mut Transform,
            &mut MovementState,
            &GroundContact,
            &Orientation,
            &StandingScale,
            &ParkourState,
            &mut ControllerTimers<ParkourTimer>,
        ),
        With<Player>,
    >,
) {
    let fixed_dt = fixed_time.timestep().as_secs_f32();

    for (mut transform, mut state, ground, orientation, standing, parkour, mut timers) in
        &mut query
    {
        if state.locomotion == (Locomotion::Vaulting { released: false }) && !input.parkour_held {
            release_vault(&mut state, &mut timers, &tuning);
            continue;
        }

        if !input.parkour_held || !parkour.vaultable || !ground.grounded {
            continue;
        }

        match state.locomotion {
            Locomotion::Standing | Locomotion::Crouched => {
                if !state.begin_crouch(
                    &mut transform.scale,
                    standing.0,
                    CrouchKind::Tuck,
                    &movement_tuning,
                ) {
                    continue;
                }
                debug!("Vault started");
            }
            Locomotion::Vaulting { released: false } => {}
            _ => continue,
        }

        transform.translation += vault_offset(orientation, fixed_dt, &tuning);
    }
}

/// Leaving the ground mid-vault starts the tuck recovery countdown.
pub(crate) fn track_vault_airborne(
    tuning: Res<ParkourTuning>,
    mut query: Query<
        (
            &mut MovementState,
            &GroundContact,
            &mut ControllerTimers<ParkourTimer>,
        ),
        With<Player>,
    >,
) {
    for (mut state, ground, mut timers) in &mut query {
        if state.locomotion == (Locomotion::Vaulting { released: false }) && !ground.grounded {
            release_vault(&mut state, &mut timers, &tuning);
        }
    }
}

pub(crate) fn release_vault(
    state: &mut MovementState,
    timers: &mut ControllerTimers<ParkourTimer>,
    tuning: &ParkourTuning,
) {
    if state.transition(Locomotion::Vaulting { released: true }) {
        timers.schedule(ParkourTimer::VaultRecover, tuning.vault_recover_delay);
        if let Some(secs) = timers.remaining_secs(ParkourTimer::VaultRecover) {
            debug!("Vault released, recovering in {:.2}s", secs);
        }
    }
}

pub(crate) fn update_parkour_timers(
    time: Res<Time>,
    input: Res<MovementInput>,
    movement_tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &mut ControllerTimers<ParkourTimer>,
            &mut ControllerTimers<MovementTimer>,
            &mut MovementState,
            &mut Transform,
            &StandingScale,
        ),
        With<Player>,
    >,
) {
    for (mut parkour_timers, mut movement_timers, mut state, mut transform, standing) in
        &mut query
    {
        for key in parkour_timers.tick(time.delta()) {
            match key {
                ParkourTimer::VaultRecover => finish_vault(
                    &mut state,
                    &mut transform.scale,
                    standing.0,
                    &mut movement_timers,
                    input.crouch_held,
                    &movement_tuning,
                ),
            }
        }
    }
}

/// Ends the tuck: stay crouched if the player is holding crouch, stand otherwise.
pub(crate) fn finish_vault(
    state: &mut MovementState,
    scale: &mut Vec3,
    standing_scale: Vec3,
    movement_timers: &mut ControllerTimers<MovementTimer>,
    crouch_held: bool,
    tuning: &MovementTuning,
) {
    if !state.locomotion.is_vaulting() {
        return;
    }
    if crouch_held {
        state.transition(Locomotion::Crouched);
    } else {
        state.end_crouch(scale, standing_scale, movement_timers, tuning);
    }
    debug!("Vault finished: {:?}", state.locomotion);
}
