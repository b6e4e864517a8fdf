//! Movement domain: unit tests for sensing, the state machine and fixed-step systems.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use super::sensors::{is_floor, update_ground, walkable_normal};
use super::shaper;
use super::state::{Locomotor, apply_timer};
use super::systems::{apply_locomotion, detect_ground, detect_walls, resolve_motor};
use super::{
    ControllerTimers, GameLayer, GroundContact, Locomotion, Motor, MovementInput, MovementState,
    MovementTimer, MovementTuning, Orientation, Player, StandingScale, WallContact, WallSide,
};

const DT: f32 = 0.02;
const EPS: f32 = 1e-4;

/// Contact normal tilted `degrees` away from world up.
fn slope_normal(degrees: f32) -> Vec3 {
    let r = degrees.to_radians();
    Vec3::new(r.sin(), r.cos(), 0.0)
}

/// Everything a `Locomotor` borrows, owned in one place.
struct Rig {
    state: MovementState,
    timers: ControllerTimers<MovementTimer>,
    ground: GroundContact,
    walls: WallContact,
    orientation: Orientation,
    velocity: Vec3,
    motor: Motor,
    scale: Vec3,
    tuning: MovementTuning,
}

impl Rig {
    fn grounded() -> Self {
        Self {
            state: MovementState {
                jump_ready: true,
                ..default()
            },
            timers: ControllerTimers::default(),
            ground: GroundContact {
                grounded: true,
                normal: Vec3::Y,
            },
            walls: WallContact::default(),
            orientation: Orientation { yaw: 0.4 },
            velocity: Vec3::ZERO,
            motor: Motor::default(),
            scale: Vec3::ONE,
            tuning: MovementTuning::default(),
        }
    }

    fn airborne() -> Self {
        let mut rig = Self::grounded();
        rig.ground.grounded = false;
        rig
    }

    fn locomotor(&mut self) -> Locomotor<'_> {
        Locomotor {
            state: &mut self.state,
            timers: &mut self.timers,
            ground: &self.ground,
            walls: &self.walls,
            orientation: &self.orientation,
            velocity: &mut self.velocity,
            motor: &mut self.motor,
            scale: &mut self.scale,
            standing_scale: Vec3::ONE,
            tuning: &self.tuning,
            dt: DT,
        }
    }

    fn tick(&mut self, secs: f32) {
        for key in self.timers.tick(Duration::from_secs_f32(secs)) {
            apply_timer(key, &mut self.state, &mut self.ground);
        }
    }
}

// --- Ground sensing ---

#[test]
fn test_floor_classification_by_slope() {
    assert!(is_floor(Vec3::Y, 35.0));
    assert!(is_floor(slope_normal(20.0), 35.0));
    assert!(is_floor(slope_normal(34.0), 35.0));
    assert!(!is_floor(slope_normal(40.0), 35.0));
    assert!(!is_floor(Vec3::X, 35.0));
    assert!(!is_floor(Vec3::NEG_Y, 35.0));
    assert!(!is_floor(Vec3::ZERO, 35.0));
}

#[test]
fn test_walkable_contact_grounds_immediately() {
    let mut ground = GroundContact::default();
    let mut state = MovementState::default();
    let mut timers = ControllerTimers::default();

    let walkable = walkable_normal([slope_normal(60.0), slope_normal(10.0)], 35.0);
    update_ground(&mut ground, &mut state, &mut timers, walkable, 0.06);

    assert!(ground.grounded);
    assert!((ground.normal - slope_normal(10.0)).length() < EPS);
    assert!(state.jump_ready);
}

#[test]
fn test_steep_contact_leaves_ground_state_alone() {
    let mut ground = GroundContact::default();
    let mut state = MovementState::default();
    let mut timers = ControllerTimers::default();

    let walkable = walkable_normal([slope_normal(50.0), Vec3::X], 35.0);
    assert!(walkable.is_none());
    update_ground(&mut ground, &mut state, &mut timers, walkable, 0.06);

    assert!(!ground.grounded);
    assert!(!state.jump_ready);
    assert!(!timers.is_pending(MovementTimer::Unground));
}

#[test]
fn test_lost_contact_goes_airborne_after_delay() {
    let mut rig = Rig::grounded();
    let delay = rig.tuning.unground_delay(DT);

    update_ground(&mut rig.ground, &mut rig.state, &mut rig.timers, None, delay);
    rig.tick(DT);
    assert!(rig.ground.grounded);

    // a second miss does not push the deadline back
    update_ground(&mut rig.ground, &mut rig.state, &mut rig.timers, None, delay);
    rig.tick(DT * 2.5);
    assert!(!rig.ground.grounded);
}

#[test]
fn test_contact_inside_delay_keeps_body_grounded() {
    let mut rig = Rig::grounded();
    let delay = rig.tuning.unground_delay(DT);

    update_ground(&mut rig.ground, &mut rig.state, &mut rig.timers, None, delay);
    rig.tick(DT);
    update_ground(
        &mut rig.ground,
        &mut rig.state,
        &mut rig.timers,
        Some(Vec3::Y),
        delay,
    );
    rig.tick(1.0);

    assert!(rig.ground.grounded);
}

// --- Jump ---

#[test]
fn test_jump_applies_one_impulse_and_starts_cooldown() {
    let mut rig = Rig::grounded();

    assert!(rig.locomotor().try_jump());
    let expected = Vec3::Y * rig.tuning.jump_force * 0.75 * DT;
    assert!((rig.motor.impulse - expected).length() < EPS);
    assert!(!rig.state.jump_ready);
    assert!(rig.state.jumping);

    // a second press in the same window does nothing
    assert!(!rig.locomotor().try_jump());
    assert!((rig.motor.impulse - expected).length() < EPS);
}

#[test]
fn test_jump_rearms_after_cooldown_even_in_the_air() {
    let mut rig = Rig::grounded();
    rig.locomotor().try_jump();
    rig.ground.grounded = false;

    rig.tick(rig.tuning.jump_cooldown * 0.5);
    assert!(!rig.state.jump_ready);

    rig.tick(rig.tuning.jump_cooldown);
    assert!(rig.state.jump_ready);
    assert!(!rig.state.jumping);
}

#[test]
fn test_ground_contact_never_shortcuts_jump_cooldown() {
    let mut rig = Rig::grounded();
    rig.locomotor().try_jump();

    update_ground(
        &mut rig.ground,
        &mut rig.state,
        &mut rig.timers,
        Some(Vec3::Y),
        0.06,
    );
    assert!(!rig.state.jump_ready);
    assert!(rig.timers.is_pending(MovementTimer::JumpCooldown));
}

#[test]
fn test_landing_cancels_spawn_delay() {
    let mut rig = Rig::airborne();
    rig.state.jump_ready = false;
    rig.timers
        .schedule(MovementTimer::JumpRearm, rig.tuning.spawn_jump_delay);

    update_ground(
        &mut rig.ground,
        &mut rig.state,
        &mut rig.timers,
        Some(Vec3::Y),
        0.06,
    );
    assert!(rig.state.jump_ready);
    assert!(!rig.timers.is_pending(MovementTimer::JumpRearm));
}

#[test]
fn test_jump_refused_when_airborne_or_crouched() {
    let mut rig = Rig::airborne();
    assert!(!rig.locomotor().try_jump());

    let mut rig = Rig::grounded();
    rig.locomotor().press_crouch();
    assert!(!rig.locomotor().try_jump());
    assert_eq!(rig.motor.impulse, Vec3::ZERO);
}

// --- Crouch and slide ---

#[test]
fn test_slow_crouch_does_not_slide() {
    let mut rig = Rig::grounded();
    rig.velocity = rig.orientation.forward() * 4.0;

    assert!(rig.locomotor().press_crouch());
    assert_eq!(rig.state.locomotion, Locomotion::Crouched);
    assert_eq!(rig.scale, Vec3::new(1.0, 0.5, 1.0));
    assert_eq!(rig.motor.impulse, Vec3::ZERO);
}

#[test]
fn test_slide_scenario() {
    let mut rig = Rig::grounded();
    let forward = rig.orientation.forward();
    rig.velocity = forward * 6.0;

    assert!(rig.locomotor().press_crouch());
    assert_eq!(rig.state.locomotion, Locomotion::Sliding);
    let expected = forward * rig.tuning.slide_force * DT;
    assert!((rig.motor.impulse - expected).length() < EPS);
    rig.motor.clear();

    // drive input is suppressed; only slide damping and extra gravity remain
    rig.locomotor().drive(Vec2::Y);
    let damping = -forward * rig.tuning.run_speed * DT * rig.tuning.slide_counter_movement;
    let expected = damping + shaper::extra_gravity(DT, &rig.tuning);
    assert!((rig.motor.force - expected).length() < 1e-3);

    rig.velocity = forward * 4.0;
    rig.locomotor().update_slide();
    assert_eq!(rig.state.locomotion, Locomotion::Sliding);

    rig.velocity = forward * 2.9;
    rig.locomotor().update_slide();
    assert_eq!(rig.state.locomotion, Locomotion::Crouched);
}

#[test]
fn test_crouch_cooldown_gates_next_crouch() {
    let mut rig = Rig::grounded();
    rig.locomotor().press_crouch();

    assert!(rig.locomotor().release_crouch());
    assert_eq!(rig.state.locomotion, Locomotion::Standing);
    assert_eq!(rig.scale, Vec3::ONE);

    assert!(!rig.locomotor().press_crouch());
    assert_eq!(rig.state.locomotion, Locomotion::Standing);

    rig.tick(rig.tuning.crouch_cooldown + 0.01);
    assert!(rig.locomotor().press_crouch());
}

#[test]
fn test_release_without_crouch_does_nothing() {
    let mut rig = Rig::grounded();
    assert!(!rig.locomotor().release_crouch());
    assert!(rig.state.crouch_ready);
    assert!(!rig.timers.is_pending(MovementTimer::CrouchRearm));
}

// --- Wallrun ---

fn wall_on_right() -> Rig {
    let mut rig = Rig::airborne();
    rig.walls.right = true;
    rig.state.wallrun_held = true;
    rig.velocity = rig.orientation.forward() * 5.0;
    rig
}

#[test]
fn test_wallrun_scenario() {
    let mut rig = wall_on_right();
    let forward = rig.orientation.forward();
    let right = rig.orientation.right();

    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::WallRunning(WallSide::Right));
    assert_eq!(rig.state.gravity_scale(), 0.0);
    assert!(rig.motor.force.dot(forward) > 0.0);
    assert!(rig.motor.force.dot(right) > 0.0);

    // drive is skipped entirely while on the wall
    let before = rig.motor;
    rig.locomotor().drive(Vec2::new(1.0, 1.0));
    assert_eq!(rig.motor, before);

    rig.motor.clear();
    assert!(rig.locomotor().release_wallrun());
    let impulse = rig.motor.impulse;
    assert!(impulse.dot(forward) > 0.0);
    assert!(impulse.y > 0.0);
    assert!(impulse.dot(right) < 0.0);
    assert!(!rig.state.jump_ready);
    assert_eq!(rig.state.locomotion, Locomotion::Standing);
    assert_eq!(rig.state.gravity_scale(), 1.0);
}

#[test]
fn test_left_wall_pushes_left() {
    let mut rig = wall_on_right();
    rig.walls = WallContact {
        left: true,
        right: false,
    };

    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::WallRunning(WallSide::Left));
    assert!(rig.motor.force.dot(rig.orientation.right()) < 0.0);
}

#[test]
fn test_wallrun_holds_without_force_above_max_speed() {
    let mut rig = wall_on_right();
    rig.velocity = rig.orientation.forward() * (rig.tuning.max_wall_speed + 1.0);

    rig.locomotor().wallrun();
    assert!(rig.state.locomotion.is_wall_running());
    assert_eq!(rig.motor.force, Vec3::ZERO);
}

#[test]
fn test_wallrun_needs_air_and_held_control() {
    let mut rig = wall_on_right();
    rig.ground.grounded = true;
    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::Standing);

    let mut rig = wall_on_right();
    rig.state.wallrun_held = false;
    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::Standing);
}

#[test]
fn test_wallrun_ends_on_landing() {
    let mut rig = wall_on_right();
    rig.locomotor().wallrun();
    rig.ground.grounded = true;

    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::Standing);
    assert_eq!(rig.state.gravity_scale(), 1.0);
}

#[test]
fn test_no_wallrun_while_sliding() {
    let mut rig = wall_on_right();
    rig.state.locomotion = Locomotion::Sliding;

    rig.locomotor().wallrun();
    assert_eq!(rig.state.locomotion, Locomotion::Sliding);
    assert_eq!(rig.motor.force, Vec3::ZERO);
}

#[test]
fn test_release_off_wall_only_clears_hold() {
    let mut rig = Rig::airborne();
    rig.state.wallrun_held = true;

    assert!(!rig.locomotor().release_wallrun());
    assert!(!rig.state.wallrun_held);
    assert!(rig.state.jump_ready);
    assert_eq!(rig.motor.impulse, Vec3::ZERO);
}

// --- State machine ---

#[test]
fn test_transition_table_rejects_impossible_moves() {
    use Locomotion::*;

    assert!(!Sliding.can_transition_to(WallRunning(WallSide::Left)));
    assert!(!Crouched.can_transition_to(WallRunning(WallSide::Right)));
    assert!(!WallRunning(WallSide::Right).can_transition_to(Sliding));
    assert!(!WallRunning(WallSide::Right).can_transition_to(Crouched));
    assert!(!Standing.can_transition_to(Vaulting { released: true }));
    assert!(!Vaulting { released: false }.can_transition_to(Sliding));

    assert!(Standing.can_transition_to(Sliding));
    assert!(Sliding.can_transition_to(Crouched));
    assert!(Vaulting { released: true }.can_transition_to(Standing));
}

#[test]
fn test_rejected_transition_keeps_state() {
    let mut state = MovementState {
        locomotion: Locomotion::Sliding,
        ..default()
    };
    assert!(!state.transition(Locomotion::WallRunning(WallSide::Left)));
    assert_eq!(state.locomotion, Locomotion::Sliding);
    assert!(state.transition(Locomotion::Sliding));
}

#[test]
fn test_player_crouch_refused_while_vaulting() {
    let mut rig = Rig::grounded();
    rig.state.locomotion = Locomotion::Vaulting { released: false };

    assert!(!rig.locomotor().press_crouch());
    assert!(!rig.locomotor().release_crouch());
    assert!(rig.state.locomotion.is_vaulting());
}

// --- Fixed-step systems ---

fn world_with_time() -> World {
    let mut world = World::new();
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_secs_f32(DT));
    world.insert_resource(time);
    world.insert_resource(MovementTuning::default());
    world.insert_resource(MovementInput::default());
    world
}

fn spawn_body(
    world: &mut World,
    state: MovementState,
    ground: GroundContact,
    walls: WallContact,
) -> Entity {
    world
        .spawn((
            Player,
            state,
            ControllerTimers::<MovementTimer>::default(),
            ground,
            walls,
            Orientation::default(),
            LinearVelocity::default(),
            Motor::default(),
            Transform::default(),
            StandingScale(Vec3::ONE),
            GravityScale(0.0),
        ))
        .id()
}

#[test]
fn test_releasing_wallrun_restores_gravity_same_step() {
    let mut world = world_with_time();
    let body = spawn_body(
        &mut world,
        MovementState {
            locomotion: Locomotion::WallRunning(WallSide::Right),
            wallrun_held: true,
            ..default()
        },
        GroundContact::default(),
        WallContact {
            left: false,
            right: true,
        },
    );
    world.resource_mut::<MovementInput>().wallrun_just_released = true;

    world
        .run_system_once(apply_locomotion)
        .expect("system should run");

    let state = world.get::<MovementState>(body).expect("state");
    assert_eq!(state.locomotion, Locomotion::Standing);
    assert_eq!(world.get::<GravityScale>(body).expect("gravity").0, 1.0);
    assert!(world.get::<Motor>(body).expect("motor").impulse.y > 0.0);
}

#[test]
fn test_held_wallrun_keeps_gravity_off() {
    let mut world = world_with_time();
    let body = spawn_body(
        &mut world,
        MovementState::default(),
        GroundContact::default(),
        WallContact {
            left: true,
            right: false,
        },
    );
    world.resource_mut::<MovementInput>().wallrun_held = true;

    world
        .run_system_once(apply_locomotion)
        .expect("system should run");

    let state = world.get::<MovementState>(body).expect("state");
    assert_eq!(state.locomotion, Locomotion::WallRunning(WallSide::Left));
    assert_eq!(world.get::<GravityScale>(body).expect("gravity").0, 0.0);
}

#[test]
fn test_resolve_motor_folds_impulse_into_velocity() {
    let mut world = world_with_time();
    let body = spawn_body(
        &mut world,
        MovementState::default(),
        GroundContact::default(),
        WallContact::default(),
    );
    world
        .get_mut::<Motor>(body)
        .expect("motor")
        .add_impulse(Vec3::Y * 9.0);

    world
        .run_system_once(resolve_motor)
        .expect("system should run");

    let velocity = world.get::<LinearVelocity>(body).expect("velocity");
    assert!((velocity.0 - Vec3::Y * 9.0).length() < EPS);
    assert_eq!(*world.get::<Motor>(body).expect("motor"), Motor::default());
}

// --- Sensors against the physics engine ---

fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::transform::TransformPlugin,
        bevy::asset::AssetPlugin::default(),
        bevy::mesh::MeshPlugin,
        bevy::scene::ScenePlugin,
        PhysicsPlugins::default(),
    ))
    .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
        Duration::from_millis(20),
    ))
    .insert_resource(Time::<Fixed>::from_hz(50.0))
    .init_resource::<MovementTuning>()
    .add_systems(FixedUpdate, detect_ground)
    .add_systems(Update, detect_walls);
    app.finish();
    app.cleanup();
    app
}

fn spawn_sensing_body(
    app: &mut App,
    position: Vec3,
    state: MovementState,
    body: RigidBody,
) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            state,
            GroundContact::default(),
            WallContact::default(),
            Orientation::default(),
            ControllerTimers::<MovementTimer>::default(),
            body,
            Collider::capsule(0.5, 1.0),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(1.0),
            Transform::from_translation(position),
            CollisionLayers::new(
                GameLayer::Player,
                [
                    GameLayer::Default,
                    GameLayer::Ground,
                    GameLayer::Wall,
                    GameLayer::Vaultable,
                ],
            ),
        ))
        .id()
}

fn spawn_block(app: &mut App, size: Vec3, position: Vec3, layer: GameLayer) -> Entity {
    app.world_mut()
        .spawn((
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            Transform::from_translation(position),
            CollisionLayers::new(layer, [GameLayer::Player]),
        ))
        .id()
}

fn spawn_floor(app: &mut App, layer: GameLayer) -> Entity {
    spawn_block(
        app,
        Vec3::new(20.0, 1.0, 20.0),
        Vec3::new(0.0, -0.5, 0.0),
        layer,
    )
}

#[test]
fn test_body_on_ground_floor_is_grounded_with_up_normal() {
    // entity order decides which collider is first in the contact pair
    for body_first in [true, false] {
        let mut app = physics_app();
        let body = if body_first {
            let body = spawn_sensing_body(
                &mut app,
                Vec3::new(0.0, 1.0, 0.0),
                MovementState::default(),
                RigidBody::Dynamic,
            );
            spawn_floor(&mut app, GameLayer::Ground);
            body
        } else {
            spawn_floor(&mut app, GameLayer::Ground);
            spawn_sensing_body(
                &mut app,
                Vec3::new(0.0, 1.0, 0.0),
                MovementState::default(),
                RigidBody::Dynamic,
            )
        };

        for _ in 0..10 {
            app.update();
        }

        let ground = app.world().get::<GroundContact>(body).expect("ground");
        assert!(ground.grounded, "body_first={}", body_first);
        assert!(
            ground.normal.dot(Vec3::Y) > 0.99,
            "normal {:?} with body_first={}",
            ground.normal,
            body_first
        );
    }
}

#[test]
fn test_floor_outside_ground_layer_never_grounds() {
    let mut app = physics_app();
    spawn_floor(&mut app, GameLayer::Default);
    let body = spawn_sensing_body(
        &mut app,
        Vec3::new(0.0, 1.0, 0.0),
        MovementState::default(),
        RigidBody::Dynamic,
    );

    for _ in 0..10 {
        app.update();
    }

    let ground = app.world().get::<GroundContact>(body).expect("ground");
    assert!(!ground.grounded);
}

#[test]
fn test_losing_the_wall_ends_wallrun_same_frame() {
    let mut app = physics_app();
    let body = spawn_sensing_body(
        &mut app,
        Vec3::new(0.0, 5.0, 0.0),
        MovementState {
            locomotion: Locomotion::WallRunning(WallSide::Right),
            wallrun_held: true,
            ..default()
        },
        RigidBody::Kinematic,
    );
    app.world_mut()
        .get_mut::<GravityScale>(body)
        .expect("gravity")
        .0 = 0.0;

    app.update();

    let state = app.world().get::<MovementState>(body).expect("state");
    assert_eq!(state.locomotion, Locomotion::Standing);
    assert_eq!(app.world().get::<GravityScale>(body).expect("gravity").0, 1.0);
}

#[test]
fn test_wall_on_the_right_sets_right_only() {
    let mut app = physics_app();
    spawn_block(
        &mut app,
        Vec3::new(0.2, 4.0, 4.0),
        Vec3::new(0.8, 5.0, 0.0),
        GameLayer::Wall,
    );
    let body = spawn_sensing_body(
        &mut app,
        Vec3::new(0.0, 5.0, 0.0),
        MovementState::default(),
        RigidBody::Kinematic,
    );

    for _ in 0..5 {
        app.update();
    }

    let walls = app.world().get::<WallContact>(body).expect("walls");
    assert_eq!(
        *walls,
        WallContact {
            left: false,
            right: true,
        }
    );
}
