//! Movement domain: locomotion state machine and the transitions that drive it.

use bevy::prelude::*;

use crate::movement::shaper::{
    self, DriveContext, ShapeContext, clamp_input, counter_movement, velocity_relative_to_look,
};
use crate::movement::{
    ControllerTimers, GroundContact, Motor, MovementState, MovementTimer, MovementTuning,
    Orientation, WallContact, WallSide,
};

/// What the body is doing. Grounded/airborne is a sensor fact kept in
/// `GroundContact`; everything here is mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locomotion {
    #[default]
    Standing,
    Crouched,
    Sliding,
    WallRunning(WallSide),
    /// Tucked and being warped over an obstacle. `released` once the body has
    /// left the ground or the vault control was let go.
    Vaulting { released: bool },
}

impl Locomotion {
    /// True whenever the body is at crouch scale.
    pub fn is_crouched(&self) -> bool {
        matches!(
            self,
            Locomotion::Crouched | Locomotion::Sliding | Locomotion::Vaulting { .. }
        )
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self, Locomotion::Sliding)
    }

    pub fn is_vaulting(&self) -> bool {
        matches!(self, Locomotion::Vaulting { .. })
    }

    pub fn wall_side(&self) -> Option<WallSide> {
        match self {
            Locomotion::WallRunning(side) => Some(*side),
            _ => None,
        }
    }

    pub fn is_wall_running(&self) -> bool {
        self.wall_side().is_some()
    }

    pub fn can_transition_to(&self, next: Locomotion) -> bool {
        use Locomotion::*;
        match (self, next) {
            (Standing, Crouched | Sliding | WallRunning(_) | Vaulting { released: false }) => true,
            (Crouched, Standing | Sliding | Vaulting { released: false }) => true,
            (Sliding, Crouched | Standing) => true,
            (WallRunning(_), Standing | WallRunning(_)) => true,
            (Vaulting { .. }, Vaulting { released: true } | Standing | Crouched) => true,
            _ => false,
        }
    }
}

/// How a crouch was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrouchKind {
    /// Player pressed crouch. Gated by the crouch cooldown.
    Player,
    /// Vault tuck. Ignores the cooldown and never slides.
    Tuck,
}

impl MovementState {
    /// Moves to `next` if the state machine allows it.
    pub fn transition(&mut self, next: Locomotion) -> bool {
        if self.locomotion == next {
            return true;
        }
        if !self.locomotion.can_transition_to(next) {
            debug!("Rejected transition {:?} -> {:?}", self.locomotion, next);
            return false;
        }
        debug!("Locomotion {:?} -> {:?}", self.locomotion, next);
        self.locomotion = next;
        true
    }

    /// Shrinks the body and enters the crouched (or tucked) state.
    ///
    /// Shared by the crouch control and the vault controller.
    pub fn begin_crouch(
        &mut self,
        scale: &mut Vec3,
        standing_scale: Vec3,
        kind: CrouchKind,
        tuning: &MovementTuning,
    ) -> bool {
        let next = match kind {
            CrouchKind::Player => {
                if !self.crouch_ready || self.locomotion.is_crouched() {
                    return false;
                }
                Locomotion::Crouched
            }
            CrouchKind::Tuck => Locomotion::Vaulting { released: false },
        };
        if !self.transition(next) {
            return false;
        }
        if kind == CrouchKind::Player {
            self.crouch_ready = false;
        }
        *scale = crouch_scale(standing_scale, tuning);
        true
    }

    /// Restores standing scale and re-arms crouching after the cooldown.
    ///
    /// Shared by the crouch control and the vault controller.
    pub fn end_crouch(
        &mut self,
        scale: &mut Vec3,
        standing_scale: Vec3,
        timers: &mut ControllerTimers<MovementTimer>,
        tuning: &MovementTuning,
    ) -> bool {
        if !self.locomotion.is_crouched() || !self.transition(Locomotion::Standing) {
            return false;
        }
        *scale = standing_scale;
        self.crouch_ready = false;
        timers.schedule(MovementTimer::CrouchRearm, tuning.crouch_cooldown);
        true
    }

    /// Leaves wall-running. The caller restores gravity.
    pub fn stop_wallrun(&mut self) -> bool {
        if self.locomotion.is_wall_running() {
            debug!("Wallrun ended");
            return self.transition(Locomotion::Standing);
        }
        false
    }

    /// Engine gravity scale implied by the current state.
    pub fn gravity_scale(&self) -> f32 {
        if self.locomotion.is_wall_running() {
            0.0
        } else {
            1.0
        }
    }
}

pub fn crouch_scale(standing_scale: Vec3, tuning: &MovementTuning) -> Vec3 {
    Vec3::new(
        standing_scale.x,
        standing_scale.y * tuning.crouch_scale,
        standing_scale.z,
    )
}

/// Applies the effect of a fired movement timer.
pub fn apply_timer(
    key: MovementTimer,
    state: &mut MovementState,
    ground: &mut GroundContact,
) {
    match key {
        MovementTimer::Unground => {
            if ground.grounded {
                debug!("Left ground");
            }
            ground.grounded = false;
        }
        MovementTimer::JumpCooldown => {
            state.jump_ready = true;
            state.jumping = false;
        }
        MovementTimer::JumpRearm => state.jump_ready = true,
        MovementTimer::CrouchRearm => state.crouch_ready = true,
    }
}

/// Everything one fixed step of the movement controller reads and writes.
pub struct Locomotor<'a> {
    pub state: &'a mut MovementState,
    pub timers: &'a mut ControllerTimers<MovementTimer>,
    pub ground: &'a GroundContact,
    pub walls: &'a WallContact,
    pub orientation: &'a Orientation,
    pub velocity: &'a mut Vec3,
    pub motor: &'a mut Motor,
    pub scale: &'a mut Vec3,
    pub standing_scale: Vec3,
    pub tuning: &'a MovementTuning,
    pub dt: f32,
}

impl Locomotor<'_> {
    /// Ground jump. Silently does nothing when the guards fail.
    pub fn try_jump(&mut self) -> bool {
        let loc = self.state.locomotion;
        if !self.ground.grounded
            || !self.state.jump_ready
            || loc.is_wall_running()
            || loc.is_crouched()
        {
            return false;
        }

        self.motor
            .add_impulse(Vec3::Y * self.tuning.jump_impulse(self.dt));
        self.state.jump_ready = false;
        self.state.jumping = true;
        self.timers
            .schedule(MovementTimer::JumpCooldown, self.tuning.jump_cooldown);
        debug!("Jump");
        true
    }

    /// Crouch control pressed: crouch, and slide if moving fast on the ground.
    pub fn press_crouch(&mut self) -> bool {
        if !self.state.begin_crouch(
            self.scale,
            self.standing_scale,
            CrouchKind::Player,
            self.tuning,
        ) {
            return false;
        }

        if self.ground.grounded && self.velocity.length() > self.tuning.slide_velocity_threshold {
            let forward = horizontal(self.orientation.forward());
            self.motor
                .add_impulse(forward * self.tuning.slide_force * self.dt);
            self.state.transition(Locomotion::Sliding);
            debug!("Slide started at speed {:.2}", self.velocity.length());
        }
        true
    }

    /// Crouch control released. A vault tuck is left to the vault controller.
    pub fn release_crouch(&mut self) -> bool {
        if self.state.locomotion.is_vaulting() {
            return false;
        }
        self.state
            .end_crouch(self.scale, self.standing_scale, self.timers, self.tuning)
    }

    /// Ends a slide once it has bled off enough speed.
    pub fn update_slide(&mut self) {
        if self.state.locomotion.is_sliding()
            && self.velocity.length() < self.tuning.slide_stop_threshold
        {
            debug!("Slide ended");
            self.state.transition(Locomotion::Crouched);
        }
    }

    /// Wall-run entry and per-step wall forces.
    pub fn wallrun(&mut self) {
        let loc = self.state.locomotion;
        if loc.is_wall_running() && (self.ground.grounded || !self.state.wallrun_held) {
            self.state.stop_wallrun();
            return;
        }

        if !self.state.wallrun_held || self.ground.grounded {
            return;
        }
        let Some(side) = self.walls.side() else {
            return;
        };
        if !matches!(loc, Locomotion::Standing | Locomotion::WallRunning(_)) {
            return;
        }

        if !loc.is_wall_running() {
            debug!("Wallrun started on {:?} wall", side);
        }
        self.state.transition(Locomotion::WallRunning(side));

        if self.velocity.length() <= self.tuning.max_wall_speed {
            let momentum = horizontal(self.orientation.forward());
            self.motor
                .add_force(momentum * self.tuning.wallrun_force * self.dt);
            self.motor.add_force(
                self.orientation.right() * side.sign() * self.tuning.wallrun_force / 7.0
                    * self.dt,
            );
        }
    }

    /// Wallrun control released: leap off the wall if currently on one.
    pub fn release_wallrun(&mut self) -> bool {
        self.state.wallrun_held = false;
        let Some(side) = self.state.locomotion.wall_side() else {
            return false;
        };

        self.state.jump_ready = false;
        let jump_force = self.tuning.jump_force;
        let dt = self.dt;
        self.motor
            .add_impulse(self.orientation.forward() * jump_force * 0.7 * dt);
        self.motor.add_impulse(Vec3::Y * jump_force * 0.5 * dt);
        self.motor
            .add_impulse(self.orientation.right() * -side.sign() * jump_force * 0.3 * dt);
        debug!("Wall jump off {:?} wall", side);

        self.state.stop_wallrun();
        true
    }

    /// Counter-movement, speed limiting and the input drive force.
    pub fn drive(&mut self, input: Vec2) {
        let loc = self.state.locomotion;
        if loc.is_wall_running() {
            return;
        }

        self.motor
            .add_force(shaper::extra_gravity(self.dt, self.tuning));

        let relative = velocity_relative_to_look(*self.velocity, self.orientation.yaw);
        counter_movement(
            ShapeContext {
                grounded: self.ground.grounded,
                jumping: self.state.jumping,
                sliding: loc.is_sliding(),
                dt: self.dt,
            },
            input,
            relative,
            self.orientation,
            self.velocity,
            self.motor,
            self.tuning,
        );

        let input = clamp_input(input, relative, self.tuning.max_speed);
        let force = shaper::drive_force(
            DriveContext {
                grounded: self.ground.grounded,
                wall_running: false,
                sliding: loc.is_sliding(),
                crouched: loc.is_crouched(),
                sprinting: self.state.sprinting,
            },
            input,
            self.orientation,
            self.dt,
            self.tuning,
        );
        self.motor.add_force(force);
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
