//! Movement domain: components and physics layers for locomotion.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::state::Locomotion;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Walkable surfaces (floors, ramps)
    Ground,
    /// Surfaces the player can run along
    Wall,
    /// Obstacles low enough to vault over
    Vaultable,
    /// Player character
    Player,
}

#[derive(Component, Debug)]
pub struct Player;

/// Locomotion state plus the small flags that ride alongside it.
#[derive(Component, Debug, Clone)]
pub struct MovementState {
    pub locomotion: Locomotion,
    pub sprinting: bool,
    /// Set between a ground jump and its cooldown expiring.
    pub jumping: bool,
    pub jump_ready: bool,
    pub crouch_ready: bool,
    pub wallrun_held: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            locomotion: Locomotion::Standing,
            sprinting: false,
            jumping: false,
            jump_ready: false,
            crouch_ready: true,
            wallrun_held: false,
        }
    }
}

/// Result of the slope-filtered contact test.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundContact {
    pub grounded: bool,
    /// Last qualifying contact normal.
    pub normal: Vec3,
}

impl Default for GroundContact {
    fn default() -> Self {
        Self {
            grounded: false,
            normal: Vec3::Y,
        }
    }
}

/// Result of the left/right wall rays, recomputed every frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right
    }

    /// Side a wall-run would attach to. Right wins when both rays hit.
    pub fn side(&self) -> Option<WallSide> {
        if self.right {
            Some(WallSide::Right)
        } else if self.left {
            Some(WallSide::Left)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Unit sign along the orientation's right axis pointing at the wall.
    pub fn sign(self) -> f32 {
        match self {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }
}

/// Yaw-only heading shared by movement, wall sensing and vaulting.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Orientation {
    /// Radians around world up. Zero faces -Z.
    pub yaw: f32,
}

impl Orientation {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Rotates a local direction into world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation() * local
    }
}

/// Mouse look accumulation and camera effects.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LookState {
    /// Degrees.
    pub yaw: f32,
    /// Degrees, positive looks down.
    pub pitch: f32,
    /// Camera roll while wall-running, degrees.
    pub tilt: f32,
    pub bob_timer: f32,
    /// Vertical head-bob offset added to the eye height.
    pub bob_offset: f32,
}

/// First-person camera following a body.
#[derive(Component, Debug)]
pub struct PlayerCamera {
    pub target: Entity,
}

/// Standing scale captured at spawn, restored when leaving a crouch.
#[derive(Component, Debug, Clone, Copy)]
pub struct StandingScale(pub Vec3);

/// Forces and impulses gathered during one fixed step.
///
/// Systems add to it in any order; `resolve_motor` folds it into the body's
/// velocity once per step and clears it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Motor {
    pub force: Vec3,
    pub impulse: Vec3,
}

impl Motor {
    /// Continuous force, integrated over the step.
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Instantaneous change in momentum.
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    /// Velocity after applying the accumulated force and impulse to a body of `mass`.
    pub fn resolve(&self, velocity: Vec3, mass: f32, dt: f32) -> Vec3 {
        if mass <= 0.0 {
            return velocity;
        }
        velocity + (self.impulse + self.force * dt) / mass
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
