//! Sanity checks on tuning values before the controller is built from them.

use super::TuningFile;

/// A tuning value outside its usable range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub section: &'static str,
    pub field: &'static str,
    pub value: f32,
    pub expected: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} = {} (expected {})",
            self.section, self.field, self.value, self.expected
        )
    }
}

/// All problems found in a tuning file; fatal at startup.
#[derive(Debug)]
pub struct InvalidTuning(pub Vec<ValidationError>);

impl std::fmt::Display for InvalidTuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid movement tuning:")?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidTuning {}

/// Helper macro for checking a value against a condition
macro_rules! check {
    ($errors:expr, $section:expr, $owner:expr, $field:ident, $cond:expr, $expected:expr) => {
        let value = $owner.$field;
        if !($cond)(value) {
            $errors.push(ValidationError {
                section: $section,
                field: stringify!($field),
                value,
                expected: $expected,
            });
        }
    };
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn unit(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Validate every tuning value.
/// Returns a list of validation errors, empty if the tuning is usable.
pub fn validate_tuning(tuning: &TuningFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let m = &tuning.movement;

    check!(errors, "movement", m, max_slope_angle, |v: f32| v > 0.0 && v < 90.0, "between 0 and 90 degrees");
    check!(errors, "movement", m, unground_delay_steps, non_negative, ">= 0");
    check!(errors, "movement", m, walk_speed, positive, "> 0");
    check!(errors, "movement", m, run_speed, positive, "> 0");
    check!(errors, "movement", m, max_speed, positive, "> 0");
    check!(errors, "movement", m, crouch_speed_multiplier, unit, "between 0 and 1");
    check!(errors, "movement", m, air_control, unit, "between 0 and 1");
    check!(errors, "movement", m, counter_movement, non_negative, ">= 0");
    check!(errors, "movement", m, counter_threshold, non_negative, ">= 0");
    check!(errors, "movement", m, body_mass, positive, "> 0");
    check!(errors, "movement", m, jump_force, non_negative, ">= 0");
    check!(errors, "movement", m, jump_cooldown, non_negative, ">= 0");
    check!(errors, "movement", m, spawn_jump_delay, non_negative, ">= 0");
    check!(errors, "movement", m, slide_force, non_negative, ">= 0");
    check!(errors, "movement", m, slide_counter_movement, non_negative, ">= 0");
    check!(errors, "movement", m, slide_stop_threshold, non_negative, ">= 0");
    check!(errors, "movement", m, crouch_cooldown, non_negative, ">= 0");
    check!(errors, "movement", m, crouch_scale, |v: f32| v > 0.0 && v <= 1.0, "in (0, 1]");
    check!(errors, "movement", m, wall_check_distance, positive, "> 0");
    check!(errors, "movement", m, max_wall_speed, non_negative, ">= 0");
    check!(errors, "movement", m, max_wallrun_camera_tilt, |v: f32| (0.0..90.0).contains(&v), "between 0 and 90 degrees");
    check!(errors, "movement", m, min_pitch, |v: f32| v >= -90.0, ">= -90 degrees");
    check!(errors, "movement", m, max_pitch, |v: f32| v <= 90.0, "<= 90 degrees");
    check!(errors, "movement", m, body_radius, positive, "> 0");

    if m.slide_stop_threshold > m.slide_velocity_threshold {
        errors.push(ValidationError {
            section: "movement",
            field: "slide_stop_threshold",
            value: m.slide_stop_threshold,
            expected: "<= slide_velocity_threshold",
        });
    }
    if m.min_pitch > m.max_pitch {
        errors.push(ValidationError {
            section: "movement",
            field: "min_pitch",
            value: m.min_pitch,
            expected: "<= max_pitch",
        });
    }
    if m.body_height < 2.0 * m.body_radius {
        errors.push(ValidationError {
            section: "movement",
            field: "body_height",
            value: m.body_height,
            expected: ">= 2 * body_radius",
        });
    }

    let p = &tuning.parkour;
    check!(errors, "parkour", p, vault_speed, non_negative, ">= 0");
    check!(errors, "parkour", p, vault_check_distance, positive, "> 0");
    check!(errors, "parkour", p, vault_lift, non_negative, ">= 0");
    check!(errors, "parkour", p, vault_recover_delay, non_negative, ">= 0");

    errors
}
