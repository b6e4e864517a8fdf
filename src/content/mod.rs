//! Content domain: data-driven tuning for the movement and parkour controllers.

mod loader;
mod validation;

pub use loader::{LoadErrorKind, TuningLoadError, load_tuning_file, parse_tuning};
pub use validation::{InvalidTuning, validate_tuning};

use bevy::ecs::error::BevyError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::movement::MovementTuning;
use crate::parkour::ParkourTuning;

/// Default location of the tuning file, relative to the working directory.
pub const DEFAULT_TUNING_PATH: &str = "assets/data/movement_tuning.ron";

/// Environment variable that overrides `DEFAULT_TUNING_PATH`.
pub const TUNING_PATH_ENV: &str = "PARKOUR_TUNING";

/// Top-level shape of the tuning file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TuningFile {
    pub movement: MovementTuning,
    pub parkour: ParkourTuning,
}

pub fn tuning_path() -> PathBuf {
    std::env::var_os(TUNING_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TUNING_PATH))
}

/// Why the tuning could not be used. Both abort startup.
#[derive(Debug)]
pub enum TuningError {
    Load(TuningLoadError),
    Invalid(InvalidTuning),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Load(e) => write!(f, "{}", e),
            TuningError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TuningError {}

/// Resolve a load result into usable tuning. A missing or unreadable file
/// falls back to defaults; a file that fails to parse or holds out-of-range
/// values is fatal.
pub fn resolve_tuning(
    loaded: Result<TuningFile, TuningLoadError>,
) -> Result<TuningFile, TuningError> {
    let tuning = match loaded {
        Ok(tuning) => tuning,
        Err(e) if e.kind == LoadErrorKind::Parse => {
            error!("{}", e);
            return Err(TuningError::Load(e));
        }
        Err(e) => {
            warn!("{}, using default tuning", e);
            TuningFile::default()
        }
    };

    let errors = validate_tuning(&tuning);
    if errors.is_empty() {
        Ok(tuning)
    } else {
        Err(TuningError::Invalid(InvalidTuning(errors)))
    }
}

fn load_tuning(mut commands: Commands) -> Result<(), BevyError> {
    let path = tuning_path();
    let tuning = resolve_tuning(load_tuning_file(&path))?;

    info!(
        "Loaded tuning from {}: max_slope={}, max_speed={}, vault_speed={}",
        path.display(),
        tuning.movement.max_slope_angle,
        tuning.movement.max_speed,
        tuning.parkour.vault_speed
    );

    commands.insert_resource(tuning.movement);
    commands.insert_resource(tuning.parkour);
    Ok(())
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovementTuning>()
            .register_type::<ParkourTuning>()
            .add_systems(PreStartup, load_tuning);
    }
}
