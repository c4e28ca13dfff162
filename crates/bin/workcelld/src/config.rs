//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `workcell.toml` in the working directory (or the path in
//! `WORKCELL_CONFIG`). Every field is optional and defaults to an empty
//! workcell; when no file exists at all, a demo workcell is used instead.
//! Environment variables take precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use workcell_domain::action::ActionPolicy;
use workcell_domain::door::{Door, DoorState, Plane};
use workcell_domain::tower::{JointPositions, TowerDescriptor};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulated time settings.
    pub simulation: SimulationConfig,
    /// Action/door coupling.
    pub actions: ActionsConfig,
    /// Devices with a single on/off action.
    pub smart_devices: Vec<SmartDeviceConfig>,
    /// The Tower-of-Hanoi apparatus.
    pub hanoi: HanoiConfig,
    /// Steps executed in order by the plan runner.
    pub plan: Vec<PlanStep>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Simulation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Factor applied to every wait; `0` runs the plan without sleeping.
    pub time_scale: f64,
}

/// Action configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Policy applied to every smart device without its own override.
    pub policy: ActionPolicy,
}

/// A device with a door-coupled (or not) action.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartDeviceConfig {
    pub name: String,
    pub action: String,
    #[serde(default)]
    pub door: Option<Door>,
    /// Overrides `[actions] policy` for this device.
    #[serde(default)]
    pub policy: Option<ActionPolicy>,
}

/// One seeded ring.
#[derive(Debug, Clone, Deserialize)]
pub struct RingSeed {
    pub key: String,
    pub value: String,
}

/// Tower-of-Hanoi apparatus configuration.
///
/// Rings and towers start empty; nothing is seeded unless listed.
#[derive(Debug, Deserialize)]
pub struct HanoiConfig {
    #[serde(default = "default_hanoi_name")]
    pub name: String,
    #[serde(default)]
    pub door: Option<Door>,
    #[serde(default = "default_max_rings")]
    pub max_rings: usize,
    #[serde(default)]
    pub rings: Vec<RingSeed>,
    #[serde(default)]
    pub towers: Vec<TowerDescriptor>,
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanStep {
    RunAction {
        device: String,
        #[serde(default, with = "workcell_domain::time::secs_f64")]
        delay: Duration,
    },
    StopAction {
        device: String,
        #[serde(default, with = "workcell_domain::time::secs_f64")]
        delay: Duration,
    },
    SetDoor {
        device: String,
        state: DoorState,
    },
    AddRing {
        key: String,
        value: String,
    },
    RemoveRing {
        key: String,
    },
    MoveRing {
        from: String,
        to: String,
    },
}

impl Config {
    /// Load configuration from `workcell.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WORKCELL_CONFIG").unwrap_or_else(|_| "workcell.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::demo()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("WORKCELL_TIME_SCALE") {
            if let Ok(scale) = val.parse() {
                self.simulation.time_scale = scale;
            }
        }
        if let Ok(val) = std::env::var("WORKCELL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.simulation.time_scale;
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "time_scale must be finite and non-negative, got {scale}"
            )));
        }

        let mut device_names = HashSet::new();
        for device in self.smart_devices.iter().map(|d| &d.name).chain([&self.hanoi.name]) {
            if !device_names.insert(device.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate device name `{device}`"
                )));
            }
        }

        let mut tower_names = HashSet::new();
        for tower in &self.hanoi.towers {
            if !tower_names.insert(tower.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate tower name `{}`",
                    tower.name
                )));
            }
        }

        if self.hanoi.rings.len() > self.hanoi.max_rings {
            return Err(ConfigError::Validation(format!(
                "{} seeded rings exceed max_rings = {}",
                self.hanoi.rings.len(),
                self.hanoi.max_rings
            )));
        }

        for step in &self.plan {
            match step {
                PlanStep::RunAction { device, .. } | PlanStep::StopAction { device, .. } => {
                    if !self.smart_devices.iter().any(|d| &d.name == device) {
                        return Err(unknown("smart device", device));
                    }
                }
                PlanStep::SetDoor { device, .. } => {
                    if !device_names.contains(device.as_str()) {
                        return Err(unknown("device", device));
                    }
                }
                PlanStep::MoveRing { from, to } => {
                    for tower in [from, to] {
                        if !tower_names.contains(tower.as_str()) {
                            return Err(unknown("tower", tower));
                        }
                    }
                }
                PlanStep::AddRing { .. } | PlanStep::RemoveRing { .. } => {}
            }
        }
        Ok(())
    }
}

fn unknown(kind: &str, name: &str) -> ConfigError {
    ConfigError::Validation(format!("plan references unknown {kind} `{name}`"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "workcelld=info,workcell=info".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

fn default_hanoi_name() -> String {
    "Tower of Hanoi".to_string()
}

fn default_max_rings() -> usize {
    3
}

impl Default for HanoiConfig {
    fn default() -> Self {
        Self {
            name: default_hanoi_name(),
            door: None,
            max_rings: default_max_rings(),
            rings: Vec::new(),
            towers: Vec::new(),
        }
    }
}

fn arm_pose(waist: f64, shoulder: f64, elbow: f64, wrist_angle: f64) -> JointPositions {
    JointPositions::new()
        .with("waist", waist)
        .with("shoulder", shoulder)
        .with("elbow", elbow)
        .with("wrist_angle", wrist_angle)
}

fn demo_tower(name: &str, waist: f64) -> TowerDescriptor {
    TowerDescriptor {
        name: name.to_string(),
        approach: arm_pose(waist, -0.60, 0.35, 1.20),
        pickup: arm_pose(waist, 0.45, 0.55, 0.55),
        pickup_safe_height: arm_pose(waist, 0.10, 0.20, 1.25),
    }
}

impl Config {
    /// Demo workcell used when no configuration file exists: a centrifuge
    /// cycle around a solved three-ring puzzle.
    #[must_use]
    pub fn demo() -> Self {
        let centrifuge = SmartDeviceConfig {
            name: "Centrifuge".to_string(),
            action: "spin".to_string(),
            door: Some(Door::new(
                Plane::Top,
                DoorState::Closed,
                Duration::from_secs(1),
            )),
            policy: None,
        };
        let hanoi = HanoiConfig {
            rings: [("small", "red"), ("medium", "green"), ("large", "blue")]
                .into_iter()
                .map(|(key, value)| RingSeed {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            towers: vec![
                demo_tower("A", -0.45),
                demo_tower("B", 0.0),
                demo_tower("C", 0.45),
            ],
            ..HanoiConfig::default()
        };

        let run = PlanStep::RunAction {
            device: centrifuge.name.clone(),
            delay: Duration::from_secs(2),
        };
        let stop = PlanStep::StopAction {
            device: centrifuge.name.clone(),
            delay: Duration::from_secs(1),
        };
        let moves = [
            ("A", "C"),
            ("A", "B"),
            ("C", "B"),
            ("A", "C"),
            ("B", "A"),
            ("B", "C"),
            ("A", "C"),
        ]
        .into_iter()
        .map(|(from, to)| PlanStep::MoveRing {
            from: from.to_string(),
            to: to.to_string(),
        });

        Self {
            smart_devices: vec![centrifuge],
            hanoi,
            plan: std::iter::once(run).chain(moves).chain([stop]).collect(),
            ..Self::default()
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
