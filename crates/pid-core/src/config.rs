use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CYCLES: u32 = 200;
pub const DEFAULT_TIME_STEP_S: f64 = 0.05;
pub const DEFAULT_TARGET_SPEED: f64 = 100.0;

/// Construction-time contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("time step must be finite and positive (got {dt})")]
    InvalidTimeStep { dt: f64 },

    #[error("inertia must be finite and non-zero (got {inertia})")]
    InvalidInertia { inertia: f64 },

    #[error("friction must be finite and non-negative (got {friction})")]
    InvalidFriction { friction: f64 },

    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("malformed configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

impl Default for PidGains {
    fn default() -> Self {
        Self::new(0.5, 0.1, 0.02)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    pub inertia: f64,
    pub friction: f64,
}

impl MotorParams {
    pub const fn new(inertia: f64, friction: f64) -> Self {
        Self { inertia, friction }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.inertia.is_finite() || self.inertia == 0.0 {
            return Err(ConfigError::InvalidInertia {
                inertia: self.inertia,
            });
        }
        if !self.friction.is_finite() || self.friction < 0.0 {
            return Err(ConfigError::InvalidFriction {
                friction: self.friction,
            });
        }
        Ok(())
    }
}

impl Default for MotorParams {
    fn default() -> Self {
        Self::new(0.1, 0.05)
    }
}

/// Everything one run needs, fixed for its whole duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub cycles: u32,
    pub dt: f64,
    pub target_speed: f64,
    pub gains: PidGains,
    pub motor: MotorParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            dt: DEFAULT_TIME_STEP_S,
            target_speed: DEFAULT_TARGET_SPEED,
            gains: PidGains::default(),
            motor: MotorParams::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_time_step(self.dt)?;
        if !self.target_speed.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "target_speed",
                value: self.target_speed,
            });
        }
        self.gains.validate()?;
        self.motor.validate()
    }

    /// Nominal simulated duration in seconds.
    pub fn duration_s(&self) -> f64 {
        f64::from(self.cycles) * self.dt
    }
}

pub(crate) fn validate_time_step(dt: f64) -> Result<(), ConfigError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTimeStep { dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.cycles, 200);
        assert_eq!(cfg.dt, 0.05);
        assert_eq!(cfg.target_speed, 100.0);
        assert_eq!(cfg.gains, PidGains::new(0.5, 0.1, 0.02));
        assert_eq!(cfg.motor, MotorParams::new(0.1, 0.05));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimulationConfig::from_json_str(r#"{"cycles": 10, "gains": {"kp": 1.0}}"#)
            .unwrap();
        assert_eq!(cfg.cycles, 10);
        assert_eq!(cfg.gains, PidGains::new(1.0, 0.1, 0.02));
        assert_eq!(cfg.dt, DEFAULT_TIME_STEP_S);
        assert_eq!(cfg.motor, MotorParams::default());
    }

    #[test]
    fn rejects_malformed_json() {
        let res = SimulationConfig::from_json_str("{ cycles: ");
        assert!(matches!(res, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_non_positive_dt() {
        for dt in [0.0, -0.05, f64::NAN, f64::INFINITY] {
            let cfg = SimulationConfig {
                dt,
                ..Default::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidTimeStep { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_inertia_and_negative_friction() {
        assert!(matches!(
            MotorParams::new(0.0, 0.05).validate(),
            Err(ConfigError::InvalidInertia { .. })
        ));
        assert!(matches!(
            MotorParams::new(0.1, -1.0).validate(),
            Err(ConfigError::InvalidFriction { .. })
        ));
    }

    #[test]
    fn rejects_nan_gain() {
        let res = PidGains::new(0.5, f64::NAN, 0.0).validate();
        assert_eq!(
            res.unwrap_err().to_string(),
            "ki must be finite (got NaN)"
        );
    }
}
