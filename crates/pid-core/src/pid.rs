use crate::config::{validate_time_step, ConfigError, PidGains};

/// Discrete-time PID controller with a fixed sample period.
///
/// The integral term is plain Euler accumulation of `error * dt` with no
/// clamping and no anti-windup: under sustained error it grows without bound.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    dt: f64,
    integral: f64,
    previous_error: f64,
}

impl PidController {
    pub fn new(gains: PidGains, dt: f64) -> Result<Self, ConfigError> {
        validate_time_step(dt)?;
        gains.validate()?;
        Ok(Self {
            gains,
            dt,
            integral: 0.0,
            previous_error: 0.0,
        })
    }

    /// Compute the control signal for one sample and advance internal state.
    ///
    /// The first call differentiates against an error of zero.
    pub fn update(&mut self, setpoint: f64, measured: f64) -> f64 {
        let error = setpoint - measured;

        let p = self.gains.kp * error;

        self.integral += error * self.dt;
        let i = self.gains.ki * self.integral;

        let derivative = (error - self.previous_error) / self.dt;
        let d = self.gains.kd * derivative;

        self.previous_error = error;

        p + i + d
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }
}
