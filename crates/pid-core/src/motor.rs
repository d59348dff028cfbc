use crate::config::{ConfigError, MotorParams};
use crate::plant::Plant;

/// First-order motor: control signal acts as a force on an effective mass,
/// with linear friction opposing the direction of motion.
#[derive(Debug, Clone)]
pub struct MotorModel {
    inertia: f64,
    friction: f64,
    current_speed: f64,
}

impl MotorModel {
    /// Motor at rest.
    pub fn new(params: MotorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            inertia: params.inertia,
            friction: params.friction,
            current_speed: 0.0,
        })
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.current_speed = speed;
        self
    }

    /// One Euler step. Friction uses the speed after this step's acceleration,
    /// and is not clamped: a large `friction * dt` can carry the speed past zero.
    pub fn update(&mut self, control_signal: f64, dt: f64) {
        let acceleration = control_signal / self.inertia;
        self.current_speed += acceleration * dt;

        if self.current_speed > 0.0 {
            self.current_speed -= self.friction * self.current_speed * dt;
        } else if self.current_speed < 0.0 {
            self.current_speed += self.friction * -self.current_speed * dt;
        }
    }

    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }
}

impl Plant for MotorModel {
    fn apply(&mut self, control_signal: f64, dt: f64) {
        self.update(control_signal, dt);
    }

    fn read_speed(&self) -> f64 {
        self.current_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor(inertia: f64, friction: f64) -> MotorModel {
        MotorModel::new(MotorParams::new(inertia, friction)).unwrap()
    }

    #[test]
    fn starts_at_rest() {
        assert_eq!(motor(0.1, 0.05).current_speed(), 0.0);
    }

    #[test]
    fn rejects_zero_inertia() {
        assert!(matches!(
            MotorModel::new(MotorParams::new(0.0, 0.05)),
            Err(ConfigError::InvalidInertia { .. })
        ));
    }

    #[test]
    fn frictionless_motor_integrates_signal() {
        let mut m = motor(1.0, 0.0);
        let (c, dt) = (2.0, 0.25);
        for n in 1..=20 {
            m.update(c, dt);
            assert_eq!(m.current_speed(), c * dt * n as f64);
        }
    }

    #[test]
    fn friction_applies_after_acceleration() {
        let mut m = motor(0.5, 0.1);
        m.update(1.0, 0.1);
        // 0 + (1/0.5)*0.1 = 0.2, then 0.2 - 0.1*0.2*0.1
        assert!((m.current_speed() - 0.198).abs() < 1e-12);
    }

    #[test]
    fn friction_opposes_negative_speed() {
        let mut m = motor(1.0, 0.5).with_speed(-4.0);
        m.update(0.0, 0.1);
        assert!((m.current_speed() - -3.8).abs() < 1e-12);
    }

    #[test]
    fn friction_decay_is_strictly_decreasing() {
        let mut m = motor(1.0, 0.3).with_speed(10.0);
        let mut last = m.current_speed();
        for _ in 0..100 {
            m.update(0.0, 0.1);
            assert!(m.current_speed() < last);
            assert!(m.current_speed() > 0.0);
            last = m.current_speed();
        }
    }

    #[test]
    fn large_friction_step_overshoots_zero() {
        // friction * dt = 3 flips the sign and is left uncorrected.
        let mut m = motor(1.0, 30.0).with_speed(1.0);
        m.update(0.0, 0.1);
        assert!((m.current_speed() - -2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_speed_gets_no_friction() {
        let mut m = motor(1.0, 100.0);
        m.update(0.0, 0.1);
        assert_eq!(m.current_speed(), 0.0);
    }
}
