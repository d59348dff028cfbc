/// A controlled system the simulation loop can drive.
pub trait Plant {
    /// Advance the plant by one step under the given control signal.
    fn apply(&mut self, control_signal: f64, dt: f64);
    fn read_speed(&self) -> f64;
}
