use crate::config::{ConfigError, SimulationConfig};
use crate::motor::MotorModel;
use crate::pacing::{NoPacing, Pacer, TimeBase};
use crate::pid::PidController;
use crate::plant::Plant;
use crate::record::{CycleRecord, Recorder};
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    /// `cycle` is the most recently executed cycle index.
    Running { cycle: u32 },
    Finished,
}

#[derive(Clone, Default, Debug, PartialEq)]
pub struct ExecutionStats {
    pub cycles_executed: u64,
    pub record_failures: u64,
    pub elapsed: Duration,
    pub final_speed: f64,
    pub final_error: f64,
}

/// Fixed-step closed loop: controller reads the plant, the plant absorbs the
/// control signal, the resulting state goes to the recorder.
pub struct SimulationLoop<P: Plant, R: Recorder, C: Pacer = NoPacing> {
    controller: PidController,
    plant: P,
    recorder: R,
    pacer: C,
    target_speed: f64,
    cycles: u32,
    state: LoopState,
    stats: ExecutionStats,
    timebase: Option<TimeBase>,
}

impl<R: Recorder, C: Pacer> SimulationLoop<MotorModel, R, C> {
    pub fn from_config(
        config: &SimulationConfig,
        recorder: R,
        pacer: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = PidController::new(config.gains, config.dt)?;
        let motor = MotorModel::new(config.motor)?;
        Ok(Self::new(
            controller,
            motor,
            config.target_speed,
            config.cycles,
            recorder,
            pacer,
        ))
    }
}

impl<P: Plant, R: Recorder, C: Pacer> SimulationLoop<P, R, C> {
    /// The loop steps the plant with the controller's own sample period.
    pub fn new(
        controller: PidController,
        plant: P,
        target_speed: f64,
        cycles: u32,
        recorder: R,
        pacer: C,
    ) -> Self {
        Self {
            controller,
            plant,
            recorder,
            pacer,
            target_speed,
            cycles,
            state: LoopState::NotStarted,
            stats: ExecutionStats::default(),
            timebase: None,
        }
    }

    /// Run every remaining cycle.
    pub fn run(&mut self) -> &ExecutionStats {
        while self.step().is_some() {}
        &self.stats
    }

    /// Execute one cycle. Returns `None` once all cycles have run.
    pub fn step(&mut self) -> Option<CycleRecord> {
        let cycle = match self.state {
            LoopState::Finished => return None,
            LoopState::NotStarted => {
                info!(
                    "Starting simulation loop: {} cycles, dt={}s, target={}",
                    self.cycles,
                    self.controller.dt(),
                    self.target_speed
                );
                self.timebase = Some(TimeBase::new());
                0
            }
            LoopState::Running { cycle } => cycle + 1,
        };

        if cycle >= self.cycles {
            self.finish();
            return None;
        }
        self.state = LoopState::Running { cycle };

        let dt = self.controller.dt();

        // Controller acts on the speed from before this step.
        let measured = self.plant.read_speed();
        let control_signal = self.controller.update(self.target_speed, measured);
        self.plant.apply(control_signal, dt);

        // The record reports the speed after this step.
        let actual_speed = self.plant.read_speed();
        let record = CycleRecord {
            cycle,
            target_speed: self.target_speed,
            actual_speed,
            error: self.target_speed - actual_speed,
            control_signal,
        };

        if let Err(e) = self.recorder.record(&record) {
            self.stats.record_failures += 1;
            warn!("Cycle {} not recorded: {}", cycle, e);
        }

        self.stats.cycles_executed += 1;
        self.stats.final_speed = record.actual_speed;
        self.stats.final_error = record.error;

        self.pacer.pause(dt);

        if cycle + 1 == self.cycles {
            self.finish();
        }
        Some(record)
    }

    fn finish(&mut self) {
        if self.state == LoopState::Finished {
            return;
        }
        self.state = LoopState::Finished;
        if let Some(timebase) = self.timebase {
            self.stats.elapsed = timebase.elapsed();
        }
        if let Err(e) = self.recorder.finish() {
            self.stats.record_failures += 1;
            warn!("Recorder failed to finish: {}", e);
        }
        debug!(
            "Simulation loop finished after {} cycles ({} record failures)",
            self.stats.cycles_executed, self.stats.record_failures
        );
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    pub fn controller(&self) -> &PidController {
        &self.controller
    }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }
}
