pub mod config;
pub mod control_loop;
pub mod motor;
pub mod pacing;
pub mod pid;
pub mod plant;
pub mod record;

pub use config::{ConfigError, MotorParams, PidGains, SimulationConfig};
pub use control_loop::{ExecutionStats, LoopState, SimulationLoop};
pub use motor::MotorModel;
pub use pacing::{NoPacing, Pacer, TimeBase, WallClockPacer};
pub use pid::PidController;
pub use plant::Plant;
pub use record::{CycleRecord, NullRecorder, RecordError, Recorder};
