pub mod agent;
pub mod agents;
pub mod bridge;
pub mod collision;
pub mod command;
pub mod engine;
pub mod mask;
pub mod match_loop;
pub mod outcome;
pub mod physics;
pub mod sprite;
pub mod world;

pub use agent::{DecisionAgent, NoopAgent};
pub use engine::{ControlMode, Engine, EngineError, HumanInput, SnapshotCell, StopHandle};
pub use match_loop::{run_match, step_tick};
pub use world::WorldState;
