pub mod evolution;
pub mod operators;
pub mod orchestrator;
pub mod progress;

pub use evolution::{EvolutionEngine, RunOutcome};
pub use operators::Operators;
pub use orchestrator::Optimizer;
pub use progress::{
    ChannelProgress, ConsoleProgress, GenerationUpdate, NullProgress, ProgressCallback,
};
