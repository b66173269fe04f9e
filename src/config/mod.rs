pub mod optimization;

pub use optimization::OptimizationConfig;
