pub mod exits;
pub mod iv;
pub mod metrics;
pub mod position;
pub mod pricing;
pub mod recognition;
pub mod simulator;
pub mod types;
pub mod volatility;
