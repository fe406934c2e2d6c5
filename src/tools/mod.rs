pub mod classify;
pub mod format;
pub mod position;
pub mod pricing;
pub mod response_types;
pub mod simulate;
pub mod strategies;
