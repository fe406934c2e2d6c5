// float_cmp: only in tests where assert_eq! on f64 is intentional.
#![cfg_attr(test, allow(clippy::float_cmp))]
// Cast lints: controlled numeric casts throughout (day counts, indices, etc.).
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod server;
pub mod strategies;
pub mod tools;
