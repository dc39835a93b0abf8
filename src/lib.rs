//! Host-testable core of lcd-counter.
//!
//! Everything here is pure logic: no peripherals, no async, no logging.
//! The embedded binary (`main.rs`, `embedded` feature) samples the pins
//! and the LDR, feeds them into [`control::Controls`] and logs what comes
//! back.
//!
//! Usage: `cargo test --lib` (or `cargo test` for the integration tests too)

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod power_logic;
pub mod settings;
pub mod ui;
pub mod values;

pub use control::{
    ConfigStore, ControlTiming, Controls, DisplaySink, DisplayState, RawInputs, TickReport,
    TickStatus,
};
pub use error::{Error, PayloadError};
pub use settings::StoredConfig;
pub use ui::DimmingMode;
