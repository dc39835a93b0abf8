//! Input classification - two push buttons and the LDR.
//!
//! ## Components
//!
//! - **Debouncer**: time-based edge tracker shared by every input
//! - **Buttons**: quick press / hold press classification on release
//! - **Light**: swipe gesture vs room darkening / lightening
//! - **Calibration**: adaptive hysteresis band around the ambient level
//!
//! Everything here is pure logic driven by a millisecond timestamp, so it
//! runs unchanged on the host for tests.

pub mod button;
pub mod calibration;
pub mod debounce;
pub mod light;

pub use button::{ButtonAction, ButtonChannel, ButtonId, ButtonTiming};
pub use calibration::{Calibrator, MarginPolicy, Thresholds};
pub use debounce::{Debouncer, Edge};
pub use light::{LightChannel, LightEvent, LightTiming};
