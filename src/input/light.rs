//! Ambient light classification from the LDR.
//!
//! Two debounced bands sit around the calibrated baseline. Dropping into
//! the dark band starts an occlusion; how long it lasts decides what it
//! was:
//!
//! ```text
//!   dwell < min swipe          -> flicker, ignored
//!   min swipe <= dwell < max   -> swipe (reported when light returns)
//!   dwell >= max               -> room darkened (reported as soon as max is reached)
//! ```
//!
//! After the room has gone dark, the light band of the dark baseline
//! detects the lights coming back on. Every confirmed room change
//! recalibrates, and the baseline is also refreshed periodically.

use super::calibration::{Calibrator, Thresholds};
use super::debounce::{Debouncer, Edge};
use crate::config::{
    LDR_DARK_ROOM_LEVEL, LDR_DEBOUNCE_MS, LDR_RECALIBRATION_MS, MAX_SWIPE_DARKNESS_MS,
    MIN_SWIPE_DARKNESS_MS,
};

/// What the light channel concluded on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightEvent {
    None,
    /// Sensor was briefly covered and uncovered.
    Swipe { dwell_ms: u64 },
    /// Darkness lasted long enough to be the room lights going off.
    RoomDarkened { thresholds: Thresholds },
    /// The room lit up again after being dark.
    RoomLightened { thresholds: Thresholds },
    /// Baseline refreshed without a room change.
    Recalibrated { thresholds: Thresholds },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightTiming {
    pub debounce_ms: u64,
    pub min_swipe_ms: u64,
    pub max_swipe_ms: u64,
    pub recalibration_ms: u64,
}

impl Default for LightTiming {
    fn default() -> Self {
        Self {
            debounce_ms: LDR_DEBOUNCE_MS,
            min_swipe_ms: MIN_SWIPE_DARKNESS_MS,
            max_swipe_ms: MAX_SWIPE_DARKNESS_MS,
            recalibration_ms: LDR_RECALIBRATION_MS,
        }
    }
}

pub struct LightChannel {
    timing: LightTiming,
    calibrator: Calibrator,
    thresholds: Thresholds,
    below_dark: Debouncer,
    above_light: Debouncer,
    /// Start of the current occlusion, if the sensor is covered.
    dark_since: Option<u64>,
    room_dark: bool,
    calibrated_at: u64,
}

impl LightChannel {
    /// Calibrate on the startup reading.
    ///
    /// A startup reading at or below [`LDR_DARK_ROOM_LEVEL`] means the unit
    /// was powered up in a dark room.
    pub fn new(timing: LightTiming, calibrator: Calibrator, reading: u16, now_ms: u64) -> Self {
        let thresholds = calibrator.calibrate(reading);
        Self {
            timing,
            calibrator,
            below_dark: Debouncer::new(
                thresholds.is_below_dark(reading),
                timing.debounce_ms,
                now_ms,
            ),
            above_light: Debouncer::new(
                thresholds.is_above_light(reading),
                timing.debounce_ms,
                now_ms,
            ),
            thresholds,
            dark_since: None,
            room_dark: reading <= LDR_DARK_ROOM_LEVEL,
            calibrated_at: now_ms,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn is_room_dark(&self) -> bool {
        self.room_dark
    }

    /// `true` while the sensor is covered and the outcome is undecided.
    pub fn is_occluded(&self) -> bool {
        self.dark_since.is_some()
    }

    /// Re-center the bands on `reading` right now.
    pub fn recalibrate(&mut self, reading: u16, now_ms: u64) -> Thresholds {
        self.thresholds = self.calibrator.calibrate(reading);
        self.below_dark
            .reset(self.thresholds.is_below_dark(reading), now_ms);
        self.above_light
            .reset(self.thresholds.is_above_light(reading), now_ms);
        self.dark_since = None;
        self.calibrated_at = now_ms;
        self.thresholds
    }

    /// Evaluate one reading taken at `now_ms`.
    pub fn poll(&mut self, reading: u16, now_ms: u64) -> LightEvent {
        let dark_edge = self
            .below_dark
            .observe(self.thresholds.is_below_dark(reading), now_ms);
        let light_edge = self
            .above_light
            .observe(self.thresholds.is_above_light(reading), now_ms);

        if let Some(since) = self.dark_since {
            let dwell = now_ms.saturating_sub(since);

            // Only decide while the sensor still reads dark; a pending exit
            // is settled by the falling edge below.
            if dwell >= self.timing.max_swipe_ms && !self.below_dark.is_pending() {
                let thresholds = self.recalibrate(reading, now_ms);
                let already_dark = core::mem::replace(&mut self.room_dark, true);
                return if already_dark {
                    LightEvent::Recalibrated { thresholds }
                } else {
                    LightEvent::RoomDarkened { thresholds }
                };
            }

            if dark_edge == Edge::Falling {
                self.dark_since = None;
                if dwell >= self.timing.min_swipe_ms && dwell < self.timing.max_swipe_ms {
                    return LightEvent::Swipe { dwell_ms: dwell };
                }
            }
            return LightEvent::None;
        }

        if dark_edge == Edge::Rising {
            self.dark_since = Some(now_ms);
            return LightEvent::None;
        }

        if light_edge == Edge::Rising {
            let thresholds = self.recalibrate(reading, now_ms);
            return if core::mem::replace(&mut self.room_dark, false) {
                LightEvent::RoomLightened { thresholds }
            } else {
                LightEvent::Recalibrated { thresholds }
            };
        }

        if now_ms.saturating_sub(self.calibrated_at) >= self.timing.recalibration_ms
            && !self.below_dark.is_pending()
            && !self.above_light.is_pending()
        {
            let thresholds = self.recalibrate(reading, now_ms);
            return LightEvent::Recalibrated { thresholds };
        }

        LightEvent::None
    }
}
