//! Adaptive LDR threshold calibration.
//!
//! The dark and light thresholds are placed around the latest ambient
//! reading (the baseline). The gap between them is the hysteresis band
//! that keeps the classifier from flapping on sensor noise.

use crate::config::{
    LDR_FIXED_MARGIN, LDR_RELATIVE_ABOVE_PERCENT, LDR_RELATIVE_BELOW_PERCENT, LDR_RELATIVE_FLOOR,
    LDR_SENSOR_MAX,
};

/// How far from the baseline the thresholds are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarginPolicy {
    /// Same distance below and above the baseline.
    Fixed { margin: u16 },
    /// A percentage of the baseline on each side, never less than `floor`.
    Relative {
        below_percent: u8,
        above_percent: u8,
        floor: u16,
    },
}

impl MarginPolicy {
    pub const fn fixed() -> Self {
        MarginPolicy::Fixed {
            margin: LDR_FIXED_MARGIN,
        }
    }

    pub const fn relative() -> Self {
        MarginPolicy::Relative {
            below_percent: LDR_RELATIVE_BELOW_PERCENT,
            above_percent: LDR_RELATIVE_ABOVE_PERCENT,
            floor: LDR_RELATIVE_FLOOR,
        }
    }

    /// `(below, above)` distances for a baseline.
    fn margins(self, baseline: u16) -> (u16, u16) {
        match self {
            MarginPolicy::Fixed { margin } => (margin, margin),
            MarginPolicy::Relative {
                below_percent,
                above_percent,
                floor,
            } => (
                percent_of(baseline, below_percent).max(floor),
                percent_of(baseline, above_percent).max(floor),
            ),
        }
    }
}

impl Default for MarginPolicy {
    fn default() -> Self {
        Self::fixed()
    }
}

fn percent_of(value: u16, percent: u8) -> u16 {
    let scaled = u32::from(value) * u32::from(percent) / 100;
    scaled.min(u32::from(u16::MAX)) as u16
}

/// A calibrated hysteresis band. `dark < light` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub baseline: u16,
    pub dark: u16,
    pub light: u16,
}

impl Thresholds {
    pub fn is_below_dark(&self, reading: u16) -> bool {
        reading <= self.dark
    }

    pub fn is_above_light(&self, reading: u16) -> bool {
        reading >= self.light
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calibrator {
    policy: MarginPolicy,
    sensor_max: u16,
}

impl Calibrator {
    pub fn new(policy: MarginPolicy, sensor_max: u16) -> Self {
        Self {
            policy,
            sensor_max: sensor_max.max(1),
        }
    }

    /// Center a new band on `reading`.
    ///
    /// Out-of-range readings are clamped to the sensor range first. Each
    /// margin is at least 1, so even a saturated baseline yields a band
    /// with `dark < light`.
    pub fn calibrate(&self, reading: u16) -> Thresholds {
        let baseline = reading.min(self.sensor_max);
        let (below, above) = self.policy.margins(baseline);
        let below = below.clamp(1, self.sensor_max);
        let above = above.clamp(1, self.sensor_max);

        let mut dark = baseline.saturating_sub(below);
        let mut light = baseline.saturating_add(above).min(self.sensor_max);

        // Clipping can only collapse the band at the rails.
        if dark >= light {
            if baseline == 0 {
                dark = 0;
                light = light.max(1);
            } else {
                light = self.sensor_max;
                dark = dark.min(self.sensor_max - 1);
            }
        }

        Thresholds {
            baseline,
            dark,
            light,
        }
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(MarginPolicy::default(), LDR_SENSOR_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_margin_centers_band() {
        let c = Calibrator::new(MarginPolicy::Fixed { margin: 250 }, 4095);
        let t = c.calibrate(1000);
        assert_eq!(t.baseline, 1000);
        assert_eq!(t.dark, 750);
        assert_eq!(t.light, 1250);
    }

    #[test]
    fn band_is_clipped_at_rails() {
        let c = Calibrator::new(MarginPolicy::Fixed { margin: 250 }, 4095);
        let low = c.calibrate(100);
        assert_eq!((low.dark, low.light), (0, 350));
        let high = c.calibrate(4000);
        assert_eq!((high.dark, high.light), (3750, 4095));
    }

    #[test]
    fn saturated_baselines_keep_a_band() {
        let c = Calibrator::new(MarginPolicy::Fixed { margin: 250 }, 4095);
        let zero = c.calibrate(0);
        assert_eq!((zero.dark, zero.light), (0, 250));
        let max = c.calibrate(4095);
        assert_eq!((max.dark, max.light), (3845, 4095));
    }

    #[test]
    fn dark_below_light_for_every_reading() {
        for policy in [
            MarginPolicy::fixed(),
            MarginPolicy::relative(),
            MarginPolicy::Fixed { margin: 0 },
            MarginPolicy::Fixed { margin: u16::MAX },
            MarginPolicy::Relative {
                below_percent: 0,
                above_percent: 0,
                floor: 0,
            },
        ] {
            let c = Calibrator::new(policy, 4095);
            for reading in 0..=4095u16 {
                let t = c.calibrate(reading);
                assert!(t.dark < t.light, "{:?} at {}", policy, reading);
                assert!(t.light <= 4095);
            }
        }
    }

    #[test]
    fn relative_margin_uses_percentages_with_floor() {
        let c = Calibrator::new(MarginPolicy::relative(), 4095);
        // 25 % below, 15 % above.
        let t = c.calibrate(2000);
        assert_eq!((t.dark, t.light), (1500, 2300));
        // The 100-unit floor wins for dim readings.
        let t = c.calibrate(400);
        assert_eq!((t.dark, t.light), (300, 500));
    }

    #[test]
    fn readings_above_sensor_max_are_clamped() {
        let c = Calibrator::new(MarginPolicy::fixed(), 4095);
        assert_eq!(c.calibrate(u16::MAX), c.calibrate(4095));
    }

    #[test]
    fn calibrate_is_idempotent() {
        let c = Calibrator::default();
        assert_eq!(c.calibrate(1234), c.calibrate(1234));
    }

    #[test]
    fn band_comparisons_are_inclusive() {
        let t = Calibrator::default().calibrate(1000);
        assert!(t.is_below_dark(750));
        assert!(!t.is_below_dark(751));
        assert!(t.is_above_light(1250));
        assert!(!t.is_above_light(1249));
    }
}
