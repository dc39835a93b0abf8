//! User interface subsystem - 16×2 character LCD + physical controls.
//!
//! ## Components
//!
//! - **Input logic**: wrapping value selection
//! - **LCD logic**: line fitting, messages and the wave animation
//!
//! The bus-level LCD driver (`ui/lcd.rs`), the rendering outbox
//! (`ui/display.rs`) and the pin sampler (`ui/buttons.rs`) only exist in
//! the embedded build and are pulled in by `main.rs`.

pub mod input_logic;
pub mod lcd_logic;

/// How the backlight reacts to the room's light level.
///
/// Stored as one byte in flash: `Auto = 0`, `On = 1`, `Off = 2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DimmingMode {
    /// Backlight turns itself off when the room goes dark.
    #[default]
    Auto = 0,
    /// Backlight is always on.
    On = 1,
    /// Backlight is always off.
    Off = 2,
}

impl DimmingMode {
    /// Order used by the mode button: On → Off → Auto → On.
    pub fn next(self) -> Self {
        match self {
            DimmingMode::On => DimmingMode::Off,
            DimmingMode::Off => DimmingMode::Auto,
            DimmingMode::Auto => DimmingMode::On,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DimmingMode::Auto),
            1 => Some(DimmingMode::On),
            2 => Some(DimmingMode::Off),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode() {
        let mut mode = DimmingMode::On;
        mode = mode.next();
        assert_eq!(mode, DimmingMode::Off);
        mode = mode.next();
        assert_eq!(mode, DimmingMode::Auto);
        mode = mode.next();
        assert_eq!(mode, DimmingMode::On);
    }

    #[test]
    fn byte_encoding_is_stable() {
        for mode in [DimmingMode::Auto, DimmingMode::On, DimmingMode::Off] {
            assert_eq!(DimmingMode::from_u8(mode.as_u8()), Some(mode));
        }
        assert_eq!(DimmingMode::Auto.as_u8(), 0);
        assert_eq!(DimmingMode::Off.as_u8(), 2);
        assert_eq!(DimmingMode::from_u8(3), None);
    }
}
