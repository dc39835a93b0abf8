use crate::ui::DimmingMode;

/// Decide whether the LCD backlight should be lit for a dimming mode and room state.
pub fn backlight_should_be_on(mode: DimmingMode, room_dark: bool) -> bool {
    match mode {
        DimmingMode::On => true,
        DimmingMode::Off => false,
        DimmingMode::Auto => !room_dark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_modes_ignore_the_room() {
        assert!(backlight_should_be_on(DimmingMode::On, true));
        assert!(backlight_should_be_on(DimmingMode::On, false));
        assert!(!backlight_should_be_on(DimmingMode::Off, true));
        assert!(!backlight_should_be_on(DimmingMode::Off, false));
    }

    #[test]
    fn auto_follows_the_room() {
        assert!(!backlight_should_be_on(DimmingMode::Auto, true));
        assert!(backlight_should_be_on(DimmingMode::Auto, false));
    }
}
