//! GPIO sampling for the two front-panel buttons.
//!
//! Both buttons are active-high with a pull-down:
//!   - Button 1 - dimming mode (quick) / LDR recalibration (hold)
//!   - Button 2 - next value (quick) / previous value (hold)
//!
//! Debouncing and press classification happen in
//! [`lcd_counter::input::ButtonChannel`]; this module only reads levels.

use defmt::warn;
use embedded_hal::digital::InputPin;
use lcd_counter::input::ButtonId;

pub struct ButtonPins<P> {
    pins: [P; 2],
}

impl<P: InputPin> ButtonPins<P> {
    pub fn new(button1: P, button2: P) -> Self {
        Self {
            pins: [button1, button2],
        }
    }

    /// Raw levels, indexed by [`ButtonId::index`]. A pin that cannot be
    /// read counts as released.
    pub fn sample(&mut self) -> [bool; 2] {
        ButtonId::ALL.map(|id| match self.pins[id.index()].is_high() {
            Ok(level) => level,
            Err(_) => {
                warn!("Button {}: pin read failed", id);
                false
            }
        })
    }
}
