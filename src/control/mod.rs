//! The control loop core - turns raw samples into UI actions.
//!
//! [`Controls::tick`] is called by the scheduler with the current button
//! levels and LDR reading. It classifies them, applies the resulting
//! action to the [`DisplayState`] immediately, and arms a deferred
//! finalizer that redraws and persists once the user has stopped
//! interacting.
//!
//! ## Action map
//!
//! | Event              | Immediate                          | Finalizer                        |
//! |--------------------|------------------------------------|----------------------------------|
//! | Button 1 quick     | cycle dimming mode, show mode text | apply backlight, persist, redraw |
//! | Button 1 hold      | recalibrate LDR, show baseline     | redraw                           |
//! | Button 2 quick     | next value, show its label         | persist, redraw                  |
//! | Button 2 hold      | previous value, show its label     | persist, redraw                  |
//! | Swipe              | next value, show its label         | persist, redraw                  |
//! | Room darkened      | backlight off (`Auto` only)        | -                                |
//! | Room lightened     | backlight on (`Auto` only)         | -                                |

pub mod pending;

#[cfg(test)]
mod tests;

pub use pending::{Coordinator, PendingAction, PendingSlot, TickStatus};

use crate::config::{SETTLE_WINDOW_MS, VALUE_COUNT, VALUE_LABELS};
use crate::input::{
    ButtonAction, ButtonChannel, ButtonId, ButtonTiming, Calibrator, LightChannel, LightEvent,
    LightTiming,
};
use crate::power_logic::backlight_should_be_on;
use crate::settings::StoredConfig;
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::lcd_logic::{baseline_line, dimming_message};
use crate::ui::DimmingMode;

/// Where the controller sends what the user should see.
pub trait DisplaySink {
    /// Draw the value at `index` in the normal value view.
    fn show_value(&mut self, index: usize);
    /// Show a transient two-line message.
    fn show_message(&mut self, top: &str, bottom: &str);
    fn set_backlight(&mut self, on: bool);
}

/// Where the controller saves user settings.
pub trait ConfigStore {
    fn persist(&mut self, config: &StoredConfig);
}

/// What the user currently sees and has chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub selected_index: usize,
    pub dimming: DimmingMode,
    pub backlight_on: bool,
}

impl DisplayState {
    /// Restore the stored settings; the backlight follows the mode and the
    /// room state at power-up. An out-of-range index falls back to 0.
    pub fn restore(config: StoredConfig, room_dark: bool) -> Self {
        Self {
            selected_index: if config.selected_index < VALUE_COUNT {
                config.selected_index
            } else {
                0
            },
            dimming: config.dimming,
            backlight_on: backlight_should_be_on(config.dimming, room_dark),
        }
    }

    pub fn stored(&self) -> StoredConfig {
        StoredConfig {
            selected_index: self.selected_index,
            dimming: self.dimming,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlTiming {
    pub settle_ms: u64,
}

impl Default for ControlTiming {
    fn default() -> Self {
        Self {
            settle_ms: SETTLE_WINDOW_MS,
        }
    }
}

/// One sample of every input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawInputs {
    /// Button levels, high = pressed, indexed by [`ButtonId::index`].
    pub buttons: [bool; 2],
    pub light: u16,
}

/// What happened during one tick, for logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub status: TickStatus,
    pub buttons: [ButtonAction; 2],
    pub light: LightEvent,
    pub finalized: heapless::Vec<PendingSlot, { PendingSlot::COUNT }>,
}

impl TickReport {
    /// Nothing worth logging happened.
    pub fn is_quiet(&self) -> bool {
        self.buttons.iter().all(|a| *a == ButtonAction::None)
            && self.light == LightEvent::None
            && self.finalized.is_empty()
    }
}

pub struct Controls {
    buttons: [ButtonChannel; 2],
    light: LightChannel,
    pending: Coordinator,
}

impl Controls {
    pub fn new(
        button_timing: ButtonTiming,
        light_timing: LightTiming,
        control_timing: ControlTiming,
        calibrator: Calibrator,
        reading: u16,
        now_ms: u64,
    ) -> Self {
        Self {
            buttons: ButtonId::ALL.map(|id| ButtonChannel::new(id, button_timing, now_ms)),
            light: LightChannel::new(light_timing, calibrator, reading, now_ms),
            pending: Coordinator::new(control_timing.settle_ms),
        }
    }

    /// Controls with the timings and margins from [`crate::config`].
    pub fn with_defaults(reading: u16, now_ms: u64) -> Self {
        Self::new(
            ButtonTiming::default(),
            LightTiming::default(),
            ControlTiming::default(),
            Calibrator::default(),
            reading,
            now_ms,
        )
    }

    pub fn light(&self) -> &LightChannel {
        &self.light
    }

    pub fn pending(&self) -> &Coordinator {
        &self.pending
    }

    /// Service every input once.
    ///
    /// While the report says [`TickStatus::Settling`] the scheduler must
    /// keep ticking; a finalizer is still waiting for its window.
    pub fn tick(
        &mut self,
        inputs: RawInputs,
        now_ms: u64,
        state: &mut DisplayState,
        display: &mut dyn DisplaySink,
        store: &mut dyn ConfigStore,
    ) -> TickReport {
        let mut buttons = [ButtonAction::None; 2];
        for (channel, action) in self.buttons.iter_mut().zip(buttons.iter_mut()) {
            *action = channel.poll(inputs.buttons[channel.id().index()], now_ms);
        }
        for (id, action) in ButtonId::ALL.into_iter().zip(buttons) {
            self.on_button(id, action, inputs.light, now_ms, state, display);
        }

        let light = self.light.poll(inputs.light, now_ms);
        self.on_light(light, now_ms, state, display);

        let finalized = self.pending.take_due(now_ms);
        for slot in &finalized {
            self.finalize(*slot, state, display, store);
        }

        TickReport {
            status: self.pending.settle(),
            buttons,
            light,
            finalized,
        }
    }

    fn on_button(
        &mut self,
        id: ButtonId,
        action: ButtonAction,
        reading: u16,
        now_ms: u64,
        state: &mut DisplayState,
        display: &mut dyn DisplaySink,
    ) {
        let slot = match (id, action) {
            (_, ButtonAction::None | ButtonAction::Push) => return,
            (ButtonId::One, ButtonAction::QuickPress) => {
                state.dimming = state.dimming.next();
                state.backlight_on = true;
                display.set_backlight(true);
                let (top, bottom) = dimming_message(state.dimming);
                display.show_message(top, bottom);
                PendingSlot::Quick(id)
            }
            (ButtonId::One, ButtonAction::HoldPress) => {
                let thresholds = self.light.recalibrate(reading, now_ms);
                display.show_message("LDR calibrated", &baseline_line(thresholds.baseline));
                PendingSlot::Hold(id)
            }
            (ButtonId::Two, ButtonAction::QuickPress) => {
                state.selected_index = select_next(state.selected_index, VALUE_COUNT);
                show_label(state.selected_index, display);
                PendingSlot::Quick(id)
            }
            (ButtonId::Two, ButtonAction::HoldPress) => {
                state.selected_index = select_prev(state.selected_index, VALUE_COUNT);
                show_label(state.selected_index, display);
                PendingSlot::Hold(id)
            }
        };
        self.pending.fire(slot, now_ms);
    }

    fn on_light(
        &mut self,
        event: LightEvent,
        now_ms: u64,
        state: &mut DisplayState,
        display: &mut dyn DisplaySink,
    ) {
        match event {
            LightEvent::Swipe { .. } => {
                state.selected_index = select_next(state.selected_index, VALUE_COUNT);
                show_label(state.selected_index, display);
                self.pending.fire(PendingSlot::Swipe, now_ms);
            }
            LightEvent::RoomDarkened { .. } => {
                if state.dimming == DimmingMode::Auto && state.backlight_on {
                    state.backlight_on = false;
                    display.set_backlight(false);
                }
            }
            LightEvent::RoomLightened { .. } => {
                if state.dimming == DimmingMode::Auto && !state.backlight_on {
                    state.backlight_on = true;
                    display.set_backlight(true);
                }
            }
            LightEvent::Recalibrated { .. } | LightEvent::None => {}
        }
    }

    fn finalize(
        &self,
        slot: PendingSlot,
        state: &mut DisplayState,
        display: &mut dyn DisplaySink,
        store: &mut dyn ConfigStore,
    ) {
        match slot {
            PendingSlot::Quick(ButtonId::One) => {
                let on = backlight_should_be_on(state.dimming, self.light.is_room_dark());
                state.backlight_on = on;
                display.set_backlight(on);
                store.persist(&state.stored());
            }
            PendingSlot::Hold(ButtonId::One) => {}
            PendingSlot::Quick(ButtonId::Two)
            | PendingSlot::Hold(ButtonId::Two)
            | PendingSlot::Swipe => store.persist(&state.stored()),
        }
        display.show_value(state.selected_index);
    }
}

fn show_label(index: usize, display: &mut dyn DisplaySink) {
    if let Some((top, bottom)) = VALUE_LABELS.get(index) {
        display.show_message(top, bottom);
    }
}
