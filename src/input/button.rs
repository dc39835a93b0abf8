//! Press classification for a single push button.
//!
//! The button is active-high. Only the release is classified: a stable
//! high phase shorter than the hold threshold is a quick press, anything
//! at or beyond it is a hold press. `Push` is reported on the debounced
//! rising edge so the UI can react immediately, but it never triggers an
//! action on its own.

use super::debounce::{Debouncer, Edge};
use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_HOLD_MS};

/// Which of the two physical buttons a channel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    One,
    Two,
}

impl ButtonId {
    pub const ALL: [ButtonId; 2] = [ButtonId::One, ButtonId::Two];

    pub fn index(self) -> usize {
        match self {
            ButtonId::One => 0,
            ButtonId::Two => 1,
        }
    }
}

/// Outcome of evaluating a button on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Nothing happened.
    None,
    /// The button has just been (stably) pushed in.
    Push,
    /// Released after a short press.
    QuickPress,
    /// Released after being held at least the hold threshold.
    HoldPress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonTiming {
    pub debounce_ms: u64,
    pub hold_ms: u64,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            debounce_ms: BUTTON_DEBOUNCE_MS,
            hold_ms: BUTTON_HOLD_MS,
        }
    }
}

pub struct ButtonChannel {
    id: ButtonId,
    timing: ButtonTiming,
    debouncer: Debouncer,
    /// Time the debounced rising edge was accepted; `Some` while held.
    pressed_at: Option<u64>,
}

impl ButtonChannel {
    pub fn new(id: ButtonId, timing: ButtonTiming, now_ms: u64) -> Self {
        Self {
            id,
            timing,
            debouncer: Debouncer::new(false, timing.debounce_ms, now_ms),
            pressed_at: None,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Evaluate the raw pin level sampled at `now_ms`.
    pub fn poll(&mut self, raw_high: bool, now_ms: u64) -> ButtonAction {
        match self.debouncer.observe(raw_high, now_ms) {
            Edge::Rising => {
                self.pressed_at = Some(now_ms);
                ButtonAction::Push
            }
            Edge::Falling => match self.pressed_at.take() {
                Some(start) if now_ms.saturating_sub(start) >= self.timing.hold_ms => {
                    ButtonAction::HoldPress
                }
                Some(_) => ButtonAction::QuickPress,
                None => ButtonAction::None,
            },
            Edge::None => ButtonAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive `channel` with 10 ms ticks: high on `[0, high_ms)`, then low
    /// until `until_ms`. Returns every non-`None` action with its time.
    fn press(channel: &mut ButtonChannel, high_ms: u64, until_ms: u64) -> Vec<(u64, ButtonAction)> {
        let mut out = Vec::new();
        let mut t = 0;
        while t <= until_ms {
            let action = channel.poll(t < high_ms, t);
            if action != ButtonAction::None {
                out.push((t, action));
            }
            t += 10;
        }
        out
    }

    fn channel() -> ButtonChannel {
        ButtonChannel::new(ButtonId::One, ButtonTiming::default(), 0)
    }

    #[test]
    fn short_press_is_quick() {
        let mut b = channel();
        let actions = press(&mut b, 100, 400);
        assert_eq!(
            actions,
            vec![(50, ButtonAction::Push), (150, ButtonAction::QuickPress)]
        );
    }

    #[test]
    fn long_press_is_hold() {
        let mut b = channel();
        let actions = press(&mut b, 1000, 1400);
        assert_eq!(
            actions,
            vec![(50, ButtonAction::Push), (1050, ButtonAction::HoldPress)]
        );
    }

    #[test]
    fn exactly_hold_threshold_is_hold() {
        let mut b = channel();
        let actions = press(&mut b, 750, 1000);
        assert_eq!(actions.last(), Some(&(800, ButtonAction::HoldPress)));
    }

    #[test]
    fn just_under_hold_threshold_is_quick() {
        let mut b = channel();
        let actions = press(&mut b, 740, 1000);
        assert_eq!(actions.last(), Some(&(790, ButtonAction::QuickPress)));
    }

    #[test]
    fn bounce_shorter_than_debounce_never_holds() {
        let mut b = channel();
        let actions = press(&mut b, 40, 500);
        assert!(actions.is_empty());
    }

    #[test]
    fn actions_fire_only_once_the_level_is_stable() {
        let mut b = channel();
        assert_eq!(b.poll(true, 0), ButtonAction::None);
        assert_eq!(b.poll(true, 40), ButtonAction::None);
        assert_eq!(b.poll(true, 50), ButtonAction::Push);
        assert_eq!(b.poll(false, 300), ButtonAction::None);
        assert_eq!(b.poll(false, 340), ButtonAction::None);
        assert_eq!(b.poll(false, 350), ButtonAction::QuickPress);
        assert_eq!(b.poll(false, 400), ButtonAction::None);
    }

    #[test]
    fn held_button_emits_nothing_until_release() {
        let mut b = channel();
        let actions = press(&mut b, 10_000, 9_000);
        assert_eq!(actions, vec![(50, ButtonAction::Push)]);
    }
}
