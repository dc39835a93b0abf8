//! Time-based debouncer shared by the button and LDR classifiers.
//!
//! A raw level is only trusted once it has stayed unchanged for the
//! whole debounce window. The tick on which a new level is accepted
//! reports an [`Edge`]; every other tick reports [`Edge::None`].

/// Transition of the accepted (stable) level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    None,
    Rising,
    Falling,
}

#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    window_ms: u64,
    raw: bool,
    stable: bool,
    last_change_ms: u64,
}

impl Debouncer {
    /// Create a debouncer that already trusts `initial`.
    pub const fn new(initial: bool, window_ms: u64, now_ms: u64) -> Self {
        Self {
            window_ms,
            raw: initial,
            stable: initial,
            last_change_ms: now_ms,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    pub fn observe(&mut self, raw: bool, now_ms: u64) -> Edge {
        if raw != self.raw {
            self.raw = raw;
            self.last_change_ms = now_ms;
        }

        if self.raw == self.stable {
            return Edge::None;
        }

        if now_ms.saturating_sub(self.last_change_ms) < self.window_ms {
            return Edge::None;
        }

        self.stable = self.raw;
        if self.stable {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }

    /// Accept `level` immediately, discarding any pending change.
    pub fn reset(&mut self, level: bool, now_ms: u64) {
        self.raw = level;
        self.stable = level;
        self.last_change_ms = now_ms;
    }

    /// The last accepted level.
    /// `true` while a raw change is waiting out the window.
    pub fn is_pending(&self) -> bool {
        self.raw != self.stable
    }
}
