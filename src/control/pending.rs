//! Deferred finalization of user actions.
//!
//! An action's visible effect happens at once; its finalizer (redraw,
//! persist) runs once the slot has been quiet for the settle window.

use crate::input::ButtonId;

/// Which kind of action armed a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PendingSlot {
    Quick(ButtonId),
    Hold(ButtonId),
    Swipe,
}

impl PendingSlot {
    pub const COUNT: usize = 5;

    pub const ALL: [PendingSlot; Self::COUNT] = [
        PendingSlot::Quick(ButtonId::One),
        PendingSlot::Hold(ButtonId::One),
        PendingSlot::Quick(ButtonId::Two),
        PendingSlot::Hold(ButtonId::Two),
        PendingSlot::Swipe,
    ];

    fn index(self) -> usize {
        match self {
            PendingSlot::Quick(id) => id.index() * 2,
            PendingSlot::Hold(id) => id.index() * 2 + 1,
            PendingSlot::Swipe => 4,
        }
    }
}

/// Whether the scheduler may stop servicing the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickStatus {
    /// No finalization outstanding.
    Idle,
    /// At least one action is still inside its settle window.
    Settling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingAction {
    fired: bool,
    finalized: bool,
    fired_at_ms: u64,
}

impl PendingAction {
    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Arm (or re-arm) the slot. A second fire restarts the settle window.
    fn fire(&mut self, now_ms: u64) {
        self.fired = true;
        self.finalized = false;
        self.fired_at_ms = now_ms;
    }

    /// True exactly once, on the tick the settle window completes.
    fn is_due(&self, settle_ms: u64, now_ms: u64) -> bool {
        self.fired && !self.finalized && now_ms.saturating_sub(self.fired_at_ms) >= settle_ms
    }

    fn is_outstanding(&self) -> bool {
        self.fired && !self.finalized
    }
}

/// Tracks every pending slot and hands out finalizations when they are due.
pub struct Coordinator {
    settle_ms: u64,
    slots: [PendingAction; PendingSlot::COUNT],
}

impl Coordinator {
    pub const fn new(settle_ms: u64) -> Self {
        Self {
            settle_ms,
            slots: [PendingAction {
                fired: false,
                finalized: false,
                fired_at_ms: 0,
            }; PendingSlot::COUNT],
        }
    }

    pub fn fire(&mut self, slot: PendingSlot, now_ms: u64) {
        self.slots[slot.index()].fire(now_ms);
    }

    pub fn slot(&self, slot: PendingSlot) -> PendingAction {
        self.slots[slot.index()]
    }

    /// Mark every slot whose window elapsed as finalized and return them,
    /// in [`PendingSlot::ALL`] order. The caller runs their finalizers.
    pub fn take_due(&mut self, now_ms: u64) -> heapless::Vec<PendingSlot, { PendingSlot::COUNT }> {
        let mut due = heapless::Vec::new();
        for slot in PendingSlot::ALL {
            let action = &mut self.slots[slot.index()];
            if action.is_due(self.settle_ms, now_ms) {
                action.finalized = true;
                // Capacity equals the slot count.
                let _ = due.push(slot);
            }
        }
        due
    }

    /// Report the current status, clearing all slots once nothing is
    /// outstanding.
    pub fn settle(&mut self) -> TickStatus {
        if self.slots.iter().any(PendingAction::is_outstanding) {
            TickStatus::Settling
        } else {
            self.slots = [PendingAction::default(); PendingSlot::COUNT];
            TickStatus::Idle
        }
    }
}
