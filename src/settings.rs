//! User settings persisted across power cycles.
//!
//! Layout (2 bytes):
//! ```text
//! Byte 0: selected value index
//! Byte 1: dimming mode (0 = Auto, 1 = On, 2 = Off)
//! ```

use crate::config::{STORAGE_RETRY_MS, VALUE_COUNT};
use crate::ui::DimmingMode;

/// Serialized settings size in bytes.
pub const SETTINGS_SIZE: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoredConfig {
    pub selected_index: usize,
    pub dimming: DimmingMode,
}

impl StoredConfig {
    /// Serialise into `buf`. Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_SIZE {
            return 0;
        }
        buf[0] = u8::try_from(self.selected_index).unwrap_or(0);
        buf[1] = self.dimming.as_u8();
        SETTINGS_SIZE
    }

    /// Parse stored bytes.
    ///
    /// Erased or foreign data falls back to defaults field by field: an
    /// index outside the value range becomes 0, an unknown mode byte
    /// becomes `Auto`.
    pub fn deserialize(data: &[u8]) -> Self {
        let selected_index = data
            .first()
            .map(|&b| usize::from(b))
            .filter(|&i| i < VALUE_COUNT)
            .unwrap_or(0);
        let dimming = data
            .get(1)
            .and_then(|&b| DimmingMode::from_u8(b))
            .unwrap_or_default();
        Self {
            selected_index,
            dimming,
        }
    }
}

/// Spaces out flash writes after a failed save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveThrottle {
    retry_ms: u64,
    blocked_until_ms: Option<u64>,
}

impl SaveThrottle {
    pub const fn new(retry_ms: u64) -> Self {
        Self {
            retry_ms,
            blocked_until_ms: None,
        }
    }

    pub fn may_save(&self, now_ms: u64) -> bool {
        self.blocked_until_ms.map_or(true, |until| now_ms >= until)
    }

    pub fn failed(&mut self, now_ms: u64) {
        self.blocked_until_ms = Some(now_ms.saturating_add(self.retry_ms));
    }

    pub fn succeeded(&mut self) {
        self.blocked_until_ms = None;
    }
}

impl Default for SaveThrottle {
    fn default() -> Self {
        Self::new(STORAGE_RETRY_MS)
    }
}
