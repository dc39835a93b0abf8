//! Polled values - payload parsing, change tracking and poll timing.
//!
//! The endpoint answers with pipe-delimited values, e.g. `123|*456|789`.
//! The first `*` marks the value another device type highlights and is
//! dropped here. Values beyond [`VALUE_COUNT`] are ignored.

use heapless::String;

use crate::config::{MAX_VALUE_CHARS, POLL_INTERVAL_SECS, VALUE_COUNT};
use crate::error::PayloadError;

/// One value as shown on the LCD.
pub type Value = String<MAX_VALUE_CHARS>;

/// Shown when the endpoint could not be reached or answered garbage.
pub const UNKNOWN: &str = "Unknown";

/// Shown for the selected value while the link is down.
pub const LINK_LOST: &str = "NULL";

const MARKER: char = '*';

/// The payload with its first `*` removed.
pub fn strip_marker(payload: &str) -> impl Iterator<Item = char> + '_ {
    let mut seen = false;
    payload.chars().filter(move |&c| {
        if c == MARKER && !seen {
            seen = true;
            return false;
        }
        true
    })
}

/// Parse a raw response into exactly [`VALUE_COUNT`] values.
pub fn parse_payload(raw: &[u8]) -> Result<[Value; VALUE_COUNT], PayloadError> {
    let text = core::str::from_utf8(raw).map_err(|_| PayloadError::NotUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PayloadError::Empty);
    }

    let found = text.split('|').count();
    if found < VALUE_COUNT {
        return Err(PayloadError::TooFewValues { found });
    }

    let mut values: [Value; VALUE_COUNT] = core::array::from_fn(|_| Value::new());
    let mut index = 0;

    for c in strip_marker(text) {
        if c == '|' {
            index += 1;
            if index == VALUE_COUNT {
                break;
            }
            continue;
        }
        values[index]
            .push(c)
            .map_err(|_| PayloadError::ValueTooLong { index })?;
    }

    Ok(values)
}

/// The latest values plus which ones changed since they were last drawn.
pub struct ValueBoard {
    values: [Value; VALUE_COUNT],
    updated: [bool; VALUE_COUNT],
}

impl ValueBoard {
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|_| Value::new()),
            updated: [false; VALUE_COUNT],
        }
    }

    /// Store freshly polled values. Returns how many differ from before.
    pub fn apply(&mut self, values: [Value; VALUE_COUNT]) -> usize {
        let mut changed = 0;
        for (index, value) in values.into_iter().enumerate() {
            let differs = self.values[index] != value;
            self.updated[index] = differs;
            if differs {
                self.values[index] = value;
                changed += 1;
            }
        }
        changed
    }

    /// The endpoint was unreachable or its payload unusable.
    pub fn mark_unknown(&mut self) {
        for index in 0..VALUE_COUNT {
            self.set_text(index, UNKNOWN);
        }
    }

    /// The link to the network is down; only the shown value is flagged.
    pub fn mark_link_lost(&mut self, selected: usize) {
        if selected < VALUE_COUNT {
            self.set_text(selected, LINK_LOST);
        }
    }

    fn set_text(&mut self, index: usize, text: &str) {
        if self.values[index].as_str() != text {
            self.values[index].clear();
            let _ = self.values[index].push_str(text);
            self.updated[index] = true;
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(|v| v.as_str()).unwrap_or("")
    }

    /// Whether `index` changed since the last call for it, clearing the flag.
    pub fn take_updated(&mut self, index: usize) -> bool {
        self.updated
            .get_mut(index)
            .map(core::mem::take)
            .unwrap_or(false)
    }
}

impl Default for ValueBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides when the value source is due for another poll.
pub struct PollSchedule {
    interval_ms: u64,
    last_poll_ms: Option<u64>,
}

impl PollSchedule {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_poll_ms: None,
        }
    }

    /// Due immediately after boot, then once per interval.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_poll_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    pub fn mark_polled(&mut self, now_ms: u64) {
        self.last_poll_ms = Some(now_ms);
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(POLL_INTERVAL_SECS * 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[Value; VALUE_COUNT]) -> [&str; VALUE_COUNT] {
        core::array::from_fn(|i| values[i].as_str())
    }

    #[test]
    fn parses_values_and_strips_marker() {
        let values = parse_payload(b"123|*456|789").unwrap();
        assert_eq!(strs(&values), ["123", "456", "789"]);
    }

    #[test]
    fn strip_marker_drops_first_star_only() {
        let stripped: heapless::String<16> = strip_marker("a*b*c").collect();
        assert_eq!(stripped.as_str(), "ab*c");
    }

    #[test]
    fn only_first_marker_is_removed() {
        let values = parse_payload(b"*1|2*|3").unwrap();
        assert_eq!(strs(&values), ["1", "2*", "3"]);
    }

    #[test]
    fn extra_values_are_ignored() {
        let values = parse_payload(b"1|2|3|4|5\r\n").unwrap();
        assert_eq!(strs(&values), ["1", "2", "3"]);
    }

    #[test]
    fn too_few_values_rejected() {
        assert_eq!(
            parse_payload(b"1|2"),
            Err(PayloadError::TooFewValues { found: 2 })
        );
    }

    #[test]
    fn empty_and_binary_payloads_rejected() {
        assert_eq!(parse_payload(b"  \n"), Err(PayloadError::Empty));
        assert_eq!(parse_payload(&[0xFF, 0xFE]), Err(PayloadError::NotUtf8));
    }

    #[test]
    fn overlong_value_rejected() {
        assert_eq!(
            parse_payload(b"1|1234567890123456|3"),
            Err(PayloadError::ValueTooLong { index: 1 })
        );
    }

    #[test]
    fn board_flags_only_changed_values() {
        let mut board = ValueBoard::new();
        assert_eq!(board.apply(parse_payload(b"1|2|3").unwrap()), 3);
        assert!(board.take_updated(0));
        assert!(!board.take_updated(0));

        assert_eq!(board.apply(parse_payload(b"1|5|3").unwrap()), 1);
        assert!(!board.take_updated(0));
        assert!(board.take_updated(1));
        assert_eq!(board.value(1), "5");
    }

    #[test]
    fn unknown_and_link_lost_markers() {
        let mut board = ValueBoard::new();
        board.apply(parse_payload(b"1|2|3").unwrap());
        board.mark_link_lost(2);
        assert_eq!(board.value(2), LINK_LOST);
        assert_eq!(board.value(0), "1");

        board.mark_unknown();
        for i in 0..VALUE_COUNT {
            assert_eq!(board.value(i), UNKNOWN);
        }
        assert_eq!(board.value(99), "");
    }

    #[test]
    fn poll_due_at_boot_then_per_interval() {
        let mut schedule = PollSchedule::new(30_000);
        assert!(schedule.is_due(0));
        schedule.mark_polled(0);
        assert!(!schedule.is_due(29_999));
        assert!(schedule.is_due(30_000));
    }
}
