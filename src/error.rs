//! Unified error type for lcd-counter.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! The input classifiers never fail; these errors belong to the
//! collaborators around them (flash, LCD bus, value feed).

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // Display
    /// I²C transaction to the LCD backpack failed.
    Display,

    // Value feed
    /// The UART link to the network bridge failed.
    Link,

    /// The bridge answered with a payload we could not use.
    Payload(PayloadError),

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,

    /// Operation timed out.
    Timeout,
}

/// Why a value payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Nothing but whitespace was received.
    Empty,
    /// Fewer pipe-delimited values than the unit displays.
    TooFewValues { found: usize },
    /// A value does not fit on the LCD.
    ValueTooLong { index: usize },
    /// The payload bytes are not valid UTF-8.
    NotUtf8,
}

// Convenience conversions

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Error::Payload(e)
    }
}
