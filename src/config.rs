//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and sensor limits
//! live here so they can be tuned in one place.

// Buttons

/// How long a button pin must read without fluctuation to be trusted (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Minimum stable-high duration that turns a press into a hold (ms).
pub const BUTTON_HOLD_MS: u64 = 750;

/// Quiet period after an action before persistence and redraw run (ms).
pub const SETTLE_WINDOW_MS: u64 = 2500;

// LDR

/// How long the LDR must read consistently inside or outside a band (ms).
pub const LDR_DEBOUNCE_MS: u64 = 50;

/// Shortest darkness that still counts as a deliberate swipe (ms).
pub const MIN_SWIPE_DARKNESS_MS: u64 = 150;

/// Darkness lasting this long is a room change, not a swipe (ms).
pub const MAX_SWIPE_DARKNESS_MS: u64 = 2500;

/// Periodic recalibration interval to follow slow ambient drift (ms).
pub const LDR_RECALIBRATION_MS: u64 = 60_000;

/// Full-scale reading of the 12-bit ADC.
pub const LDR_SENSOR_MAX: u16 = 4095;

/// Symmetric band half-width used by the fixed margin policy.
pub const LDR_FIXED_MARGIN: u16 = 250;

/// Relative margin policy: percentage below the baseline for the dark band.
pub const LDR_RELATIVE_BELOW_PERCENT: u8 = 25;

/// Relative margin policy: percentage above the baseline for the light band.
pub const LDR_RELATIVE_ABOVE_PERCENT: u8 = 15;

/// Relative margin policy: the band is never narrower than this.
pub const LDR_RELATIVE_FLOOR: u16 = 100;

/// A startup reading at or below this level means the room is already dark.
pub const LDR_DARK_ROOM_LEVEL: u16 = 200;

// Values

/// Number of values the endpoint returns that this unit displays.
pub const VALUE_COUNT: usize = 3;

/// Longest value shown. The 16th LCD column is the poll indicator.
pub const MAX_VALUE_CHARS: usize = 15;

/// How often the value source is polled (seconds).
pub const POLL_INTERVAL_SECS: u64 = 30;

/// Label pair (top row, bottom row) shown when a value is selected.
pub const VALUE_LABELS: [(&str, &str); VALUE_COUNT] = [
    ("Showing value 1", "Total count"),
    ("Showing value 2", "Today"),
    ("Showing value 3", "This week"),
];

/// Heading shown above the selected value on the main screen.
pub const VALUE_TITLES: [&str; VALUE_COUNT] = ["Total", "Today", "Week"];

// LCD

/// Character columns of the HD44780 panel.
pub const LCD_COLUMNS: usize = 16;

/// Character rows of the HD44780 panel.
pub const LCD_ROWS: usize = 2;

/// I²C address of the PCF8574 backpack.
pub const LCD_I2C_ADDRESS: u8 = 0x27;

/// Frame period of the update animation (ms).
pub const LCD_ANIMATION_FRAME_MS: u64 = 100;

/// How many times the wave animation sweeps the panel.
pub const LCD_ANIMATION_PASSES: usize = 3;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button 1       → P0.11  (active-high, external pull-down)
//   Button 2       → P0.12  (active-high, external pull-down)
//   LDR divider    → P0.03  (AIN1)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   Bridge UART TX → P0.06
//   Bridge UART RX → P0.08

/// Scheduler tick of the controls loop (ms). Must stay well below the debounce windows.
pub const CONTROL_TICK_MS: u64 = 5;

/// How long to wait for the network bridge to answer a poll (ms).
pub const FEED_RESPONSE_TIMEOUT_MS: u64 = 10_000;

/// Largest response line accepted from the network bridge.
pub const FEED_BUFFER_SIZE: usize = 512;

// Settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;

/// Wait before retrying a failed settings write (ms).
pub const STORAGE_RETRY_MS: u64 = 10_000;
