//! Text layout and animation maths for the 16×2 character LCD.
//!
//! Kept free of any bus access so the layout rules can be tested on the
//! host; `ui::lcd` pushes the results to the panel.

use heapless::String;

use super::DimmingMode;
use crate::config::{LCD_COLUMNS, MAX_VALUE_CHARS};

/// One LCD row worth of text.
pub type Line = String<LCD_COLUMNS>;

/// Number of frames in one sweep of the wave animation.
pub const ANIMATION_FRAMES: usize = 8;

/// Blank character in the HD44780 ROM.
pub const BLANK: u8 = b' ';

/// CGRAM glyphs: glyph `n` is a horizontal bar on pixel row `n`.
pub const WAVE_GLYPHS: [[u8; 8]; 8] = {
    let mut glyphs = [[0u8; 8]; 8];
    let mut n = 0;
    while n < 8 {
        glyphs[n][n] = 0b11111;
        n += 1;
    }
    glyphs
};

/// Height of the wave (0 = top pixel row of the top line, 15 = bottom of
/// the bottom line) at each phase.
const WAVE_HEIGHTS: [u8; ANIMATION_FRAMES] = [8, 11, 13, 11, 8, 4, 2, 4];

/// Truncate `text` to fit one LCD row.
pub fn fit_line(text: &str) -> Line {
    fit(text, LCD_COLUMNS)
}

/// Truncate a polled value so the poll indicator column stays free.
pub fn fit_value(text: &str) -> Line {
    fit(text, MAX_VALUE_CHARS)
}

fn fit(text: &str, width: usize) -> Line {
    let mut line = Line::new();
    for c in text.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).take(width) {
        let _ = line.push(c);
    }
    line
}

/// Characters `[top, bottom]` for `column` during `frame`.
///
/// Each frame shifts the pattern one column to the right, so a column
/// shows what its left neighbour showed on the previous frame.
pub fn animation_cell(column: usize, frame: usize) -> [u8; 2] {
    let phase = (column % ANIMATION_FRAMES + ANIMATION_FRAMES - frame % ANIMATION_FRAMES)
        % ANIMATION_FRAMES;
    let height = WAVE_HEIGHTS[phase];
    if height < 8 {
        [height, BLANK]
    } else {
        [BLANK, height - 8]
    }
}

/// Message shown after the dimming mode changes.
pub fn dimming_message(mode: DimmingMode) -> (&'static str, &'static str) {
    match mode {
        DimmingMode::Auto => ("LCD backlight", "Auto (light dep)"),
        DimmingMode::On => ("LCD backlight", "always on"),
        DimmingMode::Off => ("LCD backlight", "always off"),
    }
}

/// Bottom row for the calibration message: `"Baseline 1234"`.
pub fn baseline_line(baseline: u16) -> Line {
    let mut line = Line::new();
    let _ = core::fmt::Write::write_fmt(&mut line, format_args!("Baseline {}", baseline));
    line
}
