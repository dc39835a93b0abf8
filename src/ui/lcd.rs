//! HD44780 16×2 character LCD behind a PCF8574 I²C backpack.
//!
//! The backpack maps its eight outputs to the panel in 4-bit mode:
//!
//! ```text
//! P0 RS | P1 RW | P2 EN | P3 backlight | P4..P7 D4..D7
//! ```

use defmt::{debug, info};
use embassy_time::Timer;
use embedded_hal_async::i2c::I2c;
use lcd_counter::config::{LCD_ANIMATION_FRAME_MS, LCD_ANIMATION_PASSES, LCD_COLUMNS, LCD_ROWS};
use lcd_counter::error::Error;
use lcd_counter::ui::lcd_logic::{animation_cell, ANIMATION_FRAMES, WAVE_GLYPHS};

const RS: u8 = 0b0000_0001;
const EN: u8 = 0b0000_0100;
const BACKLIGHT: u8 = 0b0000_1000;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_LTR: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40];

/// Column and row of the poll indicator dot.
const INDICATOR: (usize, usize) = (LCD_COLUMNS - 1, 1);

pub struct Lcd<I2C> {
    i2c: I2C,
    address: u8,
    backlight: bool,
}

impl<I2C: I2c> Lcd<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            backlight: false,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the panel.
    pub async fn init(&mut self) -> Result<(), Error> {
        // Power-on settle time.
        Timer::after_millis(50).await;

        // Three times 0x3 forces 8-bit mode from any state, then 0x2 selects 4-bit.
        for delay_us in [4500, 150, 150] {
            self.write_nibble(0x03, false).await?;
            Timer::after_micros(delay_us).await;
        }
        self.write_nibble(0x02, false).await?;

        self.command(CMD_FUNCTION_4BIT_2LINE).await?;
        self.command(CMD_DISPLAY_ON).await?;
        self.command(CMD_ENTRY_MODE_LTR).await?;
        self.clear().await?;
        info!("LCD initialised at 0x{:02x}", self.address);
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), Error> {
        self.command(CMD_CLEAR).await?;
        Timer::after_millis(2).await;
        Ok(())
    }

    /// Clear the panel and print one line per row.
    pub async fn write_lines(&mut self, top: &str, bottom: &str) -> Result<(), Error> {
        self.clear().await?;
        self.set_cursor(0, 0).await?;
        self.write_str(top).await?;
        self.set_cursor(0, 1).await?;
        self.write_str(bottom).await
    }

    pub async fn set_backlight(&mut self, on: bool) -> Result<(), Error> {
        self.backlight = on;
        let level = self.backlight_bit();
        self.i2c
            .write(self.address, &[level])
            .await
            .map_err(|_| Error::Display)
    }

    /// Upload the wave animation glyphs into CGRAM slots 0..8.
    pub async fn load_custom_chars(&mut self) -> Result<(), Error> {
        for (slot, glyph) in WAVE_GLYPHS.iter().enumerate() {
            self.command(CMD_SET_CGRAM | ((slot as u8) << 3)).await?;
            for row in glyph {
                self.send(*row, true).await?;
            }
        }
        debug!("Loaded {} custom glyphs", WAVE_GLYPHS.len());
        Ok(())
    }

    /// Play the wave animation, leaving the panel cleared.
    pub async fn animate(&mut self) -> Result<(), Error> {
        self.clear().await?;
        for _ in 0..LCD_ANIMATION_PASSES {
            for frame in 0..ANIMATION_FRAMES {
                for column in 0..LCD_COLUMNS {
                    let cells = animation_cell(column, frame);
                    for (row, cell) in cells.into_iter().enumerate() {
                        self.set_cursor(column, row).await?;
                        self.send(cell, true).await?;
                    }
                }
                Timer::after_millis(LCD_ANIMATION_FRAME_MS).await;
            }
        }
        self.clear().await
    }

    /// Show or hide the `.` that marks a poll in progress.
    pub async fn set_poll_indicator(&mut self, polling: bool) -> Result<(), Error> {
        let (column, row) = INDICATOR;
        self.set_cursor(column, row).await?;
        self.send(if polling { b'.' } else { b' ' }, true).await
    }

    async fn set_cursor(&mut self, column: usize, row: usize) -> Result<(), Error> {
        let offset = ROW_OFFSETS[row.min(LCD_ROWS - 1)];
        let column = column.min(LCD_COLUMNS - 1) as u8;
        self.command(CMD_SET_DDRAM | (offset + column)).await
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Error> {
        for byte in text.bytes().take(LCD_COLUMNS) {
            self.send(byte, true).await?;
        }
        Ok(())
    }

    async fn command(&mut self, value: u8) -> Result<(), Error> {
        self.send(value, false).await
    }

    async fn send(&mut self, value: u8, data: bool) -> Result<(), Error> {
        self.write_nibble(value >> 4, data).await?;
        self.write_nibble(value & 0x0F, data).await
    }

    /// Clock one nibble in on the falling edge of EN.
    async fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<(), Error> {
        let mut byte = (nibble << 4) | self.backlight_bit();
        if data {
            byte |= RS;
        }
        self.i2c
            .write(self.address, &[byte | EN, byte])
            .await
            .map_err(|_| Error::Display)
    }

    fn backlight_bit(&self) -> u8 {
        if self.backlight {
            BACKLIGHT
        } else {
            0
        }
    }
}
