//! Rendering of controller output onto the LCD.
//!
//! [`Controls::tick`](lcd_counter::control::Controls::tick) is synchronous,
//! while the LCD sits on an async bus. The [`Outbox`] collects what the
//! controller asked for during a tick; [`flush`] then replays it on the
//! panel.

use crate::ui::lcd::Lcd;
use defmt::{debug, warn};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;
use lcd_counter::config::VALUE_TITLES;
use lcd_counter::control::DisplaySink;
use lcd_counter::error::Error;
use lcd_counter::ui::lcd_logic::{fit_line, fit_value, Line};
use lcd_counter::values::ValueBoard;

/// A single tick never produces more than a handful of commands.
const OUTBOX_CAPACITY: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Value(usize),
    Message(Line, Line),
    Backlight(bool),
}

#[derive(Default)]
pub struct Outbox {
    commands: Vec<Command, OUTBOX_CAPACITY>,
}

impl Outbox {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn queue(&mut self, command: Command) {
        if self.commands.push(command).is_err() {
            warn!("Display outbox full - dropping command");
        }
    }
}

impl DisplaySink for Outbox {
    fn show_value(&mut self, index: usize) {
        self.queue(Command::Value(index));
    }

    fn show_message(&mut self, top: &str, bottom: &str) {
        self.queue(Command::Message(fit_line(top), fit_line(bottom)));
    }

    fn set_backlight(&mut self, on: bool) {
        self.queue(Command::Backlight(on));
    }
}

/// Replay every queued command on the panel, in order.
pub async fn flush<I2C: I2c>(
    outbox: &mut Outbox,
    lcd: &mut Lcd<I2C>,
    board: &mut ValueBoard,
) -> Result<(), Error> {
    for command in core::mem::take(&mut outbox.commands) {
        match command {
            Command::Value(index) => draw_value(lcd, board, index).await?,
            Command::Message(top, bottom) => lcd.write_lines(&top, &bottom).await?,
            Command::Backlight(on) => lcd.set_backlight(on).await?,
        }
    }
    Ok(())
}

/// Render the value view: title on top, value below. A value that changed
/// since it was last drawn is introduced by the wave animation.
pub async fn draw_value<I2C: I2c>(
    lcd: &mut Lcd<I2C>,
    board: &mut ValueBoard,
    index: usize,
) -> Result<(), Error> {
    if board.take_updated(index) {
        debug!("Value {} changed - animating", index);
        lcd.animate().await?;
    }
    let title = VALUE_TITLES.get(index).copied().unwrap_or("");
    lcd.write_lines(title, &fit_value(board.value(index))).await
}
