//! lcd-counter firmware for the nRF52840.
//!
//! Polls a network bridge for counter values and shows the selected one on
//! a 16×2 LCD. Two buttons and an LDR drive the UI:
//!
//! - Button 1: cycle the backlight dimming mode / hold to recalibrate the LDR
//! - Button 2: next value / hold for the previous value
//! - A hand swiped over the LDR: next value
//! - Room lights off/on: backlight off/on in `Auto` mode
//!
//! Tasks:
//! - `main`      - samples the inputs every tick, drives the LCD and flash
//! - `feed_task` - polls the bridge over UARTE

#![no_std]
#![no_main]

mod feed;
mod ldr;
mod storage;

mod ui {
    pub mod buttons;
    pub mod display;
    pub mod lcd;
}

use defmt::{debug, error, info, warn};
use defmt_rtt as _;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::saadc::{self, Saadc};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::uarte::{self, Uarte};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal_async::i2c::I2c;
use panic_probe as _;

use lcd_counter::config::{CONTROL_TICK_MS, LCD_I2C_ADDRESS};
use lcd_counter::control::{Controls, DisplayState, RawInputs, TickReport, TickStatus};
use lcd_counter::error::Error;
use lcd_counter::input::{ButtonAction, ButtonId, LightEvent};
use lcd_counter::values::ValueBoard;

use feed::{feed_task, Feed, FeedUpdate, FEED_UPDATES};
use ldr::Ldr;
use storage::SettingsStore;
use ui::buttons::ButtonPins;
use ui::display::{self as render, Outbox};
use ui::lcd::Lcd;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("lcd-counter starting");
    let p = embassy_nrf::init(Default::default());

    // - Settings --------------------------------------------------------
    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut settings = SettingsStore::new();
    let stored = settings.load_from_flash(&mut flash).await;

    // - Inputs ----------------------------------------------------------
    let adc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [saadc::ChannelConfig::single_ended(p.P0_03)],
    );
    let mut ldr = Ldr::new(adc).await;
    let mut buttons = ButtonPins::new(
        Input::new(p.P0_11, Pull::Down),
        Input::new(p.P0_12, Pull::Down),
    );

    let reading = ldr.read().await;
    let mut controls = Controls::with_defaults(reading, Instant::now().as_millis());
    let mut state = DisplayState::restore(stored, controls.light().is_room_dark());
    info!(
        "Startup LDR reading {} -> {} (room dark: {})",
        reading,
        controls.light().thresholds(),
        controls.light().is_room_dark()
    );

    // - Display ---------------------------------------------------------
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut lcd = Lcd::new(i2c, LCD_I2C_ADDRESS);
    if let Err(e) = init_lcd(&mut lcd, state.backlight_on).await {
        error!("LCD init failed: {:?}", e);
    }

    let mut board = ValueBoard::new();
    if let Err(e) = render::draw_value(&mut lcd, &mut board, state.selected_index).await {
        warn!("LCD draw failed: {:?}", e);
    }

    // - Value feed ------------------------------------------------------
    let uarte = Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, uarte::Config::default());
    if let Err(e) = spawner.spawn(feed_task(Feed::new(uarte))) {
        error!("Failed to spawn feed task: {:?}", e);
    }

    // - Control loop ----------------------------------------------------
    let mut outbox = Outbox::new();
    let mut status = TickStatus::Idle;
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));

    loop {
        ticker.next().await;

        let inputs = RawInputs {
            buttons: buttons.sample(),
            light: ldr.read().await,
        };
        let report = controls.tick(
            inputs,
            Instant::now().as_millis(),
            &mut state,
            &mut outbox,
            &mut settings,
        );
        log_report(&report);
        if report.status != status {
            debug!("Controls {}", report.status);
            status = report.status;
        }

        if !outbox.is_empty() {
            if let Err(e) = render::flush(&mut outbox, &mut lcd, &mut board).await {
                warn!("LCD update failed: {:?}", e);
            }
        }

        if settings.is_dirty() {
            // Failures are logged by the store, which retries after a back-off.
            let _ = settings
                .save_to_flash(&mut flash, Instant::now().as_millis())
                .await;
        }

        // A message is on screen while settling; feed results wait.
        if status == TickStatus::Idle {
            while let Ok(update) = FEED_UPDATES.try_receive() {
                if let Err(e) =
                    apply_feed_update(update, &mut lcd, &mut board, state.selected_index).await
                {
                    warn!("LCD update failed: {:?}", e);
                }
            }
        }
    }
}

async fn init_lcd<I2C: I2c>(lcd: &mut Lcd<I2C>, backlight_on: bool) -> Result<(), Error> {
    lcd.init().await?;
    lcd.load_custom_chars().await?;
    lcd.set_backlight(backlight_on).await
}

async fn apply_feed_update<I2C: I2c>(
    update: FeedUpdate,
    lcd: &mut Lcd<I2C>,
    board: &mut ValueBoard,
    selected: usize,
) -> Result<(), Error> {
    match update {
        FeedUpdate::Polling => return lcd.set_poll_indicator(true).await,
        FeedUpdate::Values(values) => {
            let changed = board.apply(values);
            info!("Feed: {} value(s) changed", changed);
        }
        FeedUpdate::Unknown => board.mark_unknown(),
        FeedUpdate::LinkLost => board.mark_link_lost(selected),
    }

    // Redrawing also clears the poll indicator.
    if board.take_updated(selected) {
        lcd.animate().await?;
        render::draw_value(lcd, board, selected).await
    } else {
        lcd.set_poll_indicator(false).await
    }
}

fn log_report(report: &TickReport) {
    if report.is_quiet() {
        return;
    }
    for (id, action) in ButtonId::ALL.into_iter().zip(report.buttons) {
        if action != ButtonAction::None {
            info!("Button {}: {}", id, action);
        }
    }
    if report.light != LightEvent::None {
        info!("LDR: {}", report.light);
    }
    for slot in &report.finalized {
        debug!("Finalized {}", slot);
    }
}
