//! Value feed from the network bridge over UARTE.
//!
//! The bridge owns the network connection and performs the HTTPS request.
//! Protocol, one line each way:
//!
//! ```text
//! -> ?\n                 poll request
//! <- 123|*456|789\n      pipe-delimited values
//! <- !\n                 bridge has no network link
//! ```

use defmt::{debug, info, warn};
use embassy_nrf::uarte::Uarte;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use heapless::Vec;
use lcd_counter::config::{FEED_BUFFER_SIZE, FEED_RESPONSE_TIMEOUT_MS, VALUE_COUNT};
use lcd_counter::error::Error;
use lcd_counter::values::{parse_payload, PollSchedule, Value};

const LINK_DOWN: &[u8] = b"!";

/// What the feed task reports to the main loop.
pub enum FeedUpdate {
    /// A poll has started; show the indicator.
    Polling,
    Values([Value; VALUE_COUNT]),
    /// The bridge answered, but not with usable values (or not at all).
    Unknown,
    /// The bridge has lost its network link.
    LinkLost,
}

pub static FEED_UPDATES: Channel<CriticalSectionRawMutex, FeedUpdate, 4> = Channel::new();

pub struct Feed<'d> {
    uarte: Uarte<'d, embassy_nrf::peripherals::UARTE0>,
    line: Vec<u8, FEED_BUFFER_SIZE>,
}

impl<'d> Feed<'d> {
    pub fn new(uarte: Uarte<'d, embassy_nrf::peripherals::UARTE0>) -> Self {
        Self {
            uarte,
            line: Vec::new(),
        }
    }

    /// Request one set of values from the bridge.
    pub async fn poll(&mut self) -> Result<[Value; VALUE_COUNT], Error> {
        // EasyDMA can only read from RAM.
        let request = *b"?\n";
        self.uarte.write(&request).await.map_err(|_| Error::Link)?;

        with_timeout(
            Duration::from_millis(FEED_RESPONSE_TIMEOUT_MS),
            self.read_line(),
        )
        .await
        .map_err(|_| Error::Timeout)??;

        if self.line.as_slice() == LINK_DOWN {
            return Err(Error::Link);
        }
        debug!("Feed response: {} bytes", self.line.len());
        Ok(parse_payload(&self.line)?)
    }

    async fn read_line(&mut self) -> Result<(), Error> {
        self.line.clear();
        let mut byte = [0u8; 1];
        loop {
            self.uarte.read(&mut byte).await.map_err(|_| Error::Link)?;
            match byte[0] {
                b'\n' => return Ok(()),
                b'\r' => {}
                b => self.line.push(b).map_err(|_| Error::BufferOverflow)?,
            }
        }
    }
}

/// Poll the bridge on the configured interval, forever.
#[embassy_executor::task]
pub async fn feed_task(mut feed: Feed<'static>) -> ! {
    let mut schedule = PollSchedule::default();

    loop {
        let now = Instant::now().as_millis();
        if !schedule.is_due(now) {
            Timer::after_millis(100).await;
            continue;
        }
        schedule.mark_polled(now);

        info!("Polling value feed");
        FEED_UPDATES.send(FeedUpdate::Polling).await;

        let update = match feed.poll().await {
            Ok(values) => FeedUpdate::Values(values),
            Err(Error::Link) => {
                warn!("Value feed: network link lost");
                FeedUpdate::LinkLost
            }
            Err(e) => {
                warn!("Value feed failed: {:?}", e);
                FeedUpdate::Unknown
            }
        };
        FEED_UPDATES.send(update).await;
    }
}
