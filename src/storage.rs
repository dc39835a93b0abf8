//! Persistent storage for user settings.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` crate
//! so the selected value and dimming mode survive a power cycle.
//!
//! Storage layout:
//!   - One map entry under [`KEY_SETTINGS`] holding a serialized
//!     [`StoredConfig`].
//!   - Entries are appended sequentially; the flash pages are managed
//!     by `sequential-storage` which handles wear levelling and GC.

use defmt::{debug, error, info};
use lcd_counter::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START, STORAGE_RETRY_MS};
use lcd_counter::control::ConfigStore;
use lcd_counter::error::Error;
use lcd_counter::settings::{SaveThrottle, StoredConfig, SETTINGS_SIZE};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the settings record in the map storage.
const KEY_SETTINGS: u8 = 0x01;

/// Scratch buffer for `sequential-storage`; must hold key, value and item header.
const SCRATCH_SIZE: usize = 64;

/// In-memory copy of the settings, synced with flash.
pub struct SettingsStore {
    config: StoredConfig,
    /// True if the copy differs from flash.
    dirty: bool,
    throttle: SaveThrottle,
}

impl SettingsStore {
    pub const fn new() -> Self {
        Self {
            config: StoredConfig {
                selected_index: 0,
                dimming: lcd_counter::ui::DimmingMode::Auto,
            },
            dirty: false,
            throttle: SaveThrottle::new(STORAGE_RETRY_MS),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Load from flash. A missing or unreadable record yields defaults.
    pub async fn load_from_flash(
        &mut self,
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
    ) -> StoredConfig {
        let mut buf = [0u8; SCRATCH_SIZE];

        self.config = match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_SETTINGS,
        )
        .await
        {
            Ok(Some(data)) => {
                let config = StoredConfig::deserialize(data);
                info!("Loaded settings from flash: {}", config);
                config
            }
            Ok(None) => {
                info!("No settings in flash - using defaults");
                StoredConfig::default()
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                StoredConfig::default()
            }
        };
        self.dirty = false;
        self.config
    }

    /// Write the settings if they changed since the last save. After a
    /// failure the write is retried once the retry window has passed.
    pub async fn save_to_flash(
        &mut self,
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
        now_ms: u64,
    ) -> Result<(), Error> {
        if !self.dirty {
            debug!("SettingsStore: no changes to save");
            return Ok(());
        }
        if !self.throttle.may_save(now_ms) {
            return Ok(());
        }

        let mut buf = [0u8; SCRATCH_SIZE];
        let mut data_buf = [0u8; SETTINGS_SIZE];
        let len = self.config.serialize(&mut data_buf);
        if len == 0 {
            return Err(Error::BufferOverflow);
        }
        let item = &data_buf[..len];

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_SETTINGS,
            &item,
        )
        .await
        {
            Ok(_) => {
                info!("Saved settings to flash: {}", self.config);
                self.dirty = false;
                self.throttle.succeeded();
                Ok(())
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
                self.throttle.failed(now_ms);
                Err(Error::Storage)
            }
        }
    }
}

impl ConfigStore for SettingsStore {
    fn persist(&mut self, config: &StoredConfig) {
        if self.config != *config {
            self.config = *config;
            self.dirty = true;
        }
    }
}
