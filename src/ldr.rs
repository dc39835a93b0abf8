//! Photoresistor sampling on the SAADC.
//!
//! The LDR sits in a divider so that more light gives a higher voltage.
//! At the default 12-bit resolution readings span `0..=4095`.

use defmt::info;
use embassy_nrf::saadc::Saadc;
use lcd_counter::config::LDR_SENSOR_MAX;

pub struct Ldr<'d> {
    adc: Saadc<'d, 1>,
}

impl<'d> Ldr<'d> {
    /// Calibrate the ADC offset once before the first reading.
    pub async fn new(adc: Saadc<'d, 1>) -> Self {
        adc.calibrate().await;
        info!("SAADC calibrated");
        Self { adc }
    }

    /// One reading, clamped to the sensor range. Noise around ground can
    /// produce small negative samples.
    pub async fn read(&mut self) -> u16 {
        let mut buf = [0i16; 1];
        self.adc.sample(&mut buf).await;
        buf[0].clamp(0, LDR_SENSOR_MAX as i16) as u16
    }
}
