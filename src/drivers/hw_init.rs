//! One-shot hardware peripheral initialization.
//!
//! Brings up the RTD converter (SPI3), the OLED (I2C0), the alert LED and
//! the mode-button interrupt.  Called once from `main()` before the monitor
//! task starts.  Every pin is claimed by its number in [`crate::pins`].

use core::fmt;

use crate::error::SensorFault;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    SpiInitFailed(i32),
    I2cInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    RtdConfigFailed(SensorFault),
    OledInitFailed,
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpiInitFailed(rc)    => write!(f, "SPI3 bus init failed (rc={})", rc),
            Self::I2cInitFailed(rc)    => write!(f, "I2C0 bus init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::RtdConfigFailed(e)   => write!(f, "MAX31865 config write failed: {}", e),
            Self::OledInitFailed       => write!(f, "SSD1306 init sequence failed"),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── ESP-IDF bring-up ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use espidf::*;

#[cfg(target_os = "espidf")]
mod espidf {
    use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver, I2C0};
    use esp_idf_hal::prelude::*;
    use esp_idf_hal::spi::config::{Config as SpiConfig, DriverConfig, MODE_1};
    use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SPI3};
    use esp_idf_sys::*;
    use log::info;
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::HwInitError;
    use crate::drivers::alert_led::AlertLed;
    use crate::drivers::button::ButtonBinding;
    use crate::drivers::display::OledDisplay;
    use crate::error::Result;
    use crate::pins;
    use crate::sensors::max31865::{Max31865, Max31865Config};

    pub type RtdSpi = SpiDeviceDriver<'static, SpiDriver<'static>>;
    pub type Rtd = Max31865<RtdSpi>;
    pub type OledPanel = Ssd1306<
        I2CInterface<I2cDriver<'static>>,
        DisplaySize128x64,
        BufferedGraphicsMode<DisplaySize128x64>,
    >;
    pub type Oled = OledDisplay<OledPanel>;
    pub type AlertPin = PinDriver<'static, AnyOutputPin, Output>;

    /// Claim a GPIO by its number from [`crate::pins`].
    ///
    /// # Safety
    ///
    /// The caller must own the `Pins` set (taken with the `Peripherals`
    /// singleton and never used) and claim each number once.
    unsafe fn io_pin(gpio: i32) -> AnyIOPin {
        unsafe { AnyIOPin::new(gpio) }
    }

    /// MAX31865 on SPI3.
    pub fn init_rtd(spi: SPI3) -> Result<Rtd> {
        // SAFETY: main() drops the typed pin set unused; these four numbers
        // are claimed nowhere else.
        let (sclk, mosi, miso, cs) = unsafe {
            (
                io_pin(pins::RTD_SCLK_GPIO),
                io_pin(pins::RTD_MOSI_GPIO),
                io_pin(pins::RTD_MISO_GPIO),
                io_pin(pins::RTD_CS_GPIO),
            )
        };
        let dev = SpiDeviceDriver::new_single(
            spi,
            sclk,
            mosi,
            Some(miso),
            Some(cs),
            &DriverConfig::new(),
            &SpiConfig::new()
                .baudrate(pins::RTD_SPI_HZ.Hz())
                .data_mode(MODE_1),
        )
        .map_err(|e| HwInitError::SpiInitFailed(e.code()))?;

        let cfg = Max31865Config::default();
        let rtd = Max31865::new(dev, cfg).map_err(HwInitError::RtdConfigFailed)?;
        info!(
            "hw_init: MAX31865 configured (cfg=0x{:02X}, Rref={}Ω, SCLK={} MOSI={} MISO={} CS={})",
            cfg.register_value(),
            cfg.reference_ohms,
            pins::RTD_SCLK_GPIO,
            pins::RTD_MOSI_GPIO,
            pins::RTD_MISO_GPIO,
            pins::RTD_CS_GPIO
        );
        Ok(rtd)
    }

    /// SSD1306 128x64 on I2C0, address 0x3C.
    pub fn init_oled(i2c: I2C0) -> Result<Oled> {
        // SAFETY: as in init_rtd.
        let (sda, scl) = unsafe { (io_pin(pins::OLED_SDA_GPIO), io_pin(pins::OLED_SCL_GPIO)) };
        let bus = I2cDriver::new(
            i2c,
            sda,
            scl,
            &I2cConfig::new().baudrate(pins::OLED_I2C_HZ.Hz()),
        )
        .map_err(|e| HwInitError::I2cInitFailed(e.code()))?;

        let mut panel = Ssd1306::new(
            I2CDisplayInterface::new(bus),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();
        panel.init().map_err(|_| HwInitError::OledInitFailed)?;

        info!(
            "hw_init: SSD1306 ready (SDA={} SCL={})",
            pins::OLED_SDA_GPIO,
            pins::OLED_SCL_GPIO
        );
        Ok(OledDisplay::new(panel))
    }

    pub fn init_alert_led() -> Result<AlertLed<AlertPin>> {
        // SAFETY: as in init_rtd.
        let pin = unsafe { AnyOutputPin::new(pins::ALERT_LED_GPIO) };
        let drv = PinDriver::output(pin).map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        Ok(AlertLed::new(drv))
    }

    /// Milliseconds since boot, wrapping at `u32::MAX`.
    pub fn uptime_ms() -> u32 {
        // SAFETY: esp_timer_get_time is a RTC counter read; safe in ISR context.
        (unsafe { esp_timer_get_time() } / 1_000) as u32
    }

    unsafe extern "C" fn mode_button_isr(arg: *mut core::ffi::c_void) {
        // SAFETY: `arg` is the `&'static ButtonBinding` registered in
        // init_mode_button(); it is never freed.
        let binding = unsafe { &*(arg as *const ButtonBinding) };
        let _ = binding.on_edge(uptime_ms());
    }

    /// Configure the mode button as a pulled-up input and attach the edge
    /// handler.  The handler stays armed for the life of the program.
    pub fn init_mode_button(binding: &'static ButtonBinding) -> Result<()> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pins::MODE_BUTTON_GPIO,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        // SAFETY: called once from main() before the monitor task starts.
        // The handler only touches atomics inside `binding`.
        unsafe {
            let ret = gpio_config(&cfg);
            if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret).into()); }

            let ret = gpio_install_isr_service(0);
            if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
                return Err(HwInitError::IsrInstallFailed(ret).into());
            }

            let ret = gpio_isr_handler_add(
                pins::MODE_BUTTON_GPIO,
                Some(mode_button_isr),
                binding as *const ButtonBinding as *mut core::ffi::c_void,
            );
            if ret != ESP_OK { return Err(HwInitError::IsrInstallFailed(ret).into()); }
            gpio_intr_enable(pins::MODE_BUTTON_GPIO);
        }
        info!("hw_init: mode button ISR on GPIO{}", pins::MODE_BUTTON_GPIO);
        Ok(())
    }
}
