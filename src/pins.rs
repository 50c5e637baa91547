//! GPIO / peripheral pin assignments for the PT100 monitor board (ESP32).
//!
//! Single source of truth: `hw_init` claims every pin by these numbers,
//! for the ESP-IDF drivers and for the raw button interrupt alike.

// ---------------------------------------------------------------------------
// MAX31865 RTD converter (VSPI / SPI3)
// ---------------------------------------------------------------------------

pub const RTD_SCLK_GPIO: i32 = 18;
pub const RTD_MOSI_GPIO: i32 = 23;
pub const RTD_MISO_GPIO: i32 = 19;
/// Chip select, active LOW.
pub const RTD_CS_GPIO: i32 = 5;
/// The MAX31865 samples on the falling clock edge (CPHA=1).
pub const RTD_SPI_HZ: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// SSD1306 OLED (I2C0)
// ---------------------------------------------------------------------------

pub const OLED_SDA_GPIO: i32 = 21;
pub const OLED_SCL_GPIO: i32 = 22;
pub const OLED_I2C_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// Operator I/O
// ---------------------------------------------------------------------------

/// Out-of-range alert LED, active HIGH.
pub const ALERT_LED_GPIO: i32 = 2;
/// Mode button, switch to GND with the internal pull-up.  Interrupts on
/// the rising (release) edge.
pub const MODE_BUTTON_GPIO: i32 = 15;
