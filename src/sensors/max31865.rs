//! MAX31865 RTD-to-digital converter (PT100, SPI).
//!
//! Runs in automatic conversion mode: the converter samples continuously and
//! [`Max31865::measure`] only reads the latest RTD code.
//!
//! ## Registers
//!
//! | Addr | Register            |
//! |------|---------------------|
//! | 0x00 | Configuration       |
//! | 0x01 | RTD MSB             |
//! | 0x02 | RTD LSB (bit0=fault)|
//! | 0x07 | Fault status        |
//!
//! Writes use the read address with bit 7 set.
//!
//! ## Conversion
//!
//! `R = code * R_ref / 2^15`, then the Callendar–Van Dusen equation
//! `R(T) = R0 (1 + A·T + B·T² + C·(T − 100)·T³)` is inverted: closed form
//! for `R >= R0`, Newton iteration below 0 °C where the `C` term applies.

use embedded_hal::spi::SpiDevice;

use crate::app::ports::SensorPort;
use crate::config::{RTD_NOMINAL_OHMS, RTD_REFERENCE_OHMS};
use crate::error::SensorFault;

const REG_CONFIG: u8 = 0x00;
const REG_RTD_MSB: u8 = 0x01;
const REG_FAULT_STATUS: u8 = 0x07;
const WRITE_FLAG: u8 = 0x80;

const CFG_VBIAS: u8 = 0x80;
const CFG_AUTO: u8 = 0x40;
const CFG_3WIRE: u8 = 0x10;
const CFG_FAULT_CLEAR: u8 = 0x02;
const CFG_FILTER_50HZ: u8 = 0x01;

const RTD_FAULT_BIT: u16 = 0x0001;
const ADC_FULL_SCALE: f64 = 32768.0;
const NEWTON_STEPS: usize = 8;

/// RTD lead configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wiring {
    TwoWire,
    ThreeWire,
    FourWire,
}

/// Mains rejection notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Hz50,
    Hz60,
}

/// Callendar–Van Dusen coefficient set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtdStandard {
    Its90,
    Din43760,
    UsIndustrial,
}

impl RtdStandard {
    /// `(A, B, C)` coefficients.
    pub const fn coefficients(self) -> (f64, f64, f64) {
        match self {
            Self::Its90 => (3.9083e-3, -5.775e-7, -4.183e-12),
            Self::Din43760 => (3.9080e-3, -5.8019e-7, -4.2735e-12),
            Self::UsIndustrial => (3.9692e-3, -5.8495e-7, -4.2325e-12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max31865Config {
    pub reference_ohms: f32,
    pub nominal_ohms: f32,
    pub standard: RtdStandard,
    pub wiring: Wiring,
    pub filter: Filter,
    pub v_bias: bool,
    pub auto_conversion: bool,
}

impl Default for Max31865Config {
    fn default() -> Self {
        Self {
            reference_ohms: RTD_REFERENCE_OHMS,
            nominal_ohms: RTD_NOMINAL_OHMS,
            standard: RtdStandard::Its90,
            wiring: Wiring::TwoWire,
            filter: Filter::Hz50,
            v_bias: true,
            auto_conversion: true,
        }
    }
}

impl Max31865Config {
    /// Configuration register value (without the fault-clear bit).
    pub fn register_value(&self) -> u8 {
        let mut v = 0;
        if self.v_bias {
            v |= CFG_VBIAS;
        }
        if self.auto_conversion {
            v |= CFG_AUTO;
        }
        if self.wiring == Wiring::ThreeWire {
            v |= CFG_3WIRE;
        }
        if self.filter == Filter::Hz50 {
            v |= CFG_FILTER_50HZ;
        }
        v
    }
}

pub struct Max31865<SPI> {
    spi: SPI,
    config: Max31865Config,
}

impl<SPI: SpiDevice> Max31865<SPI> {
    /// Take the SPI device and write the configuration register.
    pub fn new(spi: SPI, config: Max31865Config) -> Result<Self, SensorFault> {
        let mut dev = Self { spi, config };
        dev.write_register(REG_CONFIG, config.register_value())?;
        Ok(dev)
    }

    /// Read the latest conversion and return Celsius.
    pub fn measure(&mut self) -> Result<f32, SensorFault> {
        let raw = self.read_rtd_raw()?;
        if raw & RTD_FAULT_BIT != 0 {
            let status = self.read_register(REG_FAULT_STATUS)?;
            self.clear_fault()?;
            return Err(SensorFault::Rtd(status));
        }

        let ohms = code_to_ohms(raw >> 1, self.config.reference_ohms);
        let celsius = ohms_to_celsius(ohms, self.config.nominal_ohms, self.config.standard);
        if celsius.is_finite() {
            Ok(celsius)
        } else {
            Err(SensorFault::Implausible)
        }
    }

    /// Release the SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }

    // ── Register access ───────────────────────────────────────

    fn read_rtd_raw(&mut self) -> Result<u16, SensorFault> {
        let mut buf = [REG_RTD_MSB, 0, 0];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| SensorFault::Bus)?;
        Ok(u16::from_be_bytes([buf[1], buf[2]]))
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorFault> {
        let mut buf = [reg & !WRITE_FLAG, 0];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| SensorFault::Bus)?;
        Ok(buf[1])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorFault> {
        self.spi
            .write(&[reg | WRITE_FLAG, value])
            .map_err(|_| SensorFault::Bus)
    }

    fn clear_fault(&mut self) -> Result<(), SensorFault> {
        let cfg = self.config.register_value() | CFG_FAULT_CLEAR;
        self.write_register(REG_CONFIG, cfg)
    }
}

impl<SPI: SpiDevice> SensorPort for Max31865<SPI> {
    fn read(&mut self) -> Result<f32, SensorFault> {
        self.measure()
    }
}

// ── Conversion ────────────────────────────────────────────────

/// 15-bit RTD code to ohms.
pub fn code_to_ohms(code: u16, reference_ohms: f32) -> f32 {
    (f64::from(code) * f64::from(reference_ohms) / ADC_FULL_SCALE) as f32
}

/// Invert the Callendar–Van Dusen equation.
pub fn ohms_to_celsius(ohms: f32, nominal_ohms: f32, standard: RtdStandard) -> f32 {
    let (a, b, c) = standard.coefficients();
    let ratio = f64::from(ohms) / f64::from(nominal_ohms);

    // Quadratic solution: exact at/above 0 °C, starting guess below.
    let disc = a * a - 4.0 * b * (1.0 - ratio);
    if disc < 0.0 {
        return f32::NAN;
    }
    let mut t = (-a + disc.sqrt()) / (2.0 * b);
    if ratio >= 1.0 {
        return t as f32;
    }

    for _ in 0..NEWTON_STEPS {
        let f = 1.0 + a * t + b * t * t + c * (t - 100.0) * t * t * t - ratio;
        let df = a + 2.0 * b * t + c * (4.0 * t * t * t - 300.0 * t * t);
        if df == 0.0 {
            break;
        }
        t -= f / df;
    }
    t as f32
}
