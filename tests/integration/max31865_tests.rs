//! MAX31865 driver against an emulated register file.

use crate::mock_hw::FakeMax31865;

use pt100_monitor::app::ports::SensorPort;
use pt100_monitor::error::SensorFault;
use pt100_monitor::sensors::max31865::{Max31865, Max31865Config};

fn driver(fake: FakeMax31865) -> Max31865<FakeMax31865> {
    Max31865::new(fake, Max31865Config::default()).unwrap()
}

#[test]
fn init_writes_default_configuration() {
    let dev = driver(FakeMax31865::new());
    let fake = dev.release();
    assert_eq!(fake.writes, vec![(0x00, 0xC1)]);
}

#[test]
fn nominal_resistance_reads_near_zero() {
    let mut fake = FakeMax31865::new();
    fake.set_rtd(FakeMax31865::code_for_ohms(100.0), false);
    let mut dev = driver(fake);

    let t = dev.read().unwrap();
    // 15-bit quantisation at 430 Ω reference is ~0.013 Ω per code.
    assert!(t.abs() < 0.05, "got {t}");
}

#[test]
fn hot_and_cold_points_convert() {
    let mut fake = FakeMax31865::new();
    fake.set_rtd(FakeMax31865::code_for_ohms(138.5055), false);
    let mut dev = driver(fake);
    let hot = dev.read().unwrap();
    assert!((hot - 100.0).abs() < 0.1, "got {hot}");

    let mut fake = dev.release();
    fake.set_rtd(FakeMax31865::code_for_ohms(80.3063), false);
    let mut dev = driver(fake);
    let cold = dev.read().unwrap();
    assert!((cold + 50.0).abs() < 0.1, "got {cold}");
}

#[test]
fn fault_bit_reports_status_and_clears() {
    let mut fake = FakeMax31865::new();
    fake.set_rtd(0x7FFF, true);
    fake.regs[0x07] = 0x84;
    let mut dev = driver(fake);

    assert_eq!(dev.read(), Err(SensorFault::Rtd(0x84)));
    let fake = dev.release();
    assert_eq!(fake.writes.last(), Some(&(0x00, 0xC3)));
}

#[test]
fn bus_error_on_read_maps_to_bus_fault() {
    let mut fake = FakeMax31865::new();
    fake.fail_reads = true;
    let mut dev = driver(fake);
    assert_eq!(dev.read(), Err(SensorFault::Bus));
}

#[test]
fn dead_bus_fails_construction() {
    let mut fake = FakeMax31865::new();
    fake.fail = true;
    assert_eq!(
        Max31865::new(fake, Max31865Config::default()).err(),
        Some(SensorFault::Bus)
    );
}
