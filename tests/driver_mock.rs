use core::cell::Cell;

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use veml6075_rs::{Error, RawCounts, Veml6075};

const ADDR: u8 = 0x10;

fn probe() -> Vec<I2cTrans> {
    vec![
        // ID = 0x0026
        I2cTrans::write_read(ADDR, vec![0x0C], vec![0x26, 0x00]),
        // UV_CONF = 0x0010 (100 ms, powered on)
        I2cTrans::write(ADDR, vec![0x00, 0x10, 0x00]),
    ]
}

fn word(reg: u8, value: u16) -> I2cTrans {
    I2cTrans::write_read(ADDR, vec![reg], value.to_le_bytes().to_vec())
}

fn poll(raw: RawCounts) -> Vec<I2cTrans> {
    vec![
        word(0x07, raw.uva),
        word(0x09, raw.uvb),
        word(0x0A, raw.vis_comp),
        word(0x0B, raw.ir_comp),
        word(0x08, raw.dark),
    ]
}

fn counts(uva: u16, uvb: u16, dark: u16, vis_comp: u16, ir_comp: u16) -> RawCounts {
    RawCounts { uva, uvb, dark, vis_comp, ir_comp }
}

#[test]
fn create_probes_id_and_configures() {
    let mut i2c = I2cMock::new(&probe());
    let sensor = Veml6075::new_default(&mut i2c, || 0.0).unwrap();
    assert_eq!(sensor.address(), 0x10);
    assert_eq!(sensor.stats(), Default::default());
    assert_eq!(sensor.last_read_time(), None);
    drop(sensor);
    i2c.done();
}

#[test]
fn create_ignores_id_high_byte() {
    let expectations = [
        I2cTrans::write_read(0x11, vec![0x0C], vec![0x26, 0x05]),
        I2cTrans::write(0x11, vec![0x00, 0x10, 0x00]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let sensor = Veml6075::new(&mut i2c, || 0.0, 0x11).unwrap();
    assert_eq!(sensor.address(), 0x11);
    drop(sensor);
    i2c.done();
}

#[test]
fn create_rejects_wrong_device_id() {
    // No configuration write follows a failed probe.
    let expectations = [I2cTrans::write_read(ADDR, vec![0x0C], vec![0x25, 0x00])];
    let mut i2c = I2cMock::new(&expectations);
    let result = Veml6075::new(&mut i2c, || 0.0, ADDR);
    assert!(matches!(result, Err(Error::DeviceIdMismatch(0x25))));
    i2c.done();
}

#[test]
fn create_fails_when_bus_fails() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0x0C], vec![0x00, 0x00]).with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);
    let result = Veml6075::new(&mut i2c, || 0.0, ADDR);
    assert!(matches!(result, Err(Error::I2c(ErrorKind::Other))));
    i2c.done();
}

#[test]
fn accessors_share_one_poll_within_delay() {
    let raw = counts(100, 200, 3, 4, 5);
    let mut expectations = probe();
    expectations.extend(poll(raw));
    let mut i2c = I2cMock::new(&expectations);
    let now = Cell::new(100.0);

    let mut sensor = Veml6075::new(&mut i2c, || now.get(), ADDR).unwrap();
    assert!(sensor.is_stale());
    assert_eq!(sensor.raw_uva(), 100);
    assert!(!sensor.is_stale());
    now.set(101.5);
    assert_eq!(sensor.raw_uvb(), 200);
    assert_eq!(sensor.raw_dark(), 3);
    assert_eq!(sensor.raw_vis_comp(), 4);
    assert_eq!(sensor.raw_ir_comp(), 5);

    let stats = sensor.stats();
    assert_eq!(stats.read, 5);
    assert_eq!(stats.read_success, 1);
    assert_eq!(stats.read_success_cached, 4);
    assert_eq!(stats.read_errors(), 0);
    assert_eq!(stats.last_read_time, 100.0);
    assert_eq!(sensor.last_read_time(), Some(100.0));

    drop(sensor);
    i2c.done();
}

#[test]
fn poll_again_once_delay_elapsed() {
    let mut expectations = probe();
    expectations.extend(poll(counts(10, 0, 0, 0, 0)));
    expectations.extend(poll(counts(20, 0, 0, 0, 0)));
    let mut i2c = I2cMock::new(&expectations);
    let now = Cell::new(50.0);

    let mut sensor = Veml6075::new(&mut i2c, || now.get(), ADDR).unwrap();
    assert_eq!(sensor.raw_uva(), 10);
    now.set(51.9);
    assert_eq!(sensor.raw_uva(), 10);
    now.set(52.0);
    assert!(sensor.is_stale());
    assert_eq!(sensor.raw_uva(), 20);

    let stats = sensor.stats();
    assert_eq!(stats.read, 3);
    assert_eq!(stats.read_success, 2);
    assert_eq!(stats.read_success_cached, 1);
    assert_eq!(stats.last_read_time, 52.0);

    drop(sensor);
    i2c.done();
}

#[test]
fn failed_poll_keeps_cached_counts() {
    let mut expectations = probe();
    expectations.extend(poll(counts(100, 7, 0, 0, 0)));
    // First retry dies on the UVA read, second on the UVB read.
    expectations.push(word(0x07, 0).with_error(ErrorKind::Other));
    expectations.push(word(0x07, 999));
    expectations.push(word(0x09, 0).with_error(ErrorKind::Other));
    // Third retry succeeds.
    expectations.extend(poll(counts(300, 8, 0, 0, 0)));
    let mut i2c = I2cMock::new(&expectations);
    let now = Cell::new(10.0);

    let mut sensor = Veml6075::new(&mut i2c, || now.get(), ADDR).unwrap();
    assert_eq!(sensor.raw_uva(), 100);

    now.set(13.0);
    assert_eq!(sensor.raw_uva(), 100);
    // No backoff: the timestamp is stuck at the last good poll, so the next call retries.
    assert!(sensor.is_stale());
    assert_eq!(sensor.raw_uvb(), 7);
    assert_eq!(sensor.last_read_time(), Some(10.0));

    let stats = sensor.stats();
    assert_eq!(stats.read, 3);
    assert_eq!(stats.read_success, 1);
    assert_eq!(stats.read_success_cached, 0);
    assert_eq!(stats.read_errors(), 2);
    assert_eq!(stats.last_read_time, 10.0);

    assert_eq!(sensor.raw_uva(), 300);
    assert_eq!(sensor.stats().read_success, 2);
    assert_eq!(sensor.last_read_time(), Some(13.0));

    drop(sensor);
    i2c.done();
}

#[test]
fn refresh_reports_bus_error() {
    let mut expectations = probe();
    expectations.push(word(0x07, 0).with_error(ErrorKind::Other));
    let mut i2c = I2cMock::new(&expectations);

    let mut sensor = Veml6075::new(&mut i2c, || 0.0, ADDR).unwrap();
    assert!(matches!(sensor.refresh(), Err(Error::I2c(ErrorKind::Other))));
    let stats = sensor.stats();
    assert_eq!(stats.read, 1);
    assert_eq!(stats.read_success, 0);
    assert_eq!(stats.read_errors(), 1);
    assert_eq!(stats.last_read_time, 0.0);
    assert_eq!(sensor.last_read_time(), None);

    drop(sensor);
    i2c.done();
}

#[test]
fn uv_index_is_zero_when_never_polled() {
    let mut expectations = probe();
    expectations.push(word(0x07, 0).with_error(ErrorKind::Other));
    let mut i2c = I2cMock::new(&expectations);

    let mut sensor = Veml6075::new(&mut i2c, || 0.0, ADDR).unwrap();
    assert_eq!(sensor.uv_index(), 0.0);
    assert_eq!(sensor.stats().read_errors(), 1);

    drop(sensor);
    i2c.done();
}

#[test]
fn uv_index_uses_a_single_refresh() {
    let mut expectations = probe();
    expectations.extend(poll(counts(1000, 500, 0, 0, 0)));
    let mut i2c = I2cMock::new(&expectations);

    let mut sensor = Veml6075::new(&mut i2c, || 0.0, ADDR).unwrap();
    let index = sensor.uv_index();
    // (1000 * 0.001461 + 500 * 0.002591) / 2
    assert!((index - 1.37825).abs() < 1e-4);
    assert_eq!(sensor.stats().read, 1);
    assert!((sensor.uva() - 1000.0).abs() < 1e-3);
    assert!((sensor.uvb() - 500.0).abs() < 1e-3);
    assert_eq!(sensor.stats().read_success_cached, 2);

    drop(sensor);
    i2c.done();
}

#[test]
fn destroy_clears_slot_and_is_idempotent() {
    let mut i2c = I2cMock::new(&probe());
    let mut slot = Veml6075::new(&mut i2c, || 0.0, ADDR).ok();
    assert!(slot.is_some());
    assert!(Veml6075::stats_of(&slot).is_some());

    assert!(Veml6075::destroy(&mut slot).is_some());
    assert!(slot.is_none());
    assert!(Veml6075::stats_of(&slot).is_none());
    assert!(Veml6075::destroy(&mut slot).is_none());
    assert!(slot.is_none());

    i2c.done();
}

#[test]
fn successful_poll_accumulates_bus_time() {
    let mut expectations = probe();
    expectations.extend(poll(counts(1, 0, 0, 0, 0)));
    expectations.extend(poll(counts(2, 0, 0, 0, 0)));
    let mut i2c = I2cMock::new(&expectations);
    // Every clock read advances time by 1 ms.
    let now = Cell::new(10.0);
    let clock = || {
        let t = now.get();
        now.set(t + 0.001);
        t
    };

    let mut sensor = Veml6075::new(&mut i2c, clock, ADDR).unwrap();
    assert_eq!(sensor.raw_uva(), 1);
    let stats = sensor.stats();
    assert_eq!(stats.read_success, 1);
    assert_eq!(stats.last_read_time, 10.0);
    assert!((stats.read_success_usecs - 1_000.0).abs() < 1e-3);

    now.set(20.0);
    assert_eq!(sensor.raw_uva(), 2);
    assert!((sensor.stats().read_success_usecs - 2_000.0).abs() < 1e-3);

    drop(sensor);
    i2c.done();
}

#[test]
fn failed_poll_adds_no_bus_time() {
    let mut expectations = probe();
    expectations.extend(poll(counts(1, 0, 0, 0, 0)));
    expectations.push(word(0x07, 5));
    expectations.push(word(0x09, 0).with_error(ErrorKind::Other));
    let mut i2c = I2cMock::new(&expectations);
    let now = Cell::new(10.0);
    let clock = || {
        let t = now.get();
        now.set(t + 0.001);
        t
    };

    let mut sensor = Veml6075::new(&mut i2c, clock, ADDR).unwrap();
    assert_eq!(sensor.raw_uva(), 1);
    let before = sensor.stats().read_success_usecs;
    assert!(before > 0.0);

    now.set(20.0);
    assert_eq!(sensor.raw_uva(), 1);
    let stats = sensor.stats();
    assert_eq!(stats.read_errors(), 1);
    assert_eq!(stats.read_success_usecs, before);

    drop(sensor);
    i2c.done();
}
