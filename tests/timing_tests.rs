//! Integration tests for timing resolution

mod common;
use common::*;

use pulse_led_strip::timing::{MAX_TICKS, ns_to_ticks, preset, us_to_ticks};
use pulse_led_strip::{LedProtocol, StripConfig, StripDriver, TimingConfig, TimingProfile};

#[test]
fn datasheet_values_round_up_to_ticks() {
    assert_eq!(ns_to_ticks(600), 6);
    assert_eq!(ns_to_ticks(350), 4);
    assert_eq!(ns_to_ticks(101), 2);
    assert_eq!(us_to_ticks(50), 500);
    assert_eq!(
        TimingProfile::from_nanos(350, 900, 900, 350, 50),
        TimingProfile::new(4, 9, 9, 4, 500)
    );
}

#[test]
fn microsecond_conversion_saturates() {
    assert_eq!(us_to_ticks(u32::MAX), ns_to_ticks(u32::MAX));
}

#[test]
fn default_config_uses_sk6822() {
    assert_eq!(
        TimingConfig::default().resolve(),
        TimingProfile::new(3, 9, 6, 6, 800)
    );
    assert_eq!(
        StripConfig::default().timing,
        TimingConfig::Protocol(LedProtocol::SK6822)
    );
}

#[test]
fn unknown_protocol_resolves_to_sk6822() {
    let timing = TimingConfig::from(LedProtocol::from(0x42)).resolve();

    assert_eq!(timing, preset(LedProtocol::SK6822));
}

#[test]
fn strip_reports_resolved_preset() {
    let driver = StripDriver::new(MockPeripheral::new());

    let sk = driver.install(&StripConfig::new(4, 10)).unwrap();
    let ws = driver
        .install(&StripConfig::new(5, 10).with_protocol(LedProtocol::WS281X))
        .unwrap();
    let unknown = driver
        .install(&StripConfig::new(6, 10).with_protocol(LedProtocol(0x7F)))
        .unwrap();

    assert_eq!(sk.timing(), TimingProfile::new(3, 9, 6, 6, 800));
    assert_eq!(ws.timing(), TimingProfile::new(4, 9, 9, 4, 500));
    assert_eq!(unknown.timing(), sk.timing());
}

#[test]
fn manual_timing_is_used_verbatim() {
    let driver = StripDriver::new(MockPeripheral::new());
    let manual = TimingProfile::new(1, 2, 3, 4, MAX_TICKS);

    let strip = driver
        .install(&StripConfig::new(4, 3).with_manual_timing(manual))
        .unwrap();
    let channel = strip.channel_id().unwrap();

    assert_eq!(strip.timing(), manual);
    assert_eq!(driver.peripheral().context(channel), Some(manual));
}

#[test]
fn manual_timing_reaches_the_wire() {
    let driver = StripDriver::new(MockPeripheral::new());
    let manual = TimingProfile::new(11, 22, 33, 44, 1000);

    let mut strip = driver
        .install(&StripConfig::new(4, 1).with_manual_timing(manual))
        .unwrap();
    let channel = strip.channel_id().unwrap();
    strip.set_pixel_rgb(0, 0x80, 0x01, 0xFF).unwrap();
    strip.flush().unwrap();

    let frame = driver.peripheral().last_frame(channel).unwrap();
    assert_eq!(frame.pulses, expected_frame(&[0x80, 0xFF, 0x01], &manual));
}
