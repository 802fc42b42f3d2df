//! Strip configuration.

use crate::timing::{LedProtocol, TimingConfig, TimingProfile};
use crate::types::{ColorOrder, PixelIndex};

/// Everything needed to install a strip.
///
/// The default is an unconnected, empty SK6822 strip in `Rgbw` order with
/// the white channel off; set at least the pin and LED count before
/// installing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripConfig {
    /// Preset protocol or manual timing.
    pub timing: TimingConfig,

    /// Byte order of the LED chips.
    pub color_order: ColorOrder,

    /// GPIO driving the data line. `None` is rejected at install.
    pub output_pin: Option<u32>,

    /// Number of LEDs. Exactly 2 is not supported by the hardware.
    pub led_count: PixelIndex,

    /// Send a fourth (white) byte per pixel.
    pub white_channel: bool,
}

impl StripConfig {
    /// Creates a configuration for `led_count` LEDs on `output_pin`.
    pub const fn new(output_pin: u32, led_count: PixelIndex) -> Self {
        Self {
            timing: TimingConfig::Protocol(LedProtocol::SK6822),
            color_order: ColorOrder::Rgbw,
            output_pin: Some(output_pin),
            led_count,
            white_channel: false,
        }
    }

    /// Uses the preset timing for `protocol`.
    pub const fn with_protocol(mut self, protocol: LedProtocol) -> Self {
        self.timing = TimingConfig::Protocol(protocol);
        self
    }

    /// Uses caller supplied tick counts.
    pub const fn with_manual_timing(mut self, timing: TimingProfile) -> Self {
        self.timing = TimingConfig::Manual(timing);
        self
    }

    pub const fn with_color_order(mut self, color_order: ColorOrder) -> Self {
        self.color_order = color_order;
        self
    }

    pub const fn with_white_channel(mut self, enabled: bool) -> Self {
        self.white_channel = enabled;
        self
    }
}
