#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`StripDriver`**: Owns the pulse peripheral and its pool of transmission channels
//! - **`LedStrip`**: One installed strip: pixel buffer, timing, channel and flush state
//! - **`StripConfig`**: Pin, LED count, color order, white channel and timing for a strip
//! - **`PulsePeripheral`**: Trait to implement for your pulse-train hardware
//! - **`translate`**: The byte to pulse translator the peripheral calls while sending
//! - **`TimingProfile`**: Bit and reset durations in peripheral ticks
//! - **`Rgbw`**: 8-bit color with optional white component
//!
//! Pixels are stored in wire order (3 or 4 bytes per LED) so a flush hands
//! the buffer to the peripheral without copying. Flushes never queue: a
//! second flush while one is in flight fails with
//! [`StripError::NotFinished`].

extern crate alloc;

#[macro_use]
mod fmt;

pub mod channel;
pub mod colors;
pub mod config;
pub mod peripheral;
pub mod pixels;
pub mod strip;
pub mod timing;
pub mod translate;
pub mod types;

pub use palette::Srgb;

pub use channel::{Channel, ChannelPool, DEFAULT_CHANNEL_COUNT, MAX_CHANNEL_COUNT};
pub use colors::Rgbw;
pub use config::StripConfig;
pub use peripheral::{ChannelConfig, PulsePeripheral, TxStatus, WaitTimeout};
pub use pixels::{PixelBuffer, PixelError};
pub use strip::{FlushState, LedStrip, StripDriver};
pub use timing::{LedProtocol, TimingConfig, TimingProfile};
pub use translate::{FrameTranslator, PulseCode, TranslateFn, Translation, translate};
pub use types::{ColorOrder, PixelIndex, StripError};
