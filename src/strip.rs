//! LED strips and the driver that hands out their channels.
//!
//! Provides [`StripDriver`], which owns the peripheral and the channel pool,
//! and [`LedStrip`], one installed strip with its pixel buffer and flush
//! state.

use crate::channel::{Channel, ChannelPool, DEFAULT_CHANNEL_COUNT};
use crate::colors::{Rgbw, rgb_to_rgbw, rgbw_to_rgb};
use crate::config::StripConfig;
use crate::peripheral::{ChannelConfig, PulsePeripheral, TxStatus, WaitTimeout};
use crate::pixels::{PixelBuffer, PixelError};
use crate::timing::{CLOCK_DIVIDER, TimingProfile};
use crate::translate::translate;
use crate::types::{ColorOrder, PixelIndex, StripError};

impl<E> From<PixelError> for StripError<E> {
    fn from(err: PixelError) -> Self {
        match err {
            PixelError::OutOfMemory => StripError::OutOfMemory,
            PixelError::IndexOutOfRange => StripError::InvalidSize,
        }
    }
}

/// Owns the pulse peripheral and tracks which of its channels are claimed.
///
/// Create one per peripheral and install strips through it. Strips borrow
/// the driver, so it must outlive them.
///
/// # Type Parameters
/// * `P` - Peripheral implementation
/// * `C` - Number of hardware channels
pub struct StripDriver<P: PulsePeripheral, const C: usize = DEFAULT_CHANNEL_COUNT> {
    peripheral: P,
    channels: ChannelPool<C>,
}

impl<P: PulsePeripheral> StripDriver<P> {
    /// Creates a driver for a peripheral with the default channel count.
    pub fn new(peripheral: P) -> Self {
        Self::with_channels(peripheral)
    }
}

impl<P: PulsePeripheral, const C: usize> StripDriver<P, C> {
    /// Creates a driver managing `C` channels, all free.
    pub fn with_channels(peripheral: P) -> Self {
        Self {
            peripheral,
            channels: ChannelPool::new(),
        }
    }

    /// Installs a strip on the lowest free channel.
    ///
    /// See [`LedStrip::install`].
    pub fn install(&self, config: &StripConfig) -> Result<LedStrip<'_, P, C>, StripError<P::Error>> {
        LedStrip::install(self, config)
    }

    /// The wrapped peripheral.
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// The channel pool.
    pub fn channels(&self) -> &ChannelPool<C> {
        &self.channels
    }

    /// Consumes the driver and returns the peripheral.
    pub fn into_peripheral(self) -> P {
        self.peripheral
    }
}

/// Flush state of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushState {
    /// No transmission in flight; the pixel buffer may be changed.
    Idle,
    /// The peripheral is still sending the pixel buffer.
    Transmitting,
}

/// One installed LED strip.
///
/// Owns the pixel buffer and a hardware channel. At most one flush can be
/// in flight; starting another before it is done fails with
/// [`StripError::NotFinished`]. Changing pixels while a flush is in flight
/// is allowed but the LEDs may show a mix of old and new data.
///
/// # Buffer lifetime
///
/// The bytes passed to [`PulsePeripheral::transmit`] are the strip's pixel
/// buffer. It is allocated once at install and never moves. It is freed
/// only after the channel has been uninstalled successfully, so a
/// peripheral may keep reading it until `uninstall` returns `Ok`. If the
/// channel cannot be uninstalled when the strip is dropped, the buffer is
/// leaked instead of freed.
///
/// Dropping the strip uninstalls the channel and returns it to the pool,
/// ignoring errors. Use [`free`](Self::free) to see them and retry.
pub struct LedStrip<'d, P: PulsePeripheral, const C: usize = DEFAULT_CHANNEL_COUNT> {
    driver: &'d StripDriver<P, C>,
    channel: Option<Channel>,
    pixels: PixelBuffer,
    timing: TimingProfile,
    has_flushed: bool,
}

impl<'d, P: PulsePeripheral, const C: usize> LedStrip<'d, P, C> {
    /// Installs a strip.
    ///
    /// Allocates the pixel buffer, resolves the timing, claims a channel and
    /// binds the translator to it. On failure everything claimed so far is
    /// released again.
    ///
    /// # Errors
    /// * `Unsupported` - `led_count` is 2
    /// * `InvalidArgument` - no output pin, or manual timing that does not fit 15 bits
    /// * `OutOfMemory` - the pixel buffer could not be allocated
    /// * `NotFound` - every channel is claimed
    /// * `Peripheral` - a driver call failed
    pub fn install(
        driver: &'d StripDriver<P, C>,
        config: &StripConfig,
    ) -> Result<Self, StripError<P::Error>> {
        if config.led_count == 2 {
            return Err(StripError::Unsupported);
        }
        let output_pin = config.output_pin.ok_or(StripError::InvalidArgument)?;

        let pixels = PixelBuffer::new(config.led_count, config.color_order, config.white_channel)?;

        let timing = config.timing.resolve();
        if !timing.is_valid() {
            return Err(StripError::InvalidArgument);
        }

        let channel = driver.channels.acquire().ok_or(StripError::NotFound)?;
        let channel_config = ChannelConfig {
            output_pin,
            clock_divider: CLOCK_DIVIDER,
        };
        if let Err(err) = bind_channel(&driver.peripheral, channel, &channel_config, timing) {
            driver.channels.release(channel);
            return Err(StripError::Peripheral(err));
        }

        debug!(
            "led strip: installed {} leds on channel {}",
            config.led_count,
            channel.index()
        );

        Ok(Self {
            driver,
            channel: Some(channel),
            pixels,
            timing,
            has_flushed: false,
        })
    }

    /// Uninstalls the channel, returns it to the pool and frees the buffer.
    ///
    /// If the peripheral fails to uninstall, the strip is handed back
    /// unchanged together with the error. Its channel stays claimed and
    /// `free` can be called again.
    ///
    /// ```rust,ignore
    /// strip.free().map_err(|(_strip, err)| err)?;
    /// ```
    pub fn free(mut self) -> Result<(), (Self, StripError<P::Error>)> {
        match self.teardown() {
            Ok(()) => Ok(()),
            Err(err) => Err((self, StripError::Peripheral(err))),
        }
    }

    /// Checks whether the last flush has finished, without blocking.
    ///
    /// A strip that has never been flushed is done.
    pub fn flush_done(&self) -> Result<bool, StripError<P::Error>> {
        if !self.has_flushed {
            return Ok(true);
        }
        let channel = self.channel()?;
        match self
            .driver
            .peripheral
            .wait_complete(channel, WaitTimeout::Immediate)
        {
            Ok(TxStatus::Done) => Ok(true),
            Ok(TxStatus::Pending) => Ok(false),
            Err(err) => {
                warn!("led strip: status query failed on channel {}", channel.index());
                Err(StripError::Peripheral(err))
            }
        }
    }

    /// Current flush state, as seen by [`flush_done`](Self::flush_done).
    pub fn state(&self) -> Result<FlushState, StripError<P::Error>> {
        Ok(if self.flush_done()? {
            FlushState::Idle
        } else {
            FlushState::Transmitting
        })
    }

    /// Starts sending the pixel buffer and returns at once.
    ///
    /// Poll [`flush_done`](Self::flush_done) or call
    /// [`wait_for_flush_finish`](Self::wait_for_flush_finish) before the
    /// next flush.
    pub fn start_flush(&mut self) -> Result<(), StripError<P::Error>> {
        self.transmit(false)
    }

    /// Sends the pixel buffer, blocking until the peripheral has queued it.
    ///
    /// Returns before the last pulse leaves the pin.
    pub fn flush(&mut self) -> Result<(), StripError<P::Error>> {
        self.transmit(true)
    }

    /// Blocks until the channel reports the transmission finished.
    pub fn wait_for_flush_finish(&self) -> Result<(), StripError<P::Error>> {
        let channel = self.channel()?;
        match self
            .driver
            .peripheral
            .wait_complete(channel, WaitTimeout::Forever)
        {
            Ok(TxStatus::Done) => Ok(()),
            Ok(TxStatus::Pending) => Err(StripError::NotFinished),
            Err(err) => {
                warn!("led strip: wait failed on channel {}", channel.index());
                Err(StripError::Peripheral(err))
            }
        }
    }

    /// Sets one pixel. White is written as 0 on RGBW strips.
    pub fn set_pixel_rgb(
        &mut self,
        index: PixelIndex,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<(), StripError<P::Error>> {
        let color = self.rgb_for_strip(Rgbw::rgb(r, g, b));
        self.pixels.write_pixel(index, color)?;
        Ok(())
    }

    /// Sets one pixel. White is dropped on RGB strips.
    pub fn set_pixel_rgbw(
        &mut self,
        index: PixelIndex,
        r: u8,
        g: u8,
        b: u8,
        w: u8,
    ) -> Result<(), StripError<P::Error>> {
        self.set_pixel(index, Rgbw::new(r, g, b, w))
    }

    /// Sets one pixel from any color convertible to [`Rgbw`].
    pub fn set_pixel(
        &mut self,
        index: PixelIndex,
        color: impl Into<Rgbw>,
    ) -> Result<(), StripError<P::Error>> {
        let color = self.rgbw_for_strip(color.into());
        self.pixels.write_pixel(index, color)?;
        Ok(())
    }

    /// Sets every pixel. White is written as 0 on RGBW strips.
    pub fn fill_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), StripError<P::Error>> {
        let color = self.rgb_for_strip(Rgbw::rgb(r, g, b));
        self.pixels.fill(color);
        Ok(())
    }

    /// Sets every pixel. White is dropped on RGB strips.
    pub fn fill_rgbw(&mut self, r: u8, g: u8, b: u8, w: u8) -> Result<(), StripError<P::Error>> {
        self.fill(Rgbw::new(r, g, b, w))
    }

    /// Sets every pixel from any color convertible to [`Rgbw`].
    pub fn fill(&mut self, color: impl Into<Rgbw>) -> Result<(), StripError<P::Error>> {
        let color = self.rgbw_for_strip(color.into());
        self.pixels.fill(color);
        Ok(())
    }

    /// Reads a pixel back from the buffer.
    pub fn pixel(&self, index: PixelIndex) -> Option<Rgbw> {
        self.pixels.pixel(index)
    }

    /// The pixel buffer in transmission order.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn led_count(&self) -> PixelIndex {
        self.pixels.led_count()
    }

    pub fn color_order(&self) -> ColorOrder {
        self.pixels.color_order()
    }

    pub fn white_channel_enabled(&self) -> bool {
        self.pixels.white_channel()
    }

    /// Resolved timing in ticks.
    pub fn timing(&self) -> TimingProfile {
        self.timing
    }

    /// Hardware channel claimed by this strip.
    pub fn channel_id(&self) -> Option<Channel> {
        self.channel
    }

    /// True once any flush has been started.
    pub fn has_flushed(&self) -> bool {
        self.has_flushed
    }

    fn channel(&self) -> Result<Channel, StripError<P::Error>> {
        self.channel.ok_or(StripError::InvalidArgument)
    }

    fn rgb_for_strip(&self, color: Rgbw) -> Rgbw {
        if self.pixels.white_channel() {
            rgb_to_rgbw(color)
        } else {
            color
        }
    }

    fn rgbw_for_strip(&self, color: Rgbw) -> Rgbw {
        if self.pixels.white_channel() {
            color
        } else {
            rgbw_to_rgb(color)
        }
    }

    fn transmit(&mut self, blocking: bool) -> Result<(), StripError<P::Error>> {
        if !self.flush_done()? {
            return Err(StripError::NotFinished);
        }
        let channel = self.channel()?;
        if let Err(err) =
            self.driver
                .peripheral
                .transmit(channel, self.pixels.as_bytes(), blocking)
        {
            warn!("led strip: transmit failed on channel {}", channel.index());
            return Err(StripError::Peripheral(err));
        }
        self.has_flushed = true;
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), P::Error> {
        let Some(channel) = self.channel else {
            return Ok(());
        };
        if let Err(err) = self.driver.peripheral.uninstall(channel) {
            warn!("led strip: uninstall failed on channel {}", channel.index());
            return Err(err);
        }
        self.channel = None;
        self.driver.channels.release(channel);
        debug!("led strip: released channel {}", channel.index());
        Ok(())
    }
}

impl<P: PulsePeripheral, const C: usize> Drop for LedStrip<'_, P, C> {
    fn drop(&mut self) {
        if self.teardown().is_err() {
            // The peripheral may still read the pixel buffer.
            self.pixels.leak();
        }
    }
}

impl<P: PulsePeripheral, const C: usize> core::fmt::Debug for LedStrip<'_, P, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedStrip")
            .field("channel", &self.channel)
            .field("led_count", &self.pixels.led_count())
            .field("timing", &self.timing)
            .field("has_flushed", &self.has_flushed)
            .finish_non_exhaustive()
    }
}

/// Configures and installs the channel and binds the translator.
///
/// Once the driver install succeeded, a later failure uninstalls it again.
fn bind_channel<P: PulsePeripheral>(
    peripheral: &P,
    channel: Channel,
    config: &ChannelConfig,
    timing: TimingProfile,
) -> Result<(), P::Error> {
    peripheral.configure(channel, config).inspect_err(|_| {
        warn!("led strip: configure failed on channel {}", channel.index());
    })?;
    peripheral.install(channel).inspect_err(|_| {
        warn!("led strip: install failed on channel {}", channel.index());
    })?;

    let bound = peripheral
        .set_translator(channel, translate)
        .and_then(|()| peripheral.set_translator_context(channel, timing))
        .and_then(|()| peripheral.set_loop_mode(channel, false));
    if let Err(err) = bound {
        warn!("led strip: binding translator failed on channel {}", channel.index());
        let _ = peripheral.uninstall(channel);
        return Err(err);
    }
    Ok(())
}
