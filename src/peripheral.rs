//! Hardware abstraction for the pulse-train peripheral.

use crate::channel::Channel;
use crate::timing::TimingProfile;
use crate::translate::TranslateFn;

/// How long [`PulsePeripheral::wait_complete`] may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitTimeout {
    /// Return at once with the current status.
    Immediate,

    /// Block until the transmission has finished.
    Forever,
}

/// Transmission status reported by [`PulsePeripheral::wait_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxStatus {
    /// Nothing is being sent.
    Done,

    /// The timeout expired with pulses still going out.
    Pending,
}

/// Channel configuration applied at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// GPIO driving the strip's data line.
    pub output_pin: u32,

    /// Divider applied to the source clock.
    pub clock_divider: u8,
}

/// Driver for a pulse-train peripheral such as the ESP32 RMT.
///
/// Implement this for your hardware (or an in-memory double) to let
/// [`LedStrip`](crate::LedStrip) drive it. Methods take `&self` because one
/// peripheral serves every strip; implementations needing mutable state
/// use interior mutability.
///
/// The peripheral converts bytes to pulses by calling the bound
/// [`TranslateFn`] with the bound timing context each time it needs more
/// pulse entries, until the frame is exhausted.
pub trait PulsePeripheral {
    /// Error reported by the driver.
    type Error;

    /// Routes the channel to a pin and sets its clock divider.
    fn configure(&self, channel: Channel, config: &ChannelConfig) -> Result<(), Self::Error>;

    /// Installs the channel driver.
    fn install(&self, channel: Channel) -> Result<(), Self::Error>;

    /// Removes the channel driver, stopping any transmission.
    fn uninstall(&self, channel: Channel) -> Result<(), Self::Error>;

    /// Binds the byte to pulse translator for the channel.
    fn set_translator(&self, channel: Channel, translator: TranslateFn) -> Result<(), Self::Error>;

    /// Binds the context passed to the translator on every call.
    fn set_translator_context(
        &self,
        channel: Channel,
        timing: TimingProfile,
    ) -> Result<(), Self::Error>;

    /// Enables or disables repeating the frame forever.
    fn set_loop_mode(&self, _channel: Channel, _enabled: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Starts sending `data`.
    ///
    /// With `blocking` set, returns once the whole buffer has been accepted
    /// into the transmit queue (not when the last pulse leaves the pin).
    ///
    /// `data` is only borrowed for the call. A non-blocking implementation
    /// either copies it or keeps its address: [`LedStrip`](crate::LedStrip)
    /// passes its pixel buffer, which does not move and is not freed until
    /// `uninstall` for this channel has returned `Ok`. The caller may write
    /// new pixel values into it while the transmission is in flight.
    fn transmit(&self, channel: Channel, data: &[u8], blocking: bool) -> Result<(), Self::Error>;

    /// Waits for the current transmission to finish.
    ///
    /// An expired timeout is reported as [`TxStatus::Pending`], not as an
    /// error.
    fn wait_complete(&self, channel: Channel, timeout: WaitTimeout) -> Result<TxStatus, Self::Error>;
}

impl<T: PulsePeripheral + ?Sized> PulsePeripheral for &T {
    type Error = T::Error;

    fn configure(&self, channel: Channel, config: &ChannelConfig) -> Result<(), Self::Error> {
        (**self).configure(channel, config)
    }

    fn install(&self, channel: Channel) -> Result<(), Self::Error> {
        (**self).install(channel)
    }

    fn uninstall(&self, channel: Channel) -> Result<(), Self::Error> {
        (**self).uninstall(channel)
    }

    fn set_translator(&self, channel: Channel, translator: TranslateFn) -> Result<(), Self::Error> {
        (**self).set_translator(channel, translator)
    }

    fn set_translator_context(
        &self,
        channel: Channel,
        timing: TimingProfile,
    ) -> Result<(), Self::Error> {
        (**self).set_translator_context(channel, timing)
    }

    fn set_loop_mode(&self, channel: Channel, enabled: bool) -> Result<(), Self::Error> {
        (**self).set_loop_mode(channel, enabled)
    }

    fn transmit(&self, channel: Channel, data: &[u8], blocking: bool) -> Result<(), Self::Error> {
        (**self).transmit(channel, data, blocking)
    }

    fn wait_complete(&self, channel: Channel, timeout: WaitTimeout) -> Result<TxStatus, Self::Error> {
        (**self).wait_complete(channel, timeout)
    }
}
