//! Shared test infrastructure for pulse-led-strip integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};

use pulse_led_strip::{
    Channel, ChannelConfig, PulseCode, PulsePeripheral, TimingProfile, TranslateFn, TxStatus,
    WaitTimeout,
};

// ============================================================================
// Mock Peripheral
// ============================================================================

/// Number of channel slots the mock tracks
pub const MOCK_CHANNELS: usize = 8;

/// Peripheral operations, used for call logs and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Configure,
    Install,
    Uninstall,
    SetTranslator,
    SetContext,
    SetLoopMode,
    Transmit,
    Wait,
}

/// Error returned by the mock for an injected failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub Op);

/// One call made to the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub channel: u8,
}

/// A frame handed to `transmit`, with the pulses the bound translator produced so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub pulses: Vec<PulseCode>,
    pub blocking: bool,
}

/// Transmission in flight: the copied frame and how far it has been translated
struct InFlight {
    frame: Frame,
    cursor: usize,
}

#[derive(Default)]
pub struct ChannelState {
    pub config: Option<ChannelConfig>,
    pub installed: bool,
    pub translator: Option<TranslateFn>,
    pub context: Option<TimingProfile>,
    pub loop_mode: Option<bool>,
    in_flight: Option<InFlight>,
    pub frames: Vec<Frame>,
}

/// In-memory pulse peripheral.
///
/// `transmit` copies the frame and leaves it in flight. Pulses are produced
/// lazily through the bound translator in batches of `batch_size`, like the
/// hardware refill interrupt: one batch per `refill`, the rest on
/// `complete` or a blocking wait. A blocking `transmit` translates the
/// whole frame before returning but still leaves it in flight.
pub struct MockPeripheral {
    channels: RefCell<Vec<ChannelState>>,
    fail_on: Cell<Option<Op>>,
    batch_size: Cell<usize>,
    calls: RefCell<heapless::Vec<Call, 256>>,
}

impl MockPeripheral {
    pub fn new() -> Self {
        Self {
            channels: RefCell::new((0..MOCK_CHANNELS).map(|_| ChannelState::default()).collect()),
            fail_on: Cell::new(None),
            batch_size: Cell::new(64),
            calls: RefCell::new(heapless::Vec::new()),
        }
    }

    /// Make every following call of this kind fail
    pub fn fail_on(&self, op: Op) {
        self.fail_on.set(Some(op));
    }

    pub fn clear_failure(&self) {
        self.fail_on.set(None);
    }

    /// Pulse capacity requested per translator call
    pub fn set_batch_size(&self, pulses: usize) {
        self.batch_size.set(pulses);
    }

    /// Run one refill of the transmission in flight. Returns false when
    /// the translator made no progress.
    pub fn refill(&self, channel: Channel) -> bool {
        self.refill_state(&mut self.channels.borrow_mut()[usize::from(channel)])
    }

    /// Finish the transmission in flight on a channel
    pub fn complete(&self, channel: Channel) {
        self.finish(&mut self.channels.borrow_mut()[usize::from(channel)]);
    }

    pub fn is_busy(&self, channel: Channel) -> bool {
        self.channels.borrow()[usize::from(channel)].in_flight.is_some()
    }

    /// The frame still being sent, if any
    pub fn in_flight(&self, channel: Channel) -> Option<Frame> {
        self.channels.borrow()[usize::from(channel)]
            .in_flight
            .as_ref()
            .map(|job| job.frame.clone())
    }

    pub fn is_installed(&self, channel: Channel) -> bool {
        self.channels.borrow()[usize::from(channel)].installed
    }

    pub fn config(&self, channel: Channel) -> Option<ChannelConfig> {
        self.channels.borrow()[usize::from(channel)].config
    }

    pub fn context(&self, channel: Channel) -> Option<TimingProfile> {
        self.channels.borrow()[usize::from(channel)].context
    }

    pub fn has_translator(&self, channel: Channel) -> bool {
        self.channels.borrow()[usize::from(channel)].translator.is_some()
    }

    pub fn loop_mode(&self, channel: Channel) -> Option<bool> {
        self.channels.borrow()[usize::from(channel)].loop_mode
    }

    /// Frames whose transmission has finished
    pub fn frames(&self, channel: Channel) -> Vec<Frame> {
        self.channels.borrow()[usize::from(channel)].frames.clone()
    }

    /// The frame in flight, or else the last finished one
    pub fn last_frame(&self, channel: Channel) -> Option<Frame> {
        self.in_flight(channel)
            .or_else(|| self.channels.borrow()[usize::from(channel)].frames.last().cloned())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().iter().copied().collect()
    }

    pub fn count_calls(&self, op: Op) -> usize {
        self.calls.borrow().iter().filter(|call| call.op == op).count()
    }

    fn record(&self, op: Op, channel: Channel) -> Result<(), MockError> {
        let _ = self.calls.borrow_mut().push(Call {
            op,
            channel: channel.index(),
        });
        if self.fail_on.get() == Some(op) {
            return Err(MockError(op));
        }
        Ok(())
    }

    fn refill_state(&self, state: &mut ChannelState) -> bool {
        let ChannelState {
            in_flight,
            translator,
            context,
            ..
        } = state;
        let (Some(job), Some(translator)) = (in_flight.as_mut(), *translator) else {
            return false;
        };
        let mut batch = vec![PulseCode::default(); self.batch_size.get()];
        let progress = translator(context.as_ref(), &job.frame.bytes[job.cursor..], &mut batch);
        job.cursor += progress.consumed;
        job.frame
            .pulses
            .extend_from_slice(&batch[..progress.produced]);
        progress.produced > 0
    }

    fn drain(&self, state: &mut ChannelState) {
        // Hardware would retry a stalled frame later; the mock gives up.
        while self.refill_state(state) {}
    }

    fn finish(&self, state: &mut ChannelState) {
        self.drain(state);
        if let Some(job) = state.in_flight.take() {
            state.frames.push(job.frame);
        }
    }
}

impl PulsePeripheral for MockPeripheral {
    type Error = MockError;

    fn configure(&self, channel: Channel, config: &ChannelConfig) -> Result<(), Self::Error> {
        self.record(Op::Configure, channel)?;
        self.channels.borrow_mut()[usize::from(channel)].config = Some(*config);
        Ok(())
    }

    fn install(&self, channel: Channel) -> Result<(), Self::Error> {
        self.record(Op::Install, channel)?;
        self.channels.borrow_mut()[usize::from(channel)].installed = true;
        Ok(())
    }

    fn uninstall(&self, channel: Channel) -> Result<(), Self::Error> {
        self.record(Op::Uninstall, channel)?;
        let mut channels = self.channels.borrow_mut();
        let state = &mut channels[usize::from(channel)];
        state.installed = false;
        state.translator = None;
        state.context = None;
        state.in_flight = None;
        Ok(())
    }

    fn set_translator(&self, channel: Channel, translator: TranslateFn) -> Result<(), Self::Error> {
        self.record(Op::SetTranslator, channel)?;
        self.channels.borrow_mut()[usize::from(channel)].translator = Some(translator);
        Ok(())
    }

    fn set_translator_context(
        &self,
        channel: Channel,
        timing: TimingProfile,
    ) -> Result<(), Self::Error> {
        self.record(Op::SetContext, channel)?;
        self.channels.borrow_mut()[usize::from(channel)].context = Some(timing);
        Ok(())
    }

    fn set_loop_mode(&self, channel: Channel, enabled: bool) -> Result<(), Self::Error> {
        self.record(Op::SetLoopMode, channel)?;
        self.channels.borrow_mut()[usize::from(channel)].loop_mode = Some(enabled);
        Ok(())
    }

    fn transmit(&self, channel: Channel, data: &[u8], blocking: bool) -> Result<(), Self::Error> {
        self.record(Op::Transmit, channel)?;
        let mut channels = self.channels.borrow_mut();
        let state = &mut channels[usize::from(channel)];
        state.in_flight = Some(InFlight {
            frame: Frame {
                bytes: data.to_vec(),
                pulses: Vec::new(),
                blocking,
            },
            cursor: 0,
        });
        if blocking {
            self.drain(state);
        }
        Ok(())
    }

    fn wait_complete(&self, channel: Channel, timeout: WaitTimeout) -> Result<TxStatus, Self::Error> {
        self.record(Op::Wait, channel)?;
        let mut channels = self.channels.borrow_mut();
        let state = &mut channels[usize::from(channel)];
        match timeout {
            WaitTimeout::Forever => {
                self.finish(state);
                Ok(TxStatus::Done)
            }
            WaitTimeout::Immediate if state.in_flight.is_some() => Ok(TxStatus::Pending),
            WaitTimeout::Immediate => Ok(TxStatus::Done),
        }
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Expected pulses for one byte, MSB first
pub fn expected_pulses(byte: u8, timing: &TimingProfile) -> Vec<PulseCode> {
    (0..8)
        .map(|bit| {
            if byte & (0x80 >> bit) != 0 {
                PulseCode::high_low(timing.high_on, timing.high_off)
            } else {
                PulseCode::high_low(timing.low_on, timing.low_off)
            }
        })
        .collect()
}

/// Expected pulses for a whole frame
pub fn expected_frame(bytes: &[u8], timing: &TimingProfile) -> Vec<PulseCode> {
    bytes
        .iter()
        .flat_map(|&byte| expected_pulses(byte, timing))
        .collect()
}
