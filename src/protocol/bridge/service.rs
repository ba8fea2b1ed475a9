//! Event queue in front of a [`Bridge`].
//!
//! Serial bytes and received CAN frames usually arrive in interrupt
//! context. Handlers enqueue them through a [`BridgeHandle`]; a single
//! [`BridgeRunner`] task drains the queues and feeds the bridge one event
//! at a time, so commands never overlap.
//!
//! Firmware provides pre-allocated [`embassy_sync::channel::Channel`]
//! instances. The frame channel is optional: without it the bridge only
//! answers commands.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use futures_util::{future::select, future::Either, pin_mut};

use super::Bridge;
use crate::core::{SerialChunk, LINE_CAPACITY, MAX_ARGS, MAX_ARG_LEN, SERIAL_RX_CHUNK};
use crate::error::QueueError;
use crate::protocol::transport::{
    can_frame::{Bus, CanFrame},
    traits::{
        can_controller::CanController, serial_port::SerialPort, system_control::SystemControl,
    },
};

/// Queue slot for a frame taken off the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedFrame {
    pub bus: Bus,
    pub frame: CanFrame,
}

/// Queue slot for received serial bytes.
///
/// Input longer than [`SERIAL_RX_CHUNK`] spans several slots. The flags let
/// the runner notice when the tail of an input was dropped on a full queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSlot {
    pub bytes: SerialChunk,
    /// First slot of one enqueued input.
    pub starts: bool,
    /// More slots of the same input follow.
    pub continues: bool,
}

pub type SerialChannel<const CAP: usize> = Channel<CriticalSectionRawMutex, SerialSlot, CAP>;
pub type FrameChannel<const CAP: usize> = Channel<CriticalSectionRawMutex, ReceivedFrame, CAP>;

enum BridgeEvent {
    Serial(SerialSlot),
    Frame(ReceivedFrame),
}

//==================================================================================SERVICE
/// Service assembling the bridge and its queues.
///
/// `CAP`, `N`, and `L` are the limits of the wrapped [`Bridge`].
pub struct BridgeService<
    'a,
    C,
    S,
    R,
    const SERIAL_CAP: usize,
    const FRAME_CAP: usize,
    const CAP: usize = LINE_CAPACITY,
    const N: usize = MAX_ARGS,
    const L: usize = MAX_ARG_LEN,
> where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    bridge: Bridge<C, S, R, CAP, N, L>,
    serial_channel: &'a SerialChannel<SERIAL_CAP>,
    frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
}

impl<
        'a,
        C,
        S,
        R,
        const SERIAL_CAP: usize,
        const FRAME_CAP: usize,
        const CAP: usize,
        const N: usize,
        const L: usize,
    > BridgeService<'a, C, S, R, SERIAL_CAP, FRAME_CAP, CAP, N, L>
where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    pub fn new(
        bridge: Bridge<C, S, R, CAP, N, L>,
        serial_channel: &'a SerialChannel<SERIAL_CAP>,
        frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
    ) -> Self {
        Self {
            bridge,
            serial_channel,
            frame_channel,
        }
    }

    /// Split into the producer handle and the consumer task.
    pub fn into_parts(self) -> BridgeServiceParts<'a, C, S, R, SERIAL_CAP, FRAME_CAP, CAP, N, L> {
        BridgeServiceParts {
            handle: BridgeHandle {
                serial: self.serial_channel.sender(),
                frames: self.frame_channel.map(|channel| channel.sender()),
            },
            runner: BridgeRunner {
                bridge: self.bridge,
                serial: self.serial_channel.receiver(),
                frames: self.frame_channel.map(|channel| channel.receiver()),
                awaiting_rest: false,
                serial_first: true,
            },
        }
    }
}

/// Bundle returned by [`BridgeService::into_parts`].
pub struct BridgeServiceParts<
    'a,
    C,
    S,
    R,
    const SERIAL_CAP: usize,
    const FRAME_CAP: usize,
    const CAP: usize = LINE_CAPACITY,
    const N: usize = MAX_ARGS,
    const L: usize = MAX_ARG_LEN,
> where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    pub handle: BridgeHandle<'a, SERIAL_CAP, FRAME_CAP>,
    pub runner: BridgeRunner<'a, C, S, R, SERIAL_CAP, FRAME_CAP, CAP, N, L>,
}

//==================================================================================HANDLE
/// Producer side, safe to copy into interrupt handlers.
#[derive(Clone, Copy)]
pub struct BridgeHandle<'a, const SERIAL_CAP: usize, const FRAME_CAP: usize> {
    serial: Sender<'a, CriticalSectionRawMutex, SerialSlot, SERIAL_CAP>,
    frames: Option<Sender<'a, CriticalSectionRawMutex, ReceivedFrame, FRAME_CAP>>,
}

impl<'a, const SERIAL_CAP: usize, const FRAME_CAP: usize> BridgeHandle<'a, SERIAL_CAP, FRAME_CAP> {
    /// Queue received serial bytes without waiting.
    ///
    /// Input longer than [`SERIAL_RX_CHUNK`] takes several slots. When the
    /// queue fills up midway the remaining bytes are dropped, and the runner
    /// discards the unfinished line before the next input.
    pub fn try_serial_rx(&self, bytes: &[u8]) -> Result<(), QueueError> {
        for slot in split(bytes) {
            self.serial.try_send(slot).map_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::warn!("Serial queue full, dropping input");
                QueueError::Full
            })?;
        }
        Ok(())
    }

    /// Queue received serial bytes, waiting for free slots.
    pub async fn serial_rx(&self, bytes: &[u8]) {
        for slot in split(bytes) {
            self.serial.send(slot).await;
        }
    }

    /// Queue a frame received on `bus` without waiting.
    pub fn try_can_rx(&self, bus: Bus, frame: CanFrame) -> Result<(), QueueError> {
        let frames = self.frames.as_ref().ok_or(QueueError::Disabled)?;
        frames
            .try_send(ReceivedFrame { bus, frame })
            .map_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::warn!("Frame queue full, dropping frame from {}", bus);
                QueueError::Full
            })
    }

    /// Queue a frame received on `bus`, waiting for a free slot.
    pub async fn can_rx(&self, bus: Bus, frame: CanFrame) -> Result<(), QueueError> {
        let frames = self.frames.as_ref().ok_or(QueueError::Disabled)?;
        frames.send(ReceivedFrame { bus, frame }).await;
        Ok(())
    }
}

fn split(bytes: &[u8]) -> impl Iterator<Item = SerialSlot> + '_ {
    let count = bytes.len().div_ceil(SERIAL_RX_CHUNK);
    bytes
        .chunks(SERIAL_RX_CHUNK)
        .enumerate()
        .filter_map(move |(index, piece)| {
            Some(SerialSlot {
                bytes: SerialChunk::from_slice(piece).ok()?,
                starts: index == 0,
                continues: index + 1 < count,
            })
        })
}

//==================================================================================RUNNER
/// Consumer task owning the bridge.
pub struct BridgeRunner<
    'a,
    C,
    S,
    R,
    const SERIAL_CAP: usize,
    const FRAME_CAP: usize,
    const CAP: usize = LINE_CAPACITY,
    const N: usize = MAX_ARGS,
    const L: usize = MAX_ARG_LEN,
> where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    bridge: Bridge<C, S, R, CAP, N, L>,
    serial: Receiver<'a, CriticalSectionRawMutex, SerialSlot, SERIAL_CAP>,
    frames: Option<Receiver<'a, CriticalSectionRawMutex, ReceivedFrame, FRAME_CAP>>,
    /// The last serial slot announced a continuation.
    awaiting_rest: bool,
    /// Which queue is polled first on the next wait.
    serial_first: bool,
}

impl<
        'a,
        C,
        S,
        R,
        const SERIAL_CAP: usize,
        const FRAME_CAP: usize,
        const CAP: usize,
        const N: usize,
        const L: usize,
    > BridgeRunner<'a, C, S, R, SERIAL_CAP, FRAME_CAP, CAP, N, L>
where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    /// Process events forever.
    pub async fn drive(mut self) {
        loop {
            self.step().await;
        }
    }

    /// Wait for the next event and run it to completion.
    pub async fn step(&mut self) {
        let written = match self.next_event().await {
            BridgeEvent::Serial(slot) => {
                // A new input while the previous one is unfinished: its tail
                // was dropped, so the partial line must not prefix this one.
                if self.awaiting_rest && slot.starts {
                    self.bridge.discard_pending_line();
                }
                self.awaiting_rest = slot.continues;
                self.bridge.on_serial_rx(&slot.bytes)
            }
            BridgeEvent::Frame(ReceivedFrame { bus, frame }) => self.bridge.on_can_rx(bus, &frame),
        };

        // The host is gone or the endpoint is stalled; keep serving the bus.
        if let Err(_err) = written {
            #[cfg(feature = "defmt")]
            defmt::warn!("Serial write failed: {}", defmt::Debug2Format(&_err));
        }
    }

    /// Next queued event. When both queues hold events, the queue served
    /// first alternates so neither direction starves the other.
    async fn next_event(&mut self) -> BridgeEvent {
        let serial_first = self.serial_first;
        self.serial_first = !serial_first;

        match &self.frames {
            Some(frames) => {
                let serial_future = self.serial.receive();
                let frame_future = frames.receive();
                pin_mut!(serial_future);
                pin_mut!(frame_future);

                if serial_first {
                    match select(serial_future, frame_future).await {
                        Either::Left((slot, _)) => BridgeEvent::Serial(slot),
                        Either::Right((frame, _)) => BridgeEvent::Frame(frame),
                    }
                } else {
                    match select(frame_future, serial_future).await {
                        Either::Left((frame, _)) => BridgeEvent::Frame(frame),
                        Either::Right((slot, _)) => BridgeEvent::Serial(slot),
                    }
                }
            }
            None => BridgeEvent::Serial(self.serial.receive().await),
        }
    }

    pub fn bridge(&self) -> &Bridge<C, S, R, CAP, N, L> {
        &self.bridge
    }

    pub fn into_bridge(self) -> Bridge<C, S, R, CAP, N, L> {
        self.bridge
    }
}
