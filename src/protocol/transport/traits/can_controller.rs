//! Capability interface of the CAN controller driven by the command handlers.
//! Lets the protocol plug into any HAL (bxCAN, TWAI, Tiva CAN, a test double…).
use core::num::NonZeroU32;

use crate::protocol::transport::can_frame::{Bus, CanFrame};

/// Contract to configure a CAN controller and transmit frames.
///
/// Calls are synchronous and must not block: they program registers or
/// queue into a mailbox and return. Implementations must fail explicitly on
/// a bus they do not drive instead of falling back to another one.
pub trait CanController {
    type Error: core::fmt::Debug;
    /// Join the bus and start receiving.
    fn enable(&mut self, bus: Bus) -> Result<(), Self::Error>;
    /// Leave the bus.
    fn disable(&mut self, bus: Bus) -> Result<(), Self::Error>;
    /// Program the nominal bit-rate in bits per second.
    fn set_rate(&mut self, bus: Bus, bitrate: NonZeroU32) -> Result<(), Self::Error>;
    /// Accept only frames whose identifier matches `id` on the bits set in `mask`.
    fn set_filter(&mut self, bus: Bus, id: u32, mask: u32) -> Result<(), Self::Error>;
    /// Queue a frame for transmission.
    fn send(&mut self, bus: Bus, frame: &CanFrame) -> Result<(), Self::Error>;
}
