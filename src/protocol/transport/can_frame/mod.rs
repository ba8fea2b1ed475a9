//! In-memory representation of a classic CAN frame and of the bus it
//! travels on.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::core::MAX_CAN_DATA;
use crate::error::FrameBuildError;

/// Largest identifier representable on the wire (29-bit extended format).
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;
/// Largest identifier sent in the 11-bit standard format.
pub const MAX_STANDARD_ID: u32 = 0x7FF;

//==================================================================================BUS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Logical CAN channel selected by the host.
///
/// Both selectors are accepted by the parser; whether a controller is wired
/// behind a selector is up to the [`CanController`](super::traits::can_controller::CanController)
/// implementation, which must reject the ones it cannot serve.
pub enum Bus {
    One = 1,
    Two = 2,
}

impl Bus {
    /// Every selector together with its command-line spelling.
    pub const ALL: [(&'static str, Bus); 2] = [("1", Bus::One), ("2", Bus::Two)];

    /// Resolve a selector token (exact, case-insensitive match).
    pub fn from_token(token: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(name, _)| name.as_bytes().eq_ignore_ascii_case(token))
            .map(|&(_, bus)| bus)
    }

    /// Number used in host-facing reports.
    pub fn number(self) -> u8 {
        self as u8
    }
}

//==================================================================================CAN_FRAME
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Classic CAN data frame.
///
/// Only built through [`CanFrame::new`], which guarantees `len <= 8` and a
/// 29-bit identifier. Identifiers up to `0x7FF` use the standard format,
/// larger ones the extended format.
pub struct CanFrame {
    id: u32,
    len: u8,
    data: [u8; MAX_CAN_DATA],
}

impl CanFrame {
    /// Build a frame from a raw identifier and its payload.
    ///
    /// Oversized payloads are rejected, never truncated.
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, FrameBuildError> {
        if id > MAX_EXTENDED_ID {
            return Err(FrameBuildError::IdOutOfRange { id });
        }
        if payload.len() > MAX_CAN_DATA {
            return Err(FrameBuildError::DataTooLong { len: payload.len() });
        }

        let mut data = [0u8; MAX_CAN_DATA];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            len: payload.len() as u8,
            data,
        })
    }

    /// Raw identifier.
    pub fn raw_id(&self) -> u32 {
        self.id
    }

    /// Data length code (0 to 8).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the frame carries no data.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Populated payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

// Lets HAL adapters convert to and from their own frame types.
impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let raw = match id.into() {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        };
        CanFrame::new(raw, data).ok()
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        // Remote frames cannot be requested through the command set.
        None
    }

    fn is_extended(&self) -> bool {
        self.id > MAX_STANDARD_ID
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        if let Some(id) = u16::try_from(self.id).ok().and_then(StandardId::new) {
            return Id::Standard(id);
        }
        Id::Extended(ExtendedId::new(self.id).unwrap_or(ExtendedId::MAX))
    }

    fn dlc(&self) -> usize {
        self.len as usize
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
