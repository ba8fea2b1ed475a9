//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (line framing, tokenizing,
//! command validation, number parsing, frame construction, etc.).
use crate::protocol::transport::can_frame::Bus;
use thiserror_no_std::Error;

//==================================================================================FRAMING_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// The line buffer filled up before a terminator arrived.
/// The partial line is discarded; the assembler keeps accepting input.
#[error("Line exceeds the buffer capacity")]
pub struct LineOverflow;

//==================================================================================TOKENIZE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while splitting a line into arguments.
pub enum TokenizeError {
    /// The line holds more tokens than the argument list can store.
    #[error("Too many arguments")]
    TooManyArguments,
    /// A single token is longer than the maximum argument length.
    #[error("Argument too long")]
    ArgumentTooLong,
}

//==================================================================================COMMAND_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failure reported by the dispatcher or a command handler.
///
/// The `Display` text is the exact wording sent to the host after `error: `.
pub enum CommandError {
    /// No handler is registered under the command name.
    #[error("unknown command")]
    UnknownCommand,
    /// A handler rejected its arguments or the controller refused the request.
    #[error("invalid args")]
    InvalidArgument,
}

//==================================================================================NUMBER_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while reading an unsigned integer out of a token.
pub enum NumberError {
    /// Token (or the digits after a radix prefix) is empty.
    #[error("Empty number")]
    Empty,
    /// Token contains a character that is not a digit of the detected radix.
    #[error("Invalid digit")]
    InvalidDigit,
    /// Value does not fit in 32 bits.
    #[error("Number too large")]
    Overflow,
}

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building a CAN frame out of user input.
pub enum FrameBuildError {
    /// Classic CAN carries at most eight data bytes.
    #[error("Data length {len} exceeds 8 bytes")]
    DataTooLong { len: usize },
    /// Identifier does not fit in 29 bits.
    #[error("Identifier {id:#x} exceeds 29 bits")]
    IdOutOfRange { id: u32 },
}

//==================================================================================CAN_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reference error for [`CanController`](crate::protocol::transport::traits::can_controller::CanController)
/// adapters.
pub enum CanError {
    /// The bus selector is known but no controller is wired to it.
    #[error("Bus {0:?} is not implemented")]
    UnsupportedBus(Bus),
}

//==================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised when handing an event to the bridge queue.
pub enum QueueError {
    /// The queue is full; the event was dropped.
    #[error("Event queue is full")]
    Full,
    /// The bridge was built without a frame queue.
    #[error("Frame reception queue not configured")]
    Disabled,
}
