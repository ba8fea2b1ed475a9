//! Compile-time configuration of the command pipeline.
//!
//! Firmware has no configuration store: every limit is a constant. The
//! containers sized by these limits take a const generic parameter that
//! defaults to the constant, so an integrator can pick other values without
//! touching the crate.
use heapless::{String, Vec};

/// Capacity of the line buffer, terminator slot included.
///
/// A line carrying `LINE_CAPACITY` content bytes or more overflows.
pub const LINE_CAPACITY: usize = 100;

/// Maximum number of tokens per line, command name included.
///
/// Twelve fits the longest command: `tx <bus> <id> <len>` plus eight data bytes.
pub const MAX_ARGS: usize = 12;

/// Maximum number of bytes in a single token.
pub const MAX_ARG_LEN: usize = 20;

/// Byte closing a command line sent by the host.
pub const LINE_TERMINATOR: u8 = b'\r';

/// Byte separating the tokens of a command line.
pub const ARG_DELIMITER: u8 = b' ';

/// Sequence appended to every line sent back to the host.
pub const RESPONSE_TERMINATOR: &str = "\r\n";

/// Capacity of a response or receive report, terminator included.
// "rx: 2 536870911 8" + 8 * " 255" + "\r\n" = 51 bytes
pub const MAX_RESPONSE_LEN: usize = 64;

/// Bytes carried by one queued serial chunk (one USB full-speed bulk packet).
pub const SERIAL_RX_CHUNK: usize = 64;

/// Maximum payload of a classic CAN frame.
pub const MAX_CAN_DATA: usize = 8;

/// Complete line handed out by the frame assembler, terminator stripped.
pub type Line<const CAP: usize = LINE_CAPACITY> = Vec<u8, CAP>;

/// Single formatted line sent back to the host.
pub type Response = String<MAX_RESPONSE_LEN>;

/// Chunk of raw bytes received from the serial transport.
pub type SerialChunk = Vec<u8, SERIAL_RX_CHUNK>;
