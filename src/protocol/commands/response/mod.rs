//! Lines written back to the host.
//!
//! ```text
//! ok: <echoed-command-name>
//! error: unknown command
//! error: invalid args
//! error: invalid command          (line or argument list overflow)
//! rx: <bus> <id> <len> [byte ...] (frame received from the bus)
//! ```
//!
//! Every line ends with [`RESPONSE_TERMINATOR`].
use core::fmt::{self, Write};

use crate::core::{Response, MAX_ARG_LEN, MAX_RESPONSE_LEN, RESPONSE_TERMINATOR};
use crate::protocol::commands::CommandResult;
use crate::protocol::transport::can_frame::{Bus, CanFrame};

/// Response to a dispatched command. `name` is echoed as the host typed it.
pub fn command_response(name: &[u8], result: CommandResult) -> Response {
    match result {
        // Only registered (ASCII) names reach this branch.
        Ok(()) => render(format_args!(
            "ok: {}",
            core::str::from_utf8(name).unwrap_or("?")
        )),
        Err(error) => render(format_args!("error: {}", error)),
    }
}

/// Response to a line that could not be framed or tokenized.
pub fn invalid_command_response() -> Response {
    render(format_args!("error: invalid command"))
}

/// Report of a frame received on `bus`, numbers in decimal.
pub fn rx_report(bus: Bus, frame: &CanFrame) -> Response {
    render(format_args!(
        "rx: {} {} {}{}",
        bus.number(),
        frame.raw_id(),
        frame.len(),
        Bytes(frame.payload())
    ))
}

/// Space-prefixed decimal bytes.
struct Bytes<'a>(&'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, " {}", byte))
    }
}

// Longest fixed template and longest echoed command name both fit.
const _: () =
    assert!("error: unknown command".len() + RESPONSE_TERMINATOR.len() <= MAX_RESPONSE_LEN);
const _: () = assert!("ok: ".len() + MAX_ARG_LEN + RESPONSE_TERMINATOR.len() <= MAX_RESPONSE_LEN);

/// Format one line. Text that does not fit is cut short; the terminator is
/// always kept.
fn render(args: fmt::Arguments<'_>) -> Response {
    let mut line = Response::new();
    let mut writer = Bounded {
        line: &mut line,
        limit: MAX_RESPONSE_LEN - RESPONSE_TERMINATOR.len(),
        truncated: false,
    };
    if writer.write_fmt(args).is_err() || writer.truncated {
        #[cfg(feature = "defmt")]
        defmt::warn!("Response truncated to {} bytes", MAX_RESPONSE_LEN);
    }
    // Room for the terminator is reserved by `limit`.
    let terminated = line.push_str(RESPONSE_TERMINATOR);
    debug_assert!(terminated.is_ok());
    line
}

/// Fills a response up to `limit` bytes and drops the rest.
struct Bounded<'a> {
    line: &'a mut Response,
    limit: usize,
    truncated: bool,
}

impl Write for Bounded<'_> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        let mut end = text.len().min(self.limit - self.line.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.truncated |= end < text.len();
        self.line.push_str(&text[..end]).map_err(|_| fmt::Error)
    }
}
