//! Command layer: the registered command table, the handlers translating
//! arguments into controller calls, the dispatcher, and the response lines
//! sent back to the host.
//!
//! ```text
//! reset
//! bus <1|2> rate <uint>
//! bus <1|2> up
//! bus <1|2> down
//! tx <1|2> <id:uint> <len:uint> [byte0 byte1 ... byte7]
//! ```
//!
//! Command names and keywords match case-insensitively.
pub mod dispatcher;
pub mod handlers;
pub mod response;

/// Result reported by a handler to the dispatcher. Side effects are already
/// performed when it is returned.
pub type CommandResult = Result<(), crate::error::CommandError>;

/// Commands known to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Reset the device.
    Reset,
    /// Configure or switch a bus.
    Bus,
    /// Transmit a frame.
    Tx,
}

impl Command {
    /// Fixed registration table: name → command.
    pub const TABLE: [(&'static str, Command); 3] = [
        ("reset", Command::Reset),
        ("bus", Command::Bus),
        ("tx", Command::Tx),
    ];

    /// Find the command registered under `name` (case-insensitive).
    pub fn lookup(name: &[u8]) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(registered, _)| registered.as_bytes().eq_ignore_ascii_case(name))
            .map(|&(_, command)| command)
    }

    /// Canonical (lower-case) name.
    pub fn name(self) -> &'static str {
        match self {
            Command::Reset => "reset",
            Command::Bus => "bus",
            Command::Tx => "tx",
        }
    }
}
