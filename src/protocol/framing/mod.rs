//! Line framing: accumulates the raw byte stream coming from the serial
//! transport and cuts it into terminator-delimited command lines.
use heapless::Vec;

use crate::core::{Line, LINE_CAPACITY, LINE_TERMINATOR};
use crate::error::LineOverflow;

//==================================================================================Enums and Structs
/// Possible states of the in-flight line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AssemblerState {
    /// Bytes are appended to the buffer.
    Collecting,
    /// The current line overflowed; bytes are dropped up to its terminator.
    Discarding,
}

/// Owns the partial-line buffer, the only state kept between two chunks.
///
/// `CAP` counts the terminator slot: a line is delivered only when it holds
/// fewer than `CAP` bytes.
#[derive(Debug, Clone)]
pub struct LineAssembler<const CAP: usize = LINE_CAPACITY> {
    buffer: Vec<u8, CAP>,
    terminator: u8,
    state: AssemblerState,
}

impl<const CAP: usize> Default for LineAssembler<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> LineAssembler<CAP> {
    /// Empty assembler splitting on [`LINE_TERMINATOR`].
    pub const fn new() -> Self {
        Self::with_terminator(LINE_TERMINATOR)
    }

    /// Empty assembler splitting on a custom terminator byte.
    pub const fn with_terminator(terminator: u8) -> Self {
        Self {
            buffer: Vec::new(),
            terminator,
            state: AssemblerState::Collecting,
        }
    }

    /// Bytes of the line received so far.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Drop the in-flight line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = AssemblerState::Collecting;
    }

    //==================================================================================Process Functions
    /// Process one byte.
    ///
    /// Returns `Some(Ok(line))` when the byte completes a line (possibly
    /// empty), `Some(Err(LineOverflow))` when the line no longer fits, and
    /// `None` otherwise. After an overflow every byte up to and including
    /// the next terminator is dropped, so the tail of an oversized line is
    /// never mistaken for a command.
    pub fn push_byte(&mut self, byte: u8) -> Option<Result<Line<CAP>, LineOverflow>> {
        if byte == self.terminator {
            return match self.state {
                AssemblerState::Discarding => {
                    self.state = AssemblerState::Collecting;
                    None
                }
                // Hand the line out and leave an empty buffer behind.
                AssemblerState::Collecting => Some(Ok(core::mem::take(&mut self.buffer))),
            };
        }

        if self.state == AssemblerState::Discarding {
            return None;
        }

        if self.buffer.len() + 1 >= CAP || self.buffer.push(byte).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Line overflow after {} bytes, discarding", self.buffer.len());
            self.buffer.clear();
            self.state = AssemblerState::Discarding;
            return Some(Err(LineOverflow));
        }

        None
    }

    /// Lazily cut `bytes` into lines.
    ///
    /// The iterator must be drained for every byte to be consumed; a line
    /// left unterminated at the end of the chunk carries over to the next
    /// call.
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> Lines<'a, CAP> {
        Lines {
            assembler: self,
            input: bytes.iter(),
        }
    }
}

/// Iterator returned by [`LineAssembler::feed`].
pub struct Lines<'a, const CAP: usize> {
    assembler: &'a mut LineAssembler<CAP>,
    input: core::slice::Iter<'a, u8>,
}

impl<const CAP: usize> Iterator for Lines<'_, CAP> {
    type Item = Result<Line<CAP>, LineOverflow>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.input.by_ref() {
            if let Some(event) = self.assembler.push_byte(byte) {
                return Some(event);
            }
        }
        None
    }
}
