//! The bridge: one owned state object running the whole command pipeline.
//!
//! ```text
//! serial bytes → LineAssembler → tokenize → Dispatcher → CanController
//!                                               ↓
//!                        SerialPort ← one response line per command
//!
//! received frame → rx report → SerialPort
//! ```
//!
//! [`Bridge`] is synchronous and must not be re-entered: each call runs to
//! completion before the next one starts. [`service`] provides the
//! single-consumer event queue that serializes calls coming from interrupt
//! handlers.
pub mod service;

use crate::core::{LINE_CAPACITY, MAX_ARGS, MAX_ARG_LEN};
use crate::error::LineOverflow;
use crate::protocol::commands::{dispatcher::Dispatcher, response};
use crate::protocol::framing::LineAssembler;
use crate::protocol::tokenizer::tokenize;
use crate::protocol::transport::{
    can_frame::{Bus, CanFrame},
    traits::{
        can_controller::CanController, serial_port::SerialPort, system_control::SystemControl,
    },
};

/// Frame assembler, dispatcher, and serial port of one bridge instance.
///
/// `CAP` is the line buffer capacity, `N` and `L` the argument limits.
pub struct Bridge<
    C: CanController,
    S: SerialPort,
    R: SystemControl,
    const CAP: usize = LINE_CAPACITY,
    const N: usize = MAX_ARGS,
    const L: usize = MAX_ARG_LEN,
> {
    assembler: LineAssembler<CAP>,
    dispatcher: Dispatcher<C, R>,
    serial: S,
}

impl<C, S, R, const CAP: usize, const N: usize, const L: usize> Bridge<C, S, R, CAP, N, L>
where
    C: CanController,
    S: SerialPort,
    R: SystemControl,
{
    pub fn new(controller: C, serial: S, system: R) -> Self {
        Self {
            assembler: LineAssembler::new(),
            dispatcher: Dispatcher::new(controller, system),
            serial,
        }
    }

    /// Process a chunk of bytes received from the host.
    ///
    /// Every complete line is dispatched and answered, in order. A failing
    /// serial write does not stop the remaining lines from being executed;
    /// the first write error is returned once the chunk is consumed.
    pub fn on_serial_rx(&mut self, bytes: &[u8]) -> Result<(), S::Error> {
        let Self {
            assembler,
            dispatcher,
            serial,
        } = self;

        let mut outcome = Ok(());
        for event in assembler.feed(bytes) {
            let reply = match event {
                Ok(line) => match tokenize::<N, L>(&line) {
                    Ok(args) => dispatcher.dispatch(&args),
                    Err(_err) => {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("Tokenizer rejected line: {}", _err);
                        response::invalid_command_response()
                    }
                },
                Err(LineOverflow) => response::invalid_command_response(),
            };

            let written = serial.write(reply.as_bytes());
            if outcome.is_ok() {
                outcome = written;
            }
        }
        outcome
    }

    /// Report a frame received on `bus` to the host.
    pub fn on_can_rx(&mut self, bus: Bus, frame: &CanFrame) -> Result<(), S::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Frame received on {}: {}", bus, frame);
        self.serial
            .write(response::rx_report(bus, frame).as_bytes())
    }

    /// Bytes of the line received so far.
    pub fn pending_line(&self) -> &[u8] {
        self.assembler.pending()
    }

    /// Drop the line received so far, for when the rest of it was lost
    /// before reaching the bridge.
    pub fn discard_pending_line(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Discarding {} pending bytes", self.assembler.pending().len());
        self.assembler.reset();
    }

    pub fn dispatcher(&self) -> &Dispatcher<C, R> {
        &self.dispatcher
    }

    pub fn controller(&self) -> &C {
        self.dispatcher.controller()
    }

    /// Direct access to the controller for settings the host cannot change,
    /// such as acceptance filters.
    pub fn controller_mut(&mut self) -> &mut C {
        self.dispatcher.controller_mut()
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }
}
