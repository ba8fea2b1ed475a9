//! Command dispatcher: resolves the command name, runs its handler, and
//! formats the single response line.
use crate::core::Response;
use crate::error::CommandError;
use crate::protocol::commands::{handlers, response, Command, CommandResult};
use crate::protocol::tokenizer::ArgumentList;
use crate::protocol::transport::traits::{
    can_controller::CanController, system_control::SystemControl,
};

/// Owns the collaborators the handlers act on.
///
/// Dispatch is synchronous: the handler and its controller calls complete
/// before the response is returned. No state survives between two commands.
pub struct Dispatcher<C: CanController, R: SystemControl> {
    controller: C,
    system: R,
}

impl<C: CanController, R: SystemControl> Dispatcher<C, R> {
    pub fn new(controller: C, system: R) -> Self {
        Self { controller, system }
    }

    /// Run the command named by `args[0]` and report its outcome.
    ///
    /// The handler receives the whole list, command name at index 0.
    pub fn execute<const N: usize, const L: usize>(
        &mut self,
        args: &ArgumentList<N, L>,
    ) -> CommandResult {
        let command = Command::lookup(args.command()).ok_or(CommandError::UnknownCommand)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Dispatching {} ({} params)", command, args.param_count());

        let result = match command {
            Command::Reset => handlers::reset(&mut self.system, args),
            Command::Bus => handlers::bus(&mut self.controller, args),
            Command::Tx => handlers::tx(&mut self.controller, args),
        };

        #[cfg(feature = "defmt")]
        if let Err(err) = result {
            defmt::debug!("{} rejected: {}", command, err);
        }

        result
    }

    /// Run the command and format the line to send back to the host.
    pub fn dispatch<const N: usize, const L: usize>(
        &mut self,
        args: &ArgumentList<N, L>,
    ) -> Response {
        let result = self.execute(args);
        response::command_response(args.command(), result)
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn system(&self) -> &R {
        &self.system
    }

    /// Give the collaborators back.
    pub fn into_parts(self) -> (C, R) {
        (self.controller, self.system)
    }
}
