//! Command handlers: validate the tokens of one command and translate them
//! into calls on the collaborators.
//!
//! Each handler first parses its arguments into a typed request, then
//! applies it. Parsing never touches the hardware, so a rejected command has
//! no side effect. Any controller failure (an unimplemented bus included) is
//! reported as [`CommandError::InvalidArgument`].
use core::num::NonZeroU32;

use crate::core::MAX_CAN_DATA;
use crate::error::CommandError;
use crate::infra::codec::number::{parse_u32, parse_u8_truncating};
use crate::protocol::commands::CommandResult;
use crate::protocol::tokenizer::ArgumentList;
use crate::protocol::transport::{
    can_frame::{Bus, CanFrame},
    traits::{can_controller::CanController, system_control::SystemControl},
};

//==================================================================================REQUESTS
/// Action requested by a `bus` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusAction {
    /// Program the bit-rate (bits per second).
    Rate(NonZeroU32),
    /// Join the bus.
    Up,
    /// Leave the bus.
    Down,
}

/// Validated `bus` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusRequest {
    pub bus: Bus,
    pub action: BusAction,
}

/// Validated `tx` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxRequest {
    pub bus: Bus,
    pub frame: CanFrame,
}

//==================================================================================RESET
/// `reset`: request a device reset.
///
/// Always succeeds. On real hardware the reset does not return, so the
/// `ok: reset` line is never observed by the host.
pub fn reset<R: SystemControl, const N: usize, const L: usize>(
    system: &mut R,
    _args: &ArgumentList<N, L>,
) -> CommandResult {
    #[cfg(feature = "defmt")]
    defmt::info!("Reset requested by host");
    system.reset();
    Ok(())
}

//==================================================================================BUS
/// `bus <bus> <rate <uint> | up | down>`
pub fn bus<C: CanController, const N: usize, const L: usize>(
    controller: &mut C,
    args: &ArgumentList<N, L>,
) -> CommandResult {
    let BusRequest { bus, action } = parse_bus_request(args)?;
    let outcome = match action {
        BusAction::Rate(bitrate) => controller.set_rate(bus, bitrate),
        BusAction::Up => controller.enable(bus),
        BusAction::Down => controller.disable(bus),
    };
    outcome.map_err(controller_failure)
}

/// Validate the arguments of a `bus` command.
pub fn parse_bus_request<const N: usize, const L: usize>(
    args: &ArgumentList<N, L>,
) -> Result<BusRequest, CommandError> {
    // Need at least the bus and the action.
    if args.param_count() < 2 {
        return Err(CommandError::InvalidArgument);
    }
    let bus = parse_bus(arg(args, 1)?)?;
    let keyword = arg(args, 2)?;

    let action = if keyword.eq_ignore_ascii_case(b"rate") {
        let bitrate = number(arg(args, 3)?)?;
        // Zero is not a bit-rate.
        BusAction::Rate(NonZeroU32::new(bitrate).ok_or(CommandError::InvalidArgument)?)
    } else if keyword.eq_ignore_ascii_case(b"up") {
        BusAction::Up
    } else if keyword.eq_ignore_ascii_case(b"down") {
        BusAction::Down
    } else {
        return Err(CommandError::InvalidArgument);
    };

    Ok(BusRequest { bus, action })
}

//==================================================================================TX
/// `tx <bus> <id> <len> [byte ...]`
pub fn tx<C: CanController, const N: usize, const L: usize>(
    controller: &mut C,
    args: &ArgumentList<N, L>,
) -> CommandResult {
    let TxRequest { bus, frame } = parse_tx_request(args)?;
    controller.send(bus, &frame).map_err(controller_failure)
}

/// Validate the arguments of a `tx` command.
///
/// Exactly `len` byte arguments are read; missing ones are an error, extra
/// ones are ignored. Each byte keeps the low eight bits of its value.
pub fn parse_tx_request<const N: usize, const L: usize>(
    args: &ArgumentList<N, L>,
) -> Result<TxRequest, CommandError> {
    // Need at least the bus, the identifier, and the length.
    if args.param_count() < 3 {
        return Err(CommandError::InvalidArgument);
    }
    let bus = parse_bus(arg(args, 1)?)?;
    let id = number(arg(args, 2)?)?;
    let len = number(arg(args, 3)?)? as usize;

    if len > MAX_CAN_DATA {
        return Err(CommandError::InvalidArgument);
    }

    let mut data = [0u8; MAX_CAN_DATA];
    for (index, byte) in data[..len].iter_mut().enumerate() {
        *byte = parse_u8_truncating(arg(args, 4 + index)?)
            .map_err(|_| CommandError::InvalidArgument)?;
    }

    let frame = CanFrame::new(id, &data[..len]).map_err(|_err| {
        #[cfg(feature = "defmt")]
        defmt::debug!("Rejected tx frame: {}", _err);
        CommandError::InvalidArgument
    })?;

    Ok(TxRequest { bus, frame })
}

//==================================================================================HELPERS
/// Token at `index`, or `InvalidArgument` when the host did not supply it.
fn arg<const N: usize, const L: usize>(
    args: &ArgumentList<N, L>,
    index: usize,
) -> Result<&[u8], CommandError> {
    args.get(index).ok_or(CommandError::InvalidArgument)
}

fn parse_bus(token: &[u8]) -> Result<Bus, CommandError> {
    Bus::from_token(token).ok_or(CommandError::InvalidArgument)
}

fn number(token: &[u8]) -> Result<u32, CommandError> {
    parse_u32(token).map_err(|_err| {
        #[cfg(feature = "defmt")]
        defmt::debug!("Invalid number {=[u8]:a}: {}", token, _err);
        CommandError::InvalidArgument
    })
}

fn controller_failure<E: core::fmt::Debug>(_err: E) -> CommandError {
    #[cfg(feature = "defmt")]
    defmt::warn!("CAN controller refused the request: {}", defmt::Debug2Format(&_err));
    CommandError::InvalidArgument
}
