//! Dispatcher behavior seen from outside the crate: routing, validation, and
//! the calls reaching the CAN controller.
mod helpers {
    include!("../../helpers/mod.rs");
}

use can_usb_bridge::{
    error::CommandError,
    protocol::{
        commands::dispatcher::Dispatcher,
        tokenizer::{tokenize, ArgumentList},
        transport::can_frame::{Bus, CanFrame},
    },
};
use helpers::{ControllerCall, MockController, MockSystem};

fn dispatcher() -> (Dispatcher<MockController, MockSystem>, MockController, MockSystem) {
    let controller = MockController::default();
    let system = MockSystem::default();
    (
        Dispatcher::new(controller.clone(), system.clone()),
        controller,
        system,
    )
}

fn args(tokens: &[&str]) -> ArgumentList {
    ArgumentList::from_tokens(tokens).expect("tokens fit the default limits")
}

#[test]
fn test_tx_sends_exactly_one_frame() {
    let (mut dispatcher, controller, _) = dispatcher();

    let result = dispatcher.execute(&args(&["tx", "1", "256", "3", "1", "2", "3"]));

    assert_eq!(result, Ok(()));
    assert_eq!(
        controller.sent(),
        vec![(Bus::One, CanFrame::new(256, &[1, 2, 3]).unwrap())]
    );
    let (bus, frame) = controller.sent()[0];
    assert_eq!(bus, Bus::One);
    assert_eq!(frame.raw_id(), 256);
    assert_eq!(frame.len(), 3);
    assert_eq!(frame.payload(), &[1, 2, 3]);
}

#[test]
fn test_tx_accepts_hex_and_truncates_bytes() {
    let (mut dispatcher, controller, _) = dispatcher();

    let result = dispatcher.execute(&args(&["tx", "1", "0x18FF0001", "2", "0x1FF", "010"]));

    assert_eq!(result, Ok(()));
    let (_, frame) = controller.sent()[0];
    assert_eq!(frame.raw_id(), 0x18FF_0001);
    assert_eq!(frame.payload(), &[0xFF, 8]);
}

#[test]
fn test_tx_missing_bytes_is_rejected() {
    // The declared length asks for more bytes than were supplied.
    let (mut dispatcher, controller, _) = dispatcher();

    let result = dispatcher.execute(&args(&["tx", "1", "256", "3", "1", "2"]));

    assert_eq!(result, Err(CommandError::InvalidArgument));
    assert!(controller.calls().is_empty());
}

#[test]
fn test_tx_bounds() {
    let (mut dispatcher, controller, _) = dispatcher();

    // Nine data bytes.
    assert_eq!(
        dispatcher.execute(&args(&["tx", "1", "1", "9", "0", "0", "0", "0", "0", "0", "0", "0"])),
        Err(CommandError::InvalidArgument)
    );
    // Identifier wider than 29 bits.
    assert_eq!(
        dispatcher.execute(&args(&["tx", "1", "0x20000000", "0"])),
        Err(CommandError::InvalidArgument)
    );
    // Missing length.
    assert_eq!(
        dispatcher.execute(&args(&["tx", "1", "256"])),
        Err(CommandError::InvalidArgument)
    );
    assert!(controller.calls().is_empty());

    // Surplus byte arguments are ignored.
    assert_eq!(
        dispatcher.execute(&args(&["tx", "1", "7", "1", "42", "43"])),
        Ok(())
    );
    assert_eq!(controller.sent()[0].1.payload(), &[42]);
}

#[test]
fn test_bus_selector_validation() {
    let (mut dispatcher, controller, _) = dispatcher();

    assert_eq!(
        dispatcher.execute(&args(&["bus", "9", "up"])),
        Err(CommandError::InvalidArgument)
    );
    // Bus 2 parses but has no controller behind it.
    assert_eq!(
        dispatcher.execute(&args(&["bus", "2", "up"])),
        Err(CommandError::InvalidArgument)
    );
    assert!(controller.calls().is_empty());
}

#[test]
fn test_bus_rate() {
    let (mut dispatcher, controller, _) = dispatcher();

    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "rate", "0"])),
        Err(CommandError::InvalidArgument)
    );
    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "rate"])),
        Err(CommandError::InvalidArgument)
    );
    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "rate", "fast"])),
        Err(CommandError::InvalidArgument)
    );
    assert!(controller.calls().is_empty());

    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "rate", "500000"])),
        Ok(())
    );
    assert_eq!(controller.calls(), vec![ControllerCall::SetRate(Bus::One, 500_000)]);
}

#[test]
fn test_bus_actions() {
    let (mut dispatcher, controller, _) = dispatcher();

    assert_eq!(dispatcher.execute(&args(&["bus", "1", "down"])), Ok(()));
    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "filter", "0x100", "0x7F0"])),
        Err(CommandError::InvalidArgument)
    );
    assert_eq!(
        dispatcher.execute(&args(&["bus", "1", "sideways"])),
        Err(CommandError::InvalidArgument)
    );
    assert_eq!(
        dispatcher.execute(&args(&["bus", "1"])),
        Err(CommandError::InvalidArgument)
    );

    assert_eq!(
        controller.calls(),
        vec![ControllerCall::Disable(Bus::One)]
    );
}

#[test]
fn test_bus_up_is_idempotent() {
    let (mut dispatcher, controller, _) = dispatcher();

    assert_eq!(dispatcher.execute(&args(&["bus", "1", "up"])), Ok(()));
    assert_eq!(dispatcher.execute(&args(&["bus", "1", "up"])), Ok(()));
    assert_eq!(
        controller.calls(),
        vec![ControllerCall::Enable(Bus::One), ControllerCall::Enable(Bus::One)]
    );
}

#[test]
fn test_case_insensitive_names() {
    let (mut upper, upper_controller, _) = dispatcher();
    let (mut lower, lower_controller, _) = dispatcher();

    let upper_response = upper.dispatch(&args(&["BUS", "1", "UP"]));
    let lower_response = lower.dispatch(&args(&["bus", "1", "up"]));

    assert_eq!(upper_response.as_str(), "ok: BUS\r\n");
    assert_eq!(lower_response.as_str(), "ok: bus\r\n");
    assert_eq!(upper_controller.calls(), lower_controller.calls());
}

#[test]
fn test_unknown_command_response() {
    let (mut dispatcher, controller, system) = dispatcher();

    assert_eq!(
        dispatcher.dispatch(&args(&["frobnicate"])).as_str(),
        "error: unknown command\r\n"
    );
    assert!(controller.calls().is_empty());
    assert_eq!(system.resets(), 0);
}

#[test]
fn test_reset_reports_ok() {
    let (mut dispatcher, _, system) = dispatcher();

    // Arguments after `reset` are not inspected.
    let response = dispatcher.dispatch(&args(&["reset", "now"]));

    assert_eq!(response.as_str(), "ok: reset\r\n");
    assert_eq!(system.resets(), 1);
}

#[test]
fn test_tokenized_line_dispatch() {
    let (mut dispatcher, controller, _) = dispatcher();
    let line: ArgumentList = tokenize(b"tx 1 0x7FF 8 1 2 3 4 5 6 7 8").unwrap();

    assert_eq!(dispatcher.dispatch(&line).as_str(), "ok: tx\r\n");
    let (_, frame) = controller.sent()[0];
    assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}
