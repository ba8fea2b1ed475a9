//! Event queue: producers enqueue from "interrupt" context, one runner
//! drains the queues into the bridge.
mod helpers {
    include!("../../helpers/mod.rs");
}

use can_usb_bridge::{
    error::QueueError,
    protocol::{
        bridge::{
            service::{BridgeService, FrameChannel, SerialChannel},
            Bridge,
        },
        transport::can_frame::{Bus, CanFrame},
    },
};
use embassy_sync::channel::Channel;
use helpers::{mock_bridge, ControllerCall, MockController, MockSerial, MockSystem};
use static_cell::StaticCell;
use tokio::time::{timeout, Duration};

static SERIAL_CHANNEL: StaticCell<SerialChannel<4>> = StaticCell::new();
static FRAME_CHANNEL: StaticCell<FrameChannel<4>> = StaticCell::new();
static WIDE_SERIAL_CHANNEL: StaticCell<SerialChannel<8>> = StaticCell::new();
static TINY_SERIAL_CHANNEL: StaticCell<SerialChannel<1>> = StaticCell::new();
static RESYNC_SERIAL_CHANNEL: StaticCell<SerialChannel<1>> = StaticCell::new();
static BUSY_SERIAL_CHANNEL: StaticCell<SerialChannel<4>> = StaticCell::new();
static BUSY_FRAME_CHANNEL: StaticCell<FrameChannel<4>> = StaticCell::new();
static SMALL_LINE_SERIAL_CHANNEL: StaticCell<SerialChannel<2>> = StaticCell::new();

#[tokio::test]
async fn test_runner_processes_queued_events_in_order() {
    let serial_channel = SERIAL_CHANNEL.init(Channel::new());
    let frame_channel = FRAME_CHANNEL.init(Channel::new());

    let (bridge, doubles) = mock_bridge();
    let parts = BridgeService::new(bridge, &*serial_channel, Some(&*frame_channel)).into_parts();
    let handle = parts.handle;
    let mut runner = parts.runner;

    handle.try_serial_rx(b"bus 1 up\r").unwrap();
    runner.step().await;
    handle
        .try_can_rx(Bus::One, CanFrame::new(0x42, &[7]).unwrap())
        .unwrap();
    runner.step().await;

    assert_eq!(doubles.serial.lines(), ["ok: bus", "rx: 1 66 1 7"]);
    assert_eq!(doubles.controller.calls(), vec![ControllerCall::Enable(Bus::One)]);
}

#[tokio::test]
async fn test_drive_serves_split_input() {
    let serial_channel = WIDE_SERIAL_CHANNEL.init(Channel::new());

    let (bridge, doubles) = mock_bridge();
    let parts = BridgeService::new(bridge, &*serial_channel, None::<&FrameChannel<0>>).into_parts();
    let handle = parts.handle;

    // A command longer than one queue slot, delivered across two slots.
    let mut command = b"tx 1 0x1FFFFFFF 8 0x000001 0x000002 0x000003 0x000004".to_vec();
    command.extend_from_slice(b" 0x000005 0x000006 0x000007 0x000008\r");
    assert!(command.len() > 64);

    tokio::select! {
        _ = parts.runner.drive() => {
            panic!("runner ended unexpectedly");
        }
        _ = async {
            handle.serial_rx(&command).await;
            handle.serial_rx(b"reset\r").await;
            while doubles.serial.lines().len() < 2 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        } => {}
    }

    assert_eq!(doubles.serial.lines(), ["ok: tx", "ok: reset"]);
    let (_, frame) = doubles.controller.sent()[0];
    assert_eq!(frame.raw_id(), 0x1FFF_FFFF);
    assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(doubles.system.resets(), 1);
}

#[tokio::test]
async fn test_handle_reports_full_and_disabled_queues() {
    let serial_channel = TINY_SERIAL_CHANNEL.init(Channel::new());

    let (bridge, doubles) = mock_bridge();
    let parts = BridgeService::new(bridge, &*serial_channel, None::<&FrameChannel<1>>).into_parts();
    let handle = parts.handle;
    let mut runner = parts.runner;

    let frame = CanFrame::new(1, &[]).unwrap();
    assert_eq!(handle.try_can_rx(Bus::One, frame), Err(QueueError::Disabled));
    assert_eq!(handle.can_rx(Bus::One, frame).await, Err(QueueError::Disabled));

    handle.try_serial_rx(b"bus 1 up\r").unwrap();
    assert_eq!(handle.try_serial_rx(b"bus 1 down\r"), Err(QueueError::Full));

    // Only the queued command is answered.
    timeout(Duration::from_secs(1), runner.step())
        .await
        .expect("queued chunk must be processed");
    assert_eq!(doubles.serial.lines(), ["ok: bus"]);
    assert!(
        timeout(Duration::from_millis(20), runner.step()).await.is_err(),
        "dropped chunk must not reach the bridge"
    );
}

#[tokio::test]
async fn test_partial_enqueue_does_not_leak_into_next_command() {
    let serial_channel = RESYNC_SERIAL_CHANNEL.init(Channel::new());

    let (bridge, doubles) = mock_bridge();
    let parts = BridgeService::new(bridge, &*serial_channel, None::<&FrameChannel<1>>).into_parts();
    let handle = parts.handle;
    let mut runner = parts.runner;

    // A line split over two separate inputs is still one command.
    handle.try_serial_rx(b"bus 1").unwrap();
    runner.step().await;
    handle.try_serial_rx(b" down\r").unwrap();
    runner.step().await;
    assert_eq!(doubles.serial.lines(), ["ok: bus"]);

    // The first slot ends inside `tx 1 100 0`; its terminator does not fit.
    let input = "bus 1 up\r".repeat(6) + "tx 1 100 0\r";
    assert_eq!(input.len(), 65);
    assert_eq!(handle.try_serial_rx(input.as_bytes()), Err(QueueError::Full));
    runner.step().await;
    assert_eq!(runner.bridge().pending_line(), b"tx 1 100 0");

    handle.try_serial_rx(b"bus 1 up\r").unwrap();
    runner.step().await;

    let lines = doubles.serial.lines();
    assert_eq!(lines.len(), 8);
    assert!(lines.iter().skip(1).all(|line| line == "ok: bus"));
    assert!(doubles.controller.sent().is_empty());
    assert!(runner.bridge().pending_line().is_empty());
}

#[tokio::test]
async fn test_busy_queues_are_served_in_turn() {
    let serial_channel = BUSY_SERIAL_CHANNEL.init(Channel::new());
    let frame_channel = BUSY_FRAME_CHANNEL.init(Channel::new());

    let (bridge, doubles) = mock_bridge();
    let parts = BridgeService::new(bridge, &*serial_channel, Some(&*frame_channel)).into_parts();
    let handle = parts.handle;
    let mut runner = parts.runner;

    for _ in 0..2 {
        handle.try_serial_rx(b"bus 1 up\r").unwrap();
        handle
            .try_can_rx(Bus::One, CanFrame::new(0x10, &[]).unwrap())
            .unwrap();
    }
    for _ in 0..4 {
        runner.step().await;
    }

    assert_eq!(
        doubles.serial.lines(),
        ["ok: bus", "rx: 1 16 0", "ok: bus", "rx: 1 16 0"]
    );
}

#[tokio::test]
async fn test_service_keeps_custom_limits() {
    let serial_channel = SMALL_LINE_SERIAL_CHANNEL.init(Channel::new());

    let controller = MockController::default();
    let serial = MockSerial::default();
    let bridge: Bridge<_, _, _, 16> =
        Bridge::new(controller.clone(), serial.clone(), MockSystem::default());
    let parts = BridgeService::new(bridge, &*serial_channel, None::<&FrameChannel<1>>).into_parts();
    let handle = parts.handle;
    let mut runner = parts.runner;

    handle.try_serial_rx(b"tx 1 0x100 1 0x01\rbus 1 up\r").unwrap();
    runner.step().await;

    assert_eq!(serial.lines(), ["error: invalid command", "ok: bus"]);
    assert_eq!(controller.calls(), vec![ControllerCall::Enable(Bus::One)]);
}
