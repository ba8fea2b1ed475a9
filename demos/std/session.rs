//! # Host Session Demo
//!
//! Replays a terminal session against a bridge whose collaborators print
//! what the hardware would do:
//! - configure and open bus 1
//! - send a frame
//! - report a frame received from the bus
//! - hit the usual host mistakes
//!
//! ```bash
//! cargo run --example session
//! ```

use core::num::NonZeroU32;

use can_usb_bridge::error::CanError;
use can_usb_bridge::protocol::bridge::Bridge;
use can_usb_bridge::protocol::transport::can_frame::{Bus, CanFrame};
use can_usb_bridge::protocol::transport::traits::{
    can_controller::CanController, serial_port::SerialPort, system_control::SystemControl,
};

/// Controller with a single wired bus.
struct PrintingController;

impl PrintingController {
    fn check(bus: Bus) -> Result<(), CanError> {
        match bus {
            Bus::One => Ok(()),
            other => Err(CanError::UnsupportedBus(other)),
        }
    }
}

impl CanController for PrintingController {
    type Error = CanError;

    fn enable(&mut self, bus: Bus) -> Result<(), CanError> {
        Self::check(bus)?;
        println!("   [can{}] enabled", bus.number());
        Ok(())
    }

    fn disable(&mut self, bus: Bus) -> Result<(), CanError> {
        Self::check(bus)?;
        println!("   [can{}] disabled", bus.number());
        Ok(())
    }

    fn set_rate(&mut self, bus: Bus, bitrate: NonZeroU32) -> Result<(), CanError> {
        Self::check(bus)?;
        println!("   [can{}] bit-rate {} bit/s", bus.number(), bitrate);
        Ok(())
    }

    fn set_filter(&mut self, bus: Bus, id: u32, mask: u32) -> Result<(), CanError> {
        Self::check(bus)?;
        println!("   [can{}] filter id={:#x} mask={:#x}", bus.number(), id, mask);
        Ok(())
    }

    fn send(&mut self, bus: Bus, frame: &CanFrame) -> Result<(), CanError> {
        Self::check(bus)?;
        println!(
            "   [can{}] tx id={:#x} data={:02x?}",
            bus.number(),
            frame.raw_id(),
            frame.payload()
        );
        Ok(())
    }
}

/// Prints what the host terminal would display.
struct Terminal;

impl SerialPort for Terminal {
    type Error = core::str::Utf8Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        print!("   <- {}", core::str::from_utf8(bytes)?);
        Ok(())
    }
}

struct Mcu;

impl SystemControl for Mcu {
    fn reset(&mut self) {
        println!("   [mcu] reset requested");
    }
}

fn main() {
    println!("=== can-usb-bridge session ===\n");

    let mut bridge: Bridge<_, _, _> = Bridge::new(PrintingController, Terminal, Mcu);

    println!("(firmware configures the acceptance filter)");
    if let Err(err) = bridge.controller_mut().set_filter(Bus::One, 0x100, 0x7F0) {
        println!("   filter rejected: {}", err);
    }
    println!();

    let script: &[&str] = &[
        "bus 1 rate 500000",
        "BUS 1 UP",
        "tx 1 0x123 3 0xDE 0xAD 0xBE",
        "tx 1 0x123 4 1 2",
        "bus 2 up",
        "bus 9 up",
        "frobnicate",
        "tx 1 1 8 1 2 3 4 5 6 7 8 9 10 11",
    ];

    for line in script {
        println!("-> {}", line);
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\r');
        if let Err(err) = bridge.on_serial_rx(&bytes) {
            println!("   serial error: {}", err);
        }
    }

    println!("\n(frame arriving on bus 1)");
    match CanFrame::new(0x18FF_0001, &[0x01, 0x02]) {
        Ok(frame) => {
            if let Err(err) = bridge.on_can_rx(Bus::One, &frame) {
                println!("   serial error: {}", err);
            }
        }
        Err(err) => println!("   invalid frame: {}", err),
    }

    println!("\n-> reset");
    if let Err(err) = bridge.on_serial_rx(b"reset\r") {
        println!("   serial error: {}", err);
    }

    println!("\n=== done ===");
}
