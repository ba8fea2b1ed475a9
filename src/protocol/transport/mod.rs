//! CAN transport layer: frame and bus representations plus the capability
//! traits through which the protocol reaches the hardware.
//!
//! The protocol never touches registers or USB endpoints itself. Firmware
//! provides a [`CanController`](traits::can_controller::CanController), a
//! [`SerialPort`](traits::serial_port::SerialPort), and a
//! [`SystemControl`](traits::system_control::SystemControl) implementation,
//! and feeds received bytes and frames into the
//! [`bridge`](crate::protocol::bridge).

pub mod can_frame;
pub mod traits;
