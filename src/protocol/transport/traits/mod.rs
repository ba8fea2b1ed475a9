//! Abstraction traits for the external collaborators (CAN controller,
//! serial transport, system control).
pub mod can_controller;
pub mod serial_port;
pub mod system_control;
