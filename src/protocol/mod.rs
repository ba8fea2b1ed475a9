//! Host command protocol: line framing, tokenizing, command dispatch, the
//! bridge wiring them together, and the CAN/serial transport seams.
pub mod bridge;
pub mod commands;
pub mod framing;
pub mod tokenizer;
pub mod transport;
