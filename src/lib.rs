//! `can-usb-bridge` library: the command pipeline of a firmware bridge that
//! exposes a CAN bus over a USB virtual serial port, in a `no_std`
//! environment. The crate exposes the shared configuration, the parsing
//! infrastructure, and the protocol logic (framing, tokenizing, command
//! dispatch, and the event-driven bridge service).
#![no_std]
//==================================================================================
/// Configuration constants and buffer types shared by every stage of the pipeline.
pub mod core;
/// Typed errors for framing, tokenizing, command validation, frame
/// construction, and event queueing.
pub mod error;
/// Text codecs used to interpret command arguments.
pub mod infra;
/// Command protocol: line framing, tokenizer, dispatcher, CAN transport
/// abstractions, and the bridge wiring them together.
pub mod protocol;
//==================================================================================
