//! System-level side effects the command set may request.

/// Device control abstraction.
pub trait SystemControl {
    /// Reset the device.
    ///
    /// Firmware implementations normally never return; test doubles record
    /// the request and return so the dispatcher can report success.
    fn reset(&mut self);
}
