//! Outbound half of the serial transport (USB CDC, UART…). Inbound bytes are
//! pushed into the bridge by the transport's receive path.

/// Contract to send bytes to the host.
pub trait SerialPort {
    type Error: core::fmt::Debug;
    /// Write every byte of `bytes` to the host, or fail.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}
