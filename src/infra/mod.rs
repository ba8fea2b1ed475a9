//! Infrastructure shared by the protocol layer: argument codecs.
pub mod codec;
