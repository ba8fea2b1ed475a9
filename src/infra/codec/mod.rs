//! Text codecs turning command tokens into typed values.
pub mod number;
