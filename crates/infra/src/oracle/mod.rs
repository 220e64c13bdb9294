//! Remote text-completion oracles.

pub mod gemini;

pub use gemini::GeminiOracle;
