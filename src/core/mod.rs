//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{Conversion, ConversionRequest, PairConversionProvider, TransportError};
pub use currency::{CurrencyDirectoryProvider, CurrencyEntry};
pub use session::{ConversionPhase, SessionState};
