//! Built-in instruments

mod static_instrument;

pub use static_instrument::{StaticInstrument, StaticInstrumentConfig};
