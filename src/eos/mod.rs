//! Equation-of-state tables loaded from Sesame-style text files.

pub mod registry;
pub mod sesame;
pub mod table;

pub use registry::EosRegistry;
pub use table::{ChargeStateCurve, ColdCurve, EosGrid, MaterialEos, MeltCurve, ThermoState};
