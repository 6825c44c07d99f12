pub mod constants;
pub mod error;
pub mod material;
pub mod math_utils;
pub mod spectrum;
pub mod deposition;
pub mod eos;
pub mod melt;
pub mod heating;
pub mod validation;

pub use deposition::{
    edep, DepositionEvaluator, DepositionProfile, DepositionRequest, DepthPolicy, EvaluatorConfig,
};
pub use error::{DepositionError, DepositionResult};
pub use material::{Material, SourceClass};
pub use eos::{EosRegistry, MaterialEos};
pub use heating::{heated_state, HeatedState};
pub use melt::MeltTable;
pub use validation::{DepositionIntegrator, ValidationConfig, ValidationReport};
