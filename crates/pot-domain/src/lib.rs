// pot-domain library entry point
pub mod calculator;
pub mod element;
pub mod error;
pub mod extxyz;
pub mod selection;
pub mod structure;
pub mod synthetic;
pub use calculator::{Calculator, Prediction, SinglePointCalculator};
pub use element::Element;
pub use error::DomainError;
pub use extxyz::ExtxyzError;
pub use selection::{uniform_energetic, Selection};
pub use structure::{Cell, Labels, Structure, StructureRecord, Vec3};
pub use synthetic::{generate, SyntheticConfig};
