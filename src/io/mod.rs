pub(crate) mod basis_set;
mod coordinates;
mod imprint;
mod input;
mod output;
pub(crate) mod settings;

pub use basis_set::{AngularMomentum, BasisSpecification, ContractedGaussian};
pub use coordinates::*;
pub use imprint::{write_footer, write_header};
pub use input::*;
pub use output::{SpectrumExporter, SpectrumExporterBuilder};
pub use settings::Configuration;
