pub mod fbm;
pub mod generator;
pub mod params;
pub mod ridged;
pub mod simplex;
pub mod tables;

pub use fbm::{fbm, Fbm};
pub use generator::{Field, GeneratorTree, Node, NodeId, RidgedInputs};
pub use params::{RidgedParams, TerrainNodes};
pub use ridged::{octave_count, ridged, Ridged};
pub use simplex::simplex;
