//! Data types flowing through the scan pipeline

/// Camera frames and their planes
pub mod frame;
/// Decoded RGB rasters
pub mod raster;
/// Per-frame plane size report
pub mod report;
/// Quarter-turn rotations
pub mod rotation;
/// Decoded symbols
pub mod symbol;

pub use frame::{FramePlanes, Plane, PlaneKind, RawFrame};
pub use raster::RasterImage;
pub use report::DiagnosticReport;
pub use rotation::{InvalidRotation, Rotation, RotationCandidate};
pub use symbol::{Symbol, SymbolFormat, SymbolMetadata};
