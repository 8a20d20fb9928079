//! Geometry phases of the crop pipeline.
//!
//! # Phase Order
//!
//! 1. Resolve: map the displayed crop back to unrotated source pixels
//! 2. Crop: cut the region out of a fully decoded image (fallback only)
//! 3. Composite: rotate and scale the region into the output buffer
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are in pixels of the displayed (rotated) image
//! - Origin is the top-left corner, y grows downward

mod composite;
mod crop;
mod resolve;

pub use composite::{composite, plan_composition, Composition};
pub use crop::crop_raster;
pub use resolve::{resolve_native_crop, rotated_extent};
