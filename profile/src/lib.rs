//! Raster value profiles along planar polylines.
//!
//! A [`Profile`] densifies a line to roughly the requested number of
//! points, measures the distance travelled to each of them and samples
//! every selected raster there.

mod config;
mod distance;
mod error;
pub mod math;
mod profile;
mod raster;
mod tiles;

pub use crate::{
    config::{Config, RasterConfig, SourceConfig},
    distance::Distance,
    error::ProfileError,
    profile::{Profile, ProfileBuilder, SampledPoint},
    raster::{Raster, RasterSource, Rasters, Selection},
    tiles::{TileMode, Tiles},
};
pub use geo;

/// Floating point type used for coordinates, distances and values.
pub type C = f64;
