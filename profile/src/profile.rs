use crate::{
    math::{cumulative_distances, resample},
    Distance, ProfileError, Rasters, C,
};
use geo::geometry::{Coord, LineString};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// One sample along a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledPoint {
    /// Distance from the first point along the line.
    #[serde(rename = "dist")]
    pub distance: Distance,

    /// Value of each selected raster, `None` where it has no data.
    pub values: BTreeMap<String, Option<C>>,

    pub x: C,

    pub y: C,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Names of the sampled rasters, in request order.
    pub layers: Vec<String>,

    /// Samples in order along the line.
    pub points: Vec<SampledPoint>,
}

impl Profile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder {
            line: None,
            nb_points: None,
            layers: None,
            parallel: false,
        }
    }
}

pub struct ProfileBuilder {
    /// Line to sample (required).
    line: Option<LineString<C>>,

    /// Approximate number of samples (required).
    nb_points: Option<usize>,

    /// Rasters to sample, defaults to all of them.
    layers: Option<Vec<String>>,

    /// Query rasters from multiple threads (defaults to false).
    parallel: bool,
}

impl ProfileBuilder {
    pub fn line<L: Into<LineString<C>>>(mut self, line: L) -> Self {
        self.line = Some(line.into());
        self
    }

    pub fn nb_points(mut self, nb_points: usize) -> Self {
        self.nb_points = Some(nb_points);
        self
    }

    pub fn layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(&self, rasters: &Rasters) -> Result<Profile, ProfileError> {
        let line = self.line.as_ref().ok_or(ProfileError::Builder("line"))?;
        let nb_points = self.nb_points.ok_or(ProfileError::Builder("nb_points"))?;
        if line.0.is_empty() {
            return Err(ProfileError::EmptyGeometry);
        }

        // Resolve layers before doing any work so unknown names fail
        // the whole request.
        let selection = rasters.select(self.layers.as_deref())?;

        let (coords, path_runtime) = {
            let now = std::time::Instant::now();
            let coords: Vec<Coord<C>> = resample(&line.0, nb_points);
            (coords, now.elapsed())
        };

        let (values, raster_runtime) = {
            let now = std::time::Instant::now();
            let values = if self.parallel {
                coords
                    .par_iter()
                    .map(|coord| selection.values(*coord))
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                coords
                    .iter()
                    .map(|coord| selection.values(*coord))
                    .collect::<Result<Vec<_>, _>>()?
            };
            (values, now.elapsed())
        };

        debug!(
            "profile; len: {}, layers: {}, path_exec: {:?}, raster_exec: {:?}",
            coords.len(),
            selection.layers().len(),
            path_runtime,
            raster_runtime
        );

        let points = coords
            .iter()
            .zip(cumulative_distances(&coords))
            .zip(values)
            .map(|((coord, distance), values)| SampledPoint {
                distance: Distance::new(distance),
                values,
                x: coord.x,
                y: coord.y,
            })
            .collect();

        Ok(Profile {
            layers: selection.into_layers(),
            points,
        })
    }
}
