//! Named raster sources and the selection of which ones to sample.

use crate::{math, ProfileError, C};
use geo::geometry::Coord;
use std::collections::BTreeMap;

/// Something that yields a scalar for a planar coordinate.
///
/// `Ok(None)` means the source has no data there, which is not the
/// same thing as a value of zero.
pub trait RasterSource: Send + Sync {
    fn value(&self, coord: Coord<C>) -> Result<Option<C>, ProfileError>;
}

impl<F> RasterSource for F
where
    F: Fn(Coord<C>) -> Option<C> + Send + Sync,
{
    fn value(&self, coord: Coord<C>) -> Result<Option<C>, ProfileError> {
        Ok(self(coord))
    }
}

/// A raster source plus the post-processing applied to its values.
pub struct Raster {
    source: Box<dyn RasterSource>,

    /// Raw value that means "no data".
    nodata: Option<C>,

    /// Number of decimals values are rounded (half up) to.
    decimals: Option<u32>,
}

impl Raster {
    pub fn new<S: RasterSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            nodata: None,
            decimals: None,
        }
    }

    pub fn nodata(mut self, nodata: C) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn round(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Returns the value at `coord`, `None` where there's no data.
    pub fn value(&self, coord: Coord<C>) -> Result<Option<C>, ProfileError> {
        let value = self
            .source
            .value(coord)?
            .filter(|v| !v.is_nan() && Some(*v) != self.nodata);
        Ok(match self.decimals {
            Some(decimals) => value.map(|v| math::round(v, decimals)),
            None => value,
        })
    }
}

/// Registry of rasters by name.
#[derive(Default)]
pub struct Rasters {
    rasters: BTreeMap<String, Raster>,
}

impl Rasters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raster` under `name`, returning the raster it
    /// replaced.
    pub fn insert<N: Into<String>>(&mut self, name: N, raster: Raster) -> Option<Raster> {
        self.rasters.insert(name.into(), raster)
    }

    pub fn with<N: Into<String>>(mut self, name: N, raster: Raster) -> Self {
        self.insert(name, raster);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Raster> {
        self.rasters.get(name)
    }

    /// Registered names, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rasters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Picks the rasters to sample.
    ///
    /// `None` selects every registered raster, sorted by name.
    /// Otherwise the layers keep the given order and every name must
    /// be registered.
    pub fn select<S: AsRef<str>>(&self, layers: Option<&[S]>) -> Result<Selection<'_>, ProfileError> {
        let Some(layers) = layers else {
            return Ok(Selection {
                layers: self.rasters.keys().cloned().collect(),
                rasters: self.rasters.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            });
        };

        let mut rasters: Vec<(&str, &Raster)> = Vec::with_capacity(layers.len());
        for layer in layers {
            let layer = layer.as_ref();
            let (name, raster) = self
                .rasters
                .get_key_value(layer)
                .ok_or_else(|| ProfileError::RasterNotFound(layer.to_owned()))?;
            if !rasters.iter().any(|(selected, _)| *selected == name.as_str()) {
                rasters.push((name.as_str(), raster));
            }
        }
        Ok(Selection {
            layers: layers.iter().map(|l| l.as_ref().to_owned()).collect(),
            rasters,
        })
    }
}

/// Rasters chosen for one request.
pub struct Selection<'a> {
    layers: Vec<String>,
    rasters: Vec<(&'a str, &'a Raster)>,
}

impl Selection<'_> {
    /// Layer names as requested (or all names, sorted).
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<String> {
        self.layers
    }

    /// Evaluates every selected raster at `coord`.
    pub fn values(&self, coord: Coord<C>) -> Result<BTreeMap<String, Option<C>>, ProfileError> {
        self.rasters
            .iter()
            .map(|(name, raster)| Ok(((*name).to_owned(), raster.value(coord)?)))
            .collect()
    }
}
