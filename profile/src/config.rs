//! Raster registry configuration.
//!
//! ```json
//! {
//!   "rasters": {
//!     "srtm": { "type": "hgt", "dir": "data/3arcsecond", "round": 1 }
//!   }
//! }
//! ```

use crate::{math::decimals_of, ProfileError, Raster, Rasters, TileMode, Tiles, C};
use log::info;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub rasters: BTreeMap<String, RasterConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RasterConfig {
    #[serde(flatten)]
    pub source: SourceConfig,

    /// Quantum values are rounded half up to, e.g. `1` or `0.1`.
    #[serde(default)]
    pub round: Option<C>,

    /// Raw value meaning "no data".
    #[serde(default)]
    pub nodata: Option<C>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A directory of NASADEM/SRTM `.hgt` tiles.
    Hgt {
        dir: PathBuf,
        #[serde(default)]
        mode: TileMode,
    },
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Opens every configured raster.
    pub fn into_rasters(self) -> Result<Rasters, ProfileError> {
        let mut rasters = Rasters::new();
        for (name, config) in self.rasters {
            let raster = config.open()?;
            info!("loaded raster {name}");
            rasters.insert(name, raster);
        }
        Ok(rasters)
    }
}

impl FromStr for Config {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl RasterConfig {
    pub fn open(self) -> Result<Raster, ProfileError> {
        let mut raster = match self.source {
            SourceConfig::Hgt { dir, mode } => Raster::new(Tiles::new(dir, mode)?),
        };
        if let Some(quantum) = self.round {
            raster = raster.round(decimals_of(quantum)?);
        }
        if let Some(nodata) = self.nodata {
            raster = raster.nodata(nodata);
        }
        Ok(raster)
    }
}
