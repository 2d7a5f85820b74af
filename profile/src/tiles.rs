//! Elevation raster backed by a directory of NASADEM tiles.

use crate::{ProfileError, RasterSource, C};
use dashmap::DashMap;
use geo::geometry::Coord;
use log::{debug, warn};
use nasadem::{NasademError, Tile};
use serde::Deserialize;
use std::{io::ErrorKind, path::PathBuf, sync::Arc};

pub struct Tiles {
    /// Directory containing NASADEM HGT tile files.
    tile_dir: PathBuf,

    /// How to load tiles (in-memory or mapped).
    tile_mode: TileMode,

    /// Tiles which have been loaded on demand, keyed by southwest
    /// corner.
    tiles: DashMap<Coord<i16>, Arc<Tile>>,
}

impl Tiles {
    pub fn new(tile_dir: PathBuf, tile_mode: TileMode) -> Result<Self, ProfileError> {
        // Fail early if tile_dir has no `hgt` file at all.
        let mut has_height_files = false;
        for entry in std::fs::read_dir(&tile_dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(std::ffi::OsStr::to_str);
            if ext.is_some_and(|ext| ext.eq_ignore_ascii_case("hgt")) {
                has_height_files = true;
                break;
            }
        }

        if has_height_files {
            Ok(Self {
                tile_dir,
                tile_mode,
                tiles: DashMap::new(),
            })
        } else {
            Err(ProfileError::Path(tile_dir))
        }
    }

    /// Returns the tile containing `coord`.
    ///
    /// Tiles are read from disk on first use. Missing tiles are
    /// replaced by a void tombstone.
    pub fn get(&self, coord: Coord<C>) -> Result<Arc<Tile>, ProfileError> {
        let sw_corner = sw_corner(coord);
        if let Some(tile) = self.tiles.get(&sw_corner) {
            return Ok(Arc::clone(&tile));
        }
        // The entry's shard stays write-locked while the tile loads, so
        // concurrent lookups of the same square degree read it once.
        let tile = self
            .tiles
            .entry(sw_corner)
            .or_try_insert_with(|| self.load_or_tombstone(sw_corner))?;
        Ok(Arc::clone(&tile))
    }
}

impl RasterSource for Tiles {
    fn value(&self, coord: Coord<C>) -> Result<Option<C>, ProfileError> {
        let tile = self.get(coord)?;
        Ok(tile.elevation(coord).map(C::from))
    }
}

/// Private API.
impl Tiles {
    fn load_tile(&self, sw_corner: Coord<i16>) -> Result<Tile, ProfileError> {
        let tile_path = {
            let file_name = file_name(sw_corner);
            let tile_path = self.tile_dir.join(&file_name);
            if tile_path.exists() {
                tile_path
            } else {
                self.tile_dir.join(file_name.to_lowercase())
            }
        };
        debug!("loading {tile_path:?}");
        match self.tile_mode {
            TileMode::InMem => Ok(Tile::load(tile_path)?),
            TileMode::MemMap => Ok(Tile::memmap(tile_path)?),
        }
    }

    fn load_or_tombstone(&self, sw_corner: Coord<i16>) -> Result<Arc<Tile>, ProfileError> {
        match self.load_tile(sw_corner) {
            Ok(tile) => Ok(Arc::new(tile)),
            Err(ProfileError::Nasadem(NasademError::Io(e))) if e.kind() == ErrorKind::NotFound => {
                warn!("no tile for {sw_corner:?}, its elevations are void");
                Ok(Arc::new(Tile::tombstone(sw_corner)))
            }
            Err(e) => Err(e),
        }
    }
}

/// Storage strategy for HGT samples, `memmap` unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileMode {
    /// Read the whole file into a sample buffer (about 2.8MB per
    /// 3 arc-second tile).
    InMem,

    /// Leave samples on disk and let the OS page them in.
    #[default]
    MemMap,
}

/// Integer degrees of the tile containing `coord`.
#[allow(clippy::cast_possible_truncation)]
fn sw_corner(Coord { x, y }: Coord<C>) -> Coord<i16> {
    Coord {
        x: (x.floor() as i16),
        y: (y.floor() as i16),
    }
}

/// `N44W072.hgt` style name of the tile at `sw_corner`.
fn file_name(sw_corner: Coord<i16>) -> String {
    let lat = if sw_corner.y < 0 { 'S' } else { 'N' };
    let lon = if sw_corner.x < 0 { 'W' } else { 'E' };
    format!(
        "{lat}{:02}{lon}{:03}.hgt",
        sw_corner.y.unsigned_abs(),
        sw_corner.x.unsigned_abs()
    )
}
