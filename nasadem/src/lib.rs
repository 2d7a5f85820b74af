//! NASADEM/SRTM elevation (`.hgt`) tiles.
//!
//! A tile covers one square degree. Samples are big-endian `i16`
//! meters, stored row-major starting at the north-west corner, and
//! centered on the tile's grid lines (so a 3 arc-second tile is
//! 1201x1201 samples, with the edges shared with its neighbors).
//!
//! # References
//!
//! 1. [HGT file layout](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod error;

pub use crate::error::NasademError;
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::Coord;
use memmap2::Mmap;
use std::{fs::File, io::BufReader, mem::size_of, path::Path};

/// Base floating point type used for coordinates.
pub type C = f64;

/// Sample value the SRTM products use to mark voids.
pub const VOID: i16 = i16::MIN;

const ARCSEC_PER_DEG: C = 3600.0;

pub struct Tile {
    /// Southwest corner of the tile, in whole degrees.
    sw_corner: Coord<i16>,

    /// Arcseconds per sample.
    resolution: u8,

    /// Number of (columns, rows) in this tile.
    dimensions: (usize, usize),

    /// Elevation samples.
    samples: SampleStore,
}

enum SampleStore {
    /// Stand-in for a tile that doesn't exist on disk; every sample
    /// is void.
    Tombstone,
    InMem(Box<[i16]>),
    MemMap(Mmap),
}

impl SampleStore {
    fn get(&self, index: usize) -> i16 {
        match self {
            Self::Tombstone => VOID,
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<i16>();
                i16::from_be_bytes([raw[start], raw[start + 1]])
            }
        }
    }
}

impl Tile {
    /// Returns a Tile read into memory from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NasademError> {
        let sw_corner = parse_sw_corner(&path)?;
        let (resolution, dimensions @ (cols, rows)) = extract_resolution(&path)?;

        let mut file = BufReader::new(File::open(path)?);
        let mut samples = Vec::with_capacity(cols * rows);
        for _ in 0..(cols * rows) {
            samples.push(file.read_i16::<BE>()?);
        }

        Ok(Self {
            sw_corner,
            resolution,
            dimensions,
            samples: SampleStore::InMem(samples.into_boxed_slice()),
        })
    }

    /// Returns a Tile using the memory-mapped file as storage.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, NasademError> {
        let sw_corner = parse_sw_corner(&path)?;
        let (resolution, dimensions) = extract_resolution(&path)?;

        let samples = {
            let file = File::open(path)?;
            // The mapped file is treated as read-only, and length was
            // validated above.
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap)
        };

        Ok(Self {
            sw_corner,
            resolution,
            dimensions,
            samples,
        })
    }

    /// Returns a void 3 arc-second tile for a square degree with no
    /// data on disk.
    pub fn tombstone(sw_corner: Coord<i16>) -> Self {
        Self {
            sw_corner,
            resolution: 3,
            dimensions: (1201, 1201),
            samples: SampleStore::Tombstone,
        }
    }

    /// Southwest corner of this tile in whole degrees.
    pub fn sw_corner(&self) -> Coord<i16> {
        self.sw_corner
    }

    /// Returns this tile's resolution in arcseconds per sample.
    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Returns the number of samples in this tile.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let (cols, rows) = self.dimensions;
        cols * rows
    }

    /// Returns the raw sample nearest to `coord`, or `None` if
    /// `coord` is outside this tile.
    pub fn get(&self, coord: Coord<C>) -> Option<i16> {
        self.coord_to_xy(coord)
            .map(|xy| self.samples.get(self.xy_to_linear_index(xy)))
    }

    /// Returns the elevation nearest to `coord` in meters.
    ///
    /// `None` when `coord` is outside this tile or the sample is void.
    pub fn elevation(&self, coord: Coord<C>) -> Option<i16> {
        self.get(coord).filter(|sample| *sample != VOID)
    }
}

/// Private API.
impl Tile {
    fn samples_per_deg(&self) -> C {
        ARCSEC_PER_DEG / C::from(self.resolution)
    }

    /// Grid position (column from the west edge, row from the south
    /// edge) of the sample nearest to `coord`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn coord_to_xy(&self, coord: Coord<C>) -> Option<(usize, usize)> {
        let spd = self.samples_per_deg();
        let x = ((coord.x - C::from(self.sw_corner.x)) * spd).round();
        let y = ((coord.y - C::from(self.sw_corner.y)) * spd).round();
        let (cols, rows) = self.dimensions;
        let in_bounds = (0.0..cols as C).contains(&x) && (0.0..rows as C).contains(&y);
        in_bounds.then(|| (x as usize, y as usize))
    }

    fn xy_to_linear_index(&self, (x, y): (usize, usize)) -> usize {
        let (cols, rows) = self.dimensions;
        cols * (rows - y - 1) + x
    }
}

fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<(u8, (usize, usize)), NasademError> {
    const RES_1_ARCSECOND_LEN: u64 = 3601 * 3601 * size_of::<i16>() as u64;
    const RES_3_ARCSECOND_LEN: u64 = 1201 * 1201 * size_of::<i16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECOND_LEN => Ok((1, (3601, 3601))),
        RES_3_ARCSECOND_LEN => Ok((3, (1201, 1201))),
        invalid_len => Err(NasademError::HgtLen(invalid_len, path.as_ref().to_owned())),
    }
}

/// Parses the southwest corner out of a name like `N44W072.hgt`.
fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, NasademError> {
    let mk_err = || NasademError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_uppercase)
        .ok_or_else(mk_err)?;
    if name.len() != 7 || !name.is_ascii() {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" => 1,
        "S" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" => 1,
        "W" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}
