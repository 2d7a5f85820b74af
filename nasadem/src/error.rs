use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NasademError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0:?} is not named like N44W072.hgt")]
    HgtName(PathBuf),

    #[error("{1:?} has {0} bytes, not a square grid of i16 samples")]
    HgtLen(u64, PathBuf),
}
