use crate::C;
use nasadem::NasademError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("geometry has no coordinates")]
    EmptyGeometry,

    #[error("layer {0} not found")]
    RasterNotFound(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no height files in {0}")]
    Path(PathBuf),

    #[error("{0}")]
    Nasadem(#[from] NasademError),

    #[error("invalid raster config, {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid round value {0}, must be positive")]
    Round(C),
}
