use anyhow::{anyhow, Error as AnyError};
use clap::{Args, Parser, Subcommand};
use geojson::Geometry;
use profile::geo::{geometry::Coord, LineString};
use std::{path::PathBuf, str::FromStr};

/// Sample raster values along a line.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file describing the available rasters.
    #[arg(short, long)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the profile as JSON.
    Json(ProfileArgs),

    /// Print the profile as CSV.
    Csv(ProfileArgs),

    /// Plot the first layer to terminal.
    Plot(ProfileArgs),

    /// Print raster values at a single point as JSON.
    Raster {
        /// Location as "x,y".
        #[arg(long)]
        at: Xy,

        /// Comma separated raster names, defaults to all of them.
        #[arg(short, long, value_delimiter = ',')]
        layers: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// GeoJSON LineString to sample along.
    #[arg(short, long)]
    pub geom: Line,

    /// Approximate number of points in the profile.
    #[arg(short, long, default_value_t = 100, value_parser = parse_nb_points)]
    pub nb_points: usize,

    /// Comma separated raster names, defaults to all of them.
    #[arg(short, long, value_delimiter = ',')]
    pub layers: Option<Vec<String>>,

    /// Query rasters from multiple threads.
    #[arg(short, long, default_value_t = false)]
    pub parallel: bool,
}

/// Upper bound for `--nb-points`.
pub const MAX_NB_POINTS: usize = 1_000_000;

fn parse_nb_points(s: &str) -> Result<usize, AnyError> {
    let nb_points = usize::from_str(s)?;
    if nb_points > MAX_NB_POINTS {
        return Err(anyhow!("at most {MAX_NB_POINTS} points"));
    }
    Ok(nb_points)
}

#[derive(Clone, Debug)]
pub struct Line(pub LineString<f64>);

impl FromStr for Line {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let geometry = Geometry::from_str(s)?;
        let line = LineString::<f64>::try_from(geometry.value)
            .map_err(|e| anyhow!("not a GeoJSON LineString, {e}"))?;
        if line.0.is_empty() {
            return Err(anyhow!("LineString has no coordinates"));
        }
        Ok(Self(line))
    }
}

#[derive(Clone, Debug, Copy)]
pub struct Xy(pub Coord<f64>);

impl FromStr for Xy {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (x_str, y_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid x,y pair"))?;
        let x = f64::from_str(x_str.trim())?;
        let y = f64::from_str(y_str.trim())?;
        Ok(Self(Coord { x, y }))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Line, Xy, MAX_NB_POINTS};
    use clap::Parser;
    use profile::geo::coord;

    #[test]
    fn test_parse_line() {
        let Line(line) = r#"{"type": "LineString", "coordinates": [[0, 0], [10, 0], [10, 10]]}"#
            .parse()
            .unwrap();
        assert_eq!(line.0.len(), 3);
        assert_eq!(line.0[2], coord!(x: 10.0, y: 10.0));

        assert!(r#"{"type": "Point", "coordinates": [0, 0]}"#.parse::<Line>().is_err());
        assert!(r#"{"type": "LineString", "coordinates": []}"#.parse::<Line>().is_err());
        assert!("not json".parse::<Line>().is_err());
    }

    #[test]
    fn test_parse_xy() {
        let Xy(at) = "2600000.5, 1200000".parse().unwrap();
        assert_eq!(at, coord!(x: 2_600_000.5, y: 1_200_000.0));
        assert!("2600000".parse::<Xy>().is_err());
        assert!("a,b".parse::<Xy>().is_err());
    }

    #[test]
    fn test_cli() {
        let cli = Cli::try_parse_from([
            "geoprofile",
            "--config",
            "rasters.json",
            "csv",
            "--geom",
            r#"{"type": "LineString", "coordinates": [[0, 0], [10, 0]]}"#,
            "--nb-points",
            "10",
            "--layers",
            "srtm,aster",
        ])
        .unwrap();
        let Command::Csv(args) = cli.cmd else {
            panic!("expected csv command");
        };
        assert_eq!(args.nb_points, 10);
        assert_eq!(
            args.layers,
            Some(vec!["srtm".to_string(), "aster".to_string()])
        );
        assert!(!args.parallel);
    }

    #[test]
    fn test_nb_points_bounds() {
        let parse = |nb_points: &str| {
            Cli::try_parse_from([
                "geoprofile",
                "-c",
                "rasters.json",
                "json",
                "-g",
                r#"{"type": "LineString", "coordinates": [[0, 0], [1, 0]]}"#,
                "-n",
                nb_points,
            ])
        };
        assert!(parse("0").is_ok());
        assert!(parse(&MAX_NB_POINTS.to_string()).is_ok());
        assert!(parse(&(MAX_NB_POINTS + 1).to_string()).is_err());
        assert!(parse(&usize::MAX.to_string()).is_err());
        assert!(parse("-1").is_err());
    }

    #[test]
    fn test_raster_cli() {
        let cli = Cli::try_parse_from([
            "geoprofile",
            "-c",
            "rasters.json",
            "raster",
            "--at",
            "1,2",
        ])
        .unwrap();
        let Command::Raster { at, layers } = cli.cmd else {
            panic!("expected raster command");
        };
        assert_eq!(at.0, coord!(x: 1.0, y: 2.0));
        assert_eq!(layers, None);
    }
}
