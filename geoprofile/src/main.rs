mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use itertools::Itertools;
use log::info;
use options::{Cli, Command as CliCmd, ProfileArgs};
use profile::{Config, Profile, Rasters, SampledPoint, C};
use serde::Serialize;
use std::{io::Write, iter::once};
use textplots::{Chart, Plot, Shape};

/// Written in CSV output where a raster has no data.
const CSV_NODATA: &str = "-9999";

fn main() -> Result<(), AnyError> {
    let Cli { config, cmd } = Cli::parse();

    env_logger::init();

    let rasters = Config::from_path(&config)?.into_rasters()?;
    info!("{} rasters from {config:?}", rasters.len());

    match cmd {
        CliCmd::Json(args) => print_json(&compute(&args, &rasters)?)?,
        CliCmd::Csv(args) => {
            let profile = compute(&args, &rasters)?;
            write_csv(&mut std::io::stdout().lock(), &profile)?;
        }
        CliCmd::Plot(args) => plot_ascii(&compute(&args, &rasters)?)?,
        CliCmd::Raster { at, layers } => {
            let values = rasters.select(layers.as_deref())?.values(at.0)?;
            println!("{}", serde_json::to_string(&values)?);
        }
    };
    Ok(())
}

fn compute(args: &ProfileArgs, rasters: &Rasters) -> Result<Profile, AnyError> {
    let mut builder = Profile::builder()
        .line(args.geom.0.clone())
        .nb_points(args.nb_points)
        .parallel(args.parallel);
    if let Some(layers) = &args.layers {
        builder = builder.layers(layers.iter().cloned());
    }
    Ok(builder.build(rasters)?)
}

fn print_json(profile: &Profile) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonProfile<'a> {
        profile: &'a [SampledPoint],
    }

    let json = serde_json::to_string(&JsonProfile {
        profile: &profile.points,
    })?;
    println!("{json}");
    Ok(())
}

/// # Example with gnuplot
///
/// ```sh
/// geoprofile --config rasters.json csv --geom "$LINE" --nb-points 500 | tr ',' ' ' | tail -n +2 > /tmp/plot && gnuplot -p -e "plot '/tmp/plot' using 1:2 with lines"
/// ```
fn write_csv<W: Write>(out: &mut W, profile: &Profile) -> Result<(), AnyError> {
    let header = once("distance")
        .chain(profile.layers.iter().map(String::as_str))
        .chain(["x", "y"])
        .join(",");
    writeln!(out, "{header}")?;
    for point in &profile.points {
        let row = once(point.distance.to_string())
            .chain(
                profile
                    .layers
                    .iter()
                    .map(|layer| format_value(point.values.get(layer))),
            )
            .chain([point.x.to_string(), point.y.to_string()])
            .join(",");
        writeln!(out, "{row}")?;
    }
    Ok(())
}

fn format_value(value: Option<&Option<C>>) -> String {
    match value {
        Some(Some(value)) => value.to_string(),
        _ => CSV_NODATA.to_string(),
    }
}

fn plot_ascii(profile: &Profile) -> Result<(), AnyError> {
    let layer = profile
        .layers
        .first()
        .ok_or_else(|| anyhow!("no raster to plot"))?;
    let plot_data = plot_data(profile, layer);
    let x_max = plot_data.last().map_or(0.0, |(x, _)| *x);
    Chart::new(300, 150, 0.0, x_max)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
    Ok(())
}

/// (distance, value) pairs of `layer`, skipping points with no data.
#[allow(clippy::cast_possible_truncation)]
fn plot_data(profile: &Profile, layer: &str) -> Vec<(f32, f32)> {
    profile
        .points
        .iter()
        .filter_map(|point| {
            let value = point.values.get(layer).copied().flatten()?;
            Some((point.distance.get() as f32, value as f32))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{plot_data, write_csv};
    use profile::{geo::Coord, Profile, Raster, Rasters};

    fn two_layer_profile() -> Profile {
        let rasters = Rasters::new()
            .with("srtm", Raster::new(|c: Coord<f64>| Some(c.x * 100.0)))
            .with("lidar", Raster::new(|c: Coord<f64>| (c.x > 1.0).then_some(7.5)));
        Profile::builder()
            .line(vec![(0., 0.), (2., 0.)])
            .nb_points(2)
            .layers(["srtm", "lidar"])
            .build(&rasters)
            .unwrap()
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &two_layer_profile()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "distance,srtm,lidar,x,y\n\
             0.0,0,-9999,0,0\n\
             1.0,100,-9999,1,0\n\
             2.0,200,7.5,2,0\n"
        );
    }

    #[test]
    fn test_csv_without_layers() {
        let profile = Profile::builder()
            .line(vec![(0., 0.), (1., 0.)])
            .nb_points(1)
            .build(&Rasters::new())
            .unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &profile).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "distance,x,y\n0.0,0,0\n1.0,1,0\n"
        );
    }

    #[test]
    fn test_plot_data_skips_nodata() {
        let profile = two_layer_profile();
        assert_eq!(plot_data(&profile, "lidar"), vec![(2.0, 7.5)]);
        assert_eq!(plot_data(&profile, "srtm").len(), 3);
    }
}
