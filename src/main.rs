use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};

use xsection::desc::{SectionDesc, parse_section_json};
use xsection::raster::Raster;
use xsection::{
    Aggregator, CrossSection, FieldSource, IndicatorPoint, Profile, ProfileSet, position_indicator,
};

#[derive(Parser, Debug)]
#[command(name = "xsection")]
#[command(about = "Sample a field along cross-section paths and print the profiles as JSON")]
struct Cli {
    /// Section description (JSON)
    desc: PathBuf,

    /// Sample spacing along each path, overrides the description
    #[arg(long)]
    resolution: Option<f64>,

    /// Per-cell aggregator: mean, sum, max, min, count, first, last
    #[arg(long)]
    aggregator: Option<Aggregator>,

    /// Channel to sample, overrides the description
    #[arg(long)]
    value_dim: Option<String>,

    /// Also report the point at this distance along every profile
    #[arg(long)]
    at: Option<f64>,

    /// Write each working raster as a 16-bit PNG into this directory
    #[arg(long)]
    dump_rasters: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct PathReport<'a> {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<&'a Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    epsg: u32,
    projection: String,
    resolution: f64,
    aggregator: Aggregator,
    result_labels: Vec<String>,
    paths: Vec<PathReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicator: Option<Vec<IndicatorPoint>>,
}

fn run(cli: Cli) -> xsection::Result<()> {
    let text = std::fs::read_to_string(&cli.desc)?;
    let mut desc = parse_section_json(&text)?;

    if let Some(r) = cli.resolution {
        desc.resolution = r;
    }
    if let Some(a) = cli.aggregator {
        desc.aggregator = a;
    }
    if let Some(name) = &cli.value_dim {
        desc.field.channels_mut().select(name)?;
    }
    info!(
        field = desc.field.kind(),
        value_dim = desc.field.first_value_dimension().unwrap_or("-"),
        paths = desc.paths.len(),
        resolution = desc.resolution,
        aggregator = %desc.aggregator,
        projection = %desc.projection,
        "sampling"
    );

    if let Some(dir) = &cli.dump_rasters {
        std::fs::create_dir_all(dir)?;
    }

    let xs = desc.cross_section()?;
    let profiles = sample_all(&desc, &xs, cli.dump_rasters.as_deref());

    let report = Report {
        epsg: desc.projection.epsg(),
        projection: desc.projection.to_string(),
        resolution: desc.resolution,
        aggregator: desc.aggregator,
        result_labels: desc.field.channels().result_labels(),
        paths: profiles
            .iter()
            .map(|(&index, res)| match res {
                Ok(p) => PathReport {
                    index,
                    profile: Some(p),
                    error: None,
                },
                Err(e) => PathReport {
                    index,
                    profile: None,
                    error: Some(e.to_string()),
                },
            })
            .collect(),
        indicator: cli.at.map(|d| position_indicator(&profiles, d)),
    };

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");
    Ok(())
}

/// Samples every path, dumping each working raster into `dump_dir` when set.
/// A failed dump is logged and does not affect the profile.
fn sample_all(desc: &SectionDesc, xs: &CrossSection, dump_dir: Option<&Path>) -> ProfileSet {
    let mut profiles = ProfileSet::new();
    for (i, path) in desc.paths.iter().enumerate() {
        let res = match xs.section(&desc.field, path, &desc.aggregator) {
            Ok(section) => {
                if let (Some(dir), Some(raster)) = (dump_dir, &section.raster) {
                    let png = dir.join(format!("path_{i}.png"));
                    if let Err(e) = dump_raster(raster, &png) {
                        warn!(path = i, "could not write {}: {e}", png.display());
                    }
                }
                Ok(section.profile)
            }
            Err(e) => {
                warn!(path = i, "cross section failed: {e}");
                Err(e)
            }
        };
        profiles.insert(i, res);
    }
    profiles
}

#[cfg(feature = "im-io")]
fn dump_raster(raster: &Raster, path: &Path) -> xsection::Result<()> {
    raster.values.save_png(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(not(feature = "im-io"))]
fn dump_raster(_raster: &Raster, path: &Path) -> xsection::Result<()> {
    warn!("built without im-io, skipping {}", path.display());
    Ok(())
}

fn main() {
    xsection::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESC: &str = r#"
    {
        "version": 1,
        "resolution": 10,
        "paths": [
            [0,0, 50,0, 50,20],
            [],
            [10,10, 40,10, 40,30]
        ],
        "field": {
            "kind": "grid",
            "x_range": [0, 100],
            "y_range": [0, 100],
            "w": 10,
            "h": 10,
            "channels": [ { "name": "z", "values": [
                0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9,
                0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9,
                0,1,2,3,4,5,6,7,8,9, 0,1,2,3,4,5,6,7,8,9
            ] } ]
        }
    }
    "#;

    #[test]
    fn unwritable_dump_dir_keeps_every_profile() {
        let desc = parse_section_json(DESC).unwrap();
        let xs = desc.cross_section().unwrap();
        let missing = std::env::temp_dir()
            .join(format!("xsection-no-such-dir-{}", process::id()))
            .join("nested");

        let profiles = sample_all(&desc, &xs, Some(missing.as_path()));
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[&0].as_ref().unwrap().len(), 8);
        assert!(matches!(profiles[&1], Err(xsection::Error::InvalidArgument(_))));
        assert_eq!(profiles[&2].as_ref().unwrap().len(), 6);
        assert!(!missing.exists());
    }

    #[test]
    fn without_dump_dir_matches_library_sampling() {
        let desc = parse_section_json(DESC).unwrap();
        let xs = desc.cross_section().unwrap();
        let ours = sample_all(&desc, &xs, None);
        let lib = xs.sample_paths(&desc.field, desc.paths.iter(), &desc.aggregator);
        assert_eq!(ours.len(), lib.len());
        for (i, res) in &lib {
            match res {
                Ok(p) => assert_eq!(ours[i].as_ref().unwrap(), p),
                Err(_) => assert!(ours[i].is_err()),
            }
        }
    }
}
