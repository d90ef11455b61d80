use clap::{Parser, Subcommand, ValueEnum};
use landplot_formats::ExportFormat;
use std::path::PathBuf;

/// Landplot - Land-plot geometry measurement and exchange
#[derive(Parser, Debug)]
#[command(name = "landplot")]
#[command(about = "Measure land plots and convert them between GeoJSON, CSV, KML and Shapefile", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decimal separator for CSV numbers (',' or '.')
    #[arg(long, global = true, value_name = "SEP")]
    pub decimal_separator: Option<String>,

    /// Color for geometries without one (#rrggbb)
    #[arg(long, global = true, value_name = "COLOR")]
    pub default_color: Option<String>,

    /// Color given to imported geometries (#rrggbb)
    #[arg(long, global = true, value_name = "COLOR")]
    pub import_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print kind, area and length of every feature in a GeoJSON file
    Metrics(MetricsArgs),

    /// Export the features of a GeoJSON file as CSV, KML or zipped Shapefile
    Export(ExportArgs),

    /// Import a KML document or zipped Shapefile
    Import(ImportArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct MetricsArgs {
    /// GeoJSON file (FeatureCollection, Feature or bare geometry)
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// GeoJSON file (FeatureCollection, Feature or bare geometry)
    pub file: PathBuf,

    /// Output format
    #[arg(long, short)]
    pub format: FormatArg,

    /// Directory the exported files are written to
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Record name used for file names (overrides the feature's `name` property)
    #[arg(long)]
    pub name: Option<String>,
}

/// Export format selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Per-vertex coordinate table
    Csv,
    /// KML placemark
    Kml,
    /// Zipped Shapefile bundle
    Shp,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Kml => ExportFormat::Kml,
            FormatArg::Shp => ExportFormat::Shp,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// KML document, or a .zip holding a Shapefile
    pub file: PathBuf,
}
