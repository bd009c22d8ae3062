//! # timber-quote
//!
//! Command-line quotes for oak-frame garages, gazebos and porches, oak beams
//! and oak flooring.
//!
//! # Usage
//!
//! ```bash
//! # Quote a two-bay garage with 7x7 beams
//! timber-quote quote garages --set bays=2 --set beamSize=7x7
//!
//! # Same, as JSON, for three units
//! timber-quote quote garages --set bays=2 --quantity 3 --json
//!
//! # Price a kiln dried beam (cm)
//! timber-quote beam 200 15 15 --oak kilned
//!
//! # Price 12.5 m2 of reclaimed flooring
//! timber-quote floor --area 12.5 --oak reclaimed
//!
//! # Print the schema a configurator would use
//! timber-quote schema gazebos
//!
//! # Write the built-in catalog so it can be edited and passed to --catalog
//! timber-quote export-catalog catalog.json
//! ```
//!
//! Set `RUST_LOG=pricing_core=debug` to see dropped selections and fallbacks.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricing_core::catalog::{Catalog, SchemaResolver};
use pricing_core::errors::{PriceError, PriceResult};
use pricing_core::file_io::{load_catalog, DocumentDirectory};
use tracing::info;

mod commands;

#[derive(Parser)]
#[command(name = "timber-quote")]
#[command(author, version, about = "Price quotes for oak-frame structures and timber")]
struct Cli {
    /// Catalog file to price from (defaults to the built-in catalog)
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Directory of stored configurator documents (<category>.json)
    #[arg(long, global = true, value_name = "DIR")]
    documents: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a configurable structure (garages, gazebos, porches)
    Quote {
        /// Product category
        category: String,

        /// Option selection, repeatable (e.g. --set bays=2 --set catSlide=yes).
        /// Ids the schema does not know are ignored.
        #[arg(long = "set", value_name = "ID=VALUE")]
        assignments: Vec<String>,

        /// JSON file with a selection object, applied before --set
        #[arg(long, value_name = "FILE")]
        selection: Option<PathBuf>,

        /// Number of units
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Price one oak beam by volume
    Beam {
        /// Length in cm
        length: String,
        /// Width in cm
        width: String,
        /// Thickness in cm
        thickness: String,

        /// Oak type (green, kilned, reclaimed)
        #[arg(long, default_value = "green")]
        oak: String,

        /// Number of identical pieces
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        json: bool,
    },
    /// Price oak flooring by area
    Floor {
        /// Area in m2 (takes precedence over length and width)
        #[arg(long)]
        area: Option<String>,
        /// Room length in cm
        #[arg(long)]
        length: Option<String>,
        /// Room width in cm
        #[arg(long)]
        width: Option<String>,

        /// Oak type (kilned, reclaimed)
        #[arg(long, default_value = "kilned")]
        oak: String,

        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration schema as JSON
    Schema {
        /// Product category
        category: String,
    },
    /// Write the catalog in use (built-in unless --catalog is given) to a file
    ExportCatalog {
        /// Destination path
        path: PathBuf,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pricing_core=info,timber_quote=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> PriceResult<()> {
    let resolver = build_resolver(cli.catalog, cli.documents)?;

    match cli.command {
        Commands::Quote {
            category,
            assignments,
            selection,
            quantity,
            json,
        } => {
            let report = commands::build_quote(&resolver, &category, &assignments, selection.as_deref(), quantity)?;
            if json {
                print_json(&report)?;
            } else {
                commands::print_quote(&report);
            }
        }
        Commands::Beam {
            length,
            width,
            thickness,
            oak,
            quantity,
            json,
        } => {
            let line = commands::price_beam(&resolver, [length.as_str(), width.as_str(), thickness.as_str()], &oak, quantity)?;
            if json {
                print_json(&line)?;
            } else {
                commands::print_line(&line);
            }
        }
        Commands::Floor {
            area,
            length,
            width,
            oak,
            json,
        } => {
            let line = commands::price_floor(
                &resolver,
                area.as_deref().unwrap_or(""),
                length.as_deref().unwrap_or(""),
                width.as_deref().unwrap_or(""),
                &oak,
            )?;
            if json {
                print_json(&line)?;
            } else {
                commands::print_line(&line);
            }
        }
        Commands::Schema { category } => {
            let (category, resolved) = commands::resolve_schema(&resolver, &category)?;
            info!(category = category.slug(), origin = ?resolved.origin, "resolved schema");
            print_json(&resolved.schema)?;
        }
        Commands::ExportCatalog { path } => {
            pricing_core::file_io::save_catalog(resolver.fallback(), &path)?;
            info!(path = %path.display(), "catalog written");
        }
    }
    Ok(())
}

fn build_resolver(catalog: Option<PathBuf>, documents: Option<PathBuf>) -> PriceResult<SchemaResolver> {
    let catalog = match catalog {
        Some(path) => {
            let loaded = load_catalog(&path)?;
            info!(path = %path.display(), "loaded catalog");
            loaded
        }
        None => Catalog::fallback(),
    };

    let resolver = SchemaResolver::new(catalog);
    Ok(match documents {
        Some(dir) => resolver.with_store(DocumentDirectory::new(dir)),
        None => resolver,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> PriceResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(PriceError::from)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_quote_arguments() {
        let cli = Cli::try_parse_from([
            "timber-quote",
            "quote",
            "garages",
            "--set",
            "bays=2",
            "--set",
            "beamSize=7x7",
            "--quantity",
            "-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Quote {
                category,
                assignments,
                quantity,
                json,
                ..
            } => {
                assert_eq!(category, "garages");
                assert_eq!(assignments, vec!["bays=2", "beamSize=7x7"]);
                assert_eq!(quantity, -1);
                assert!(!json);
            }
            _ => panic!("expected quote command"),
        }
    }

    #[test]
    fn test_global_catalog_flag() {
        let cli = Cli::try_parse_from(["timber-quote", "schema", "porches", "--catalog", "prices.json"]).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("prices.json")));
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let err = build_resolver(Some(PathBuf::from("/no/such/catalog.json")), None)
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
