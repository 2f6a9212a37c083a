//! Media Catalog CLI
//!
//! Inspect the albums and items of a media index database or a plain
//! directory tree.

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use media_catalog::{
    CatalogConfig, DirectorySource, MediaCatalog, MediaKind, MediaSource, MediaStore, ALL_GROUP,
};

/// On-device media catalog engine
#[derive(Parser)]
#[command(name = "media_catalog")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the catalog's media rows come from
#[derive(Args)]
struct SourceArgs {
    /// Path to a media index database
    #[arg(short = 'd', long, conflicts_with = "root")]
    db: Option<PathBuf>,

    /// Directory tree to catalog instead of a database
    #[arg(short = 'r', long)]
    root: Option<PathBuf>,

    /// Media kind view to query (all, image, video, gif)
    #[arg(short = 'k', long, default_value = "all", value_parser = parse_kind)]
    kind: MediaKind,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List album summaries for a media kind
    Albums {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the items of one album
    Items {
        #[command(flatten)]
        source: SourceArgs,

        /// Album name ("All" for everything of the kind)
        #[arg(short = 'a', long, default_value = ALL_GROUP)]
        album: String,
    },
}

fn parse_kind(s: &str) -> Result<MediaKind, String> {
    match s.to_lowercase().as_str() {
        "all" => Ok(MediaKind::All),
        "image" => Ok(MediaKind::Image),
        "video" => Ok(MediaKind::Video),
        "gif" | "animated" => Ok(MediaKind::AnimatedImage),
        other => Err(format!(
            "unknown kind '{}' (expected all, image, video or gif)",
            other
        )),
    }
}

fn build_catalog(args: &SourceArgs) -> Result<MediaCatalog, String> {
    let source: Arc<dyn MediaSource + Send + Sync> = match (&args.db, &args.root) {
        (Some(db), None) => Arc::new(
            MediaStore::open(db).map_err(|e| format!("cannot open {}: {}", db.display(), e))?,
        ),
        (None, Some(root)) => Arc::new(DirectorySource::new(root.clone())),
        _ => return Err("specify exactly one of --db or --root".to_string()),
    };

    let catalog = MediaCatalog::new(source, CatalogConfig::default());
    catalog
        .reload()
        .map_err(|e| format!("scan failed: {}", e))?;
    Ok(catalog)
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Albums { source } => {
            info!("listing albums, kind={}", source.kind);
            let catalog = build_catalog(&source)?;
            let summaries = catalog.group_summaries(source.kind);

            if source.json {
                let json = serde_json::to_string_pretty(&summaries)
                    .map_err(|e| e.to_string())?;
                println!("{}", json);
            } else {
                println!(
                    "{} albums ({}) as of {}",
                    summaries.len(),
                    source.kind,
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                );
                for s in &summaries {
                    let preview = s
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("  {:<24} {:>6}  {}", s.name, s.count, preview);
                }
            }
        }
        Commands::Items { source, album } => {
            info!("listing items, kind={} album={}", source.kind, album);
            let catalog = build_catalog(&source)?;
            let items = catalog.query_items(source.kind, &album);

            if source.json {
                let json =
                    serde_json::to_string_pretty(&items).map_err(|e| e.to_string())?;
                println!("{}", json);
            } else {
                println!("{} items in '{}' ({})", items.len(), album, source.kind);
                for item in &items {
                    let path = item
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(placeholder)".to_string());
                    println!("  [{}] {:>8}  {}", item.kind, item.duration, path);
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
