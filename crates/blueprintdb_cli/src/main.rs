//! Command-line access to a BlueprintDB document store.
//!
//! # Responsibility
//! - Inspect and manage stored diagrams without the editor UI.
//! - Expose edge geometry for quick checks against canvas output.

use blueprintdb_core::db::open_db;
use blueprintdb_core::{
    export_json, init_logging, render_marker_defs, resolve_edge_endpoints, DocumentRepository,
    DocumentService, DocumentServiceError, EdgeLayout, NodeBounds, Point, ShapeKind,
    SqliteKeyValueRepository, StoreConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

const DB_PATH_ENV: &str = "BLUEPRINTDB_DB_PATH";
const DEFAULT_DB_FILE: &str = "blueprintdb.sqlite3";

/// Manage BlueprintDB diagram documents
#[derive(Parser, Debug)]
#[command(name = "blueprintdb", version)]
#[command(about = "Manage BlueprintDB ER diagram documents", long_about = None)]
struct Args {
    /// Store database file (defaults to $BLUEPRINTDB_DB_PATH, then ./blueprintdb.sqlite3)
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// JSON file with store settings (namespace, untitled_prefix, autosave_debounce_ms)
    #[arg(long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check core linkage
    Ping,
    /// List stored documents, most recent first
    List,
    /// Write a document as {nodes, edges} JSON
    Export {
        name: String,
        /// Output file (defaults to <name>.json; "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a .json diagram file under its base name
    Import { file: PathBuf },
    /// Rename a stored document
    Rename { old_name: String, new_name: String },
    /// Delete a stored document
    Delete { name: String },
    /// Print the next free untitled name
    NextName,
    /// Resolve a straight connector between two nodes given as cx,cy,w,h[,shape]
    Route {
        #[arg(value_parser = parse_node)]
        source: NodeBounds,
        #[arg(value_parser = parse_node)]
        target: NodeBounds,
    },
    /// Print the SVG <defs> block for all edge markers
    Markers,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    if let Some(dir) = &args.log_dir {
        let dir = std::path::absolute(dir).map_err(|e| format!("Invalid log dir: {}", e))?;
        init_logging(blueprintdb_core::default_log_level(), &dir.to_string_lossy())?;
    }

    match args.command {
        Command::Ping => {
            println!("blueprintdb_core ping={}", blueprintdb_core::ping());
            println!("blueprintdb_core version={}", blueprintdb_core::core_version());
            Ok(())
        }
        Command::Route { source, target } => route(&source, &target),
        Command::Markers => {
            println!("{}", render_marker_defs());
            Ok(())
        }
        command => {
            let config = load_config(args.config.as_deref())?;
            let conn = open_db(resolve_db_path(args.db))
                .map_err(|e| format!("Failed to open store: {}", e))?;
            let store = SqliteKeyValueRepository::try_new(&conn)
                .map_err(|e| format!("Failed to open store: {}", e))?;
            run_store_command(command, store, config)
        }
    }
}

fn run_store_command(
    command: Command,
    store: SqliteKeyValueRepository<'_>,
    config: StoreConfig,
) -> Result<(), String> {
    let mut repo = DocumentRepository::try_new(store, &config).map_err(describe)?;

    match command {
        Command::List => {
            let listing = repo.list_all().map_err(describe)?;
            for item in &listing.items {
                println!("{}\t{}", item.display_date(), item.name);
            }
            if listing.skipped_count() > 0 {
                eprintln!(
                    "{} unreadable record(s) skipped: {}",
                    listing.skipped_count(),
                    listing.skipped.join(", ")
                );
            }
        }
        Command::Export { name, output } => {
            let record = repo.load(&name).map_err(describe)?;
            let json = export_json(&record.diagram)
                .map_err(|e| format!("Failed to export: {}", e))?;
            let output =
                output.unwrap_or_else(|| PathBuf::from(blueprintdb_core::export_file_name(&name)));
            if output.to_str() == Some("-") {
                println!("{json}");
            } else {
                std::fs::write(&output, json)
                    .map_err(|e| format!("Failed to write export: {}", e))?;
                eprintln!("Exported to: {}", output.display());
            }
        }
        Command::Import { file } => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or("Import path has no file name")?
                .to_string();
            let contents = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read import file: {}", e))?;
            let store = repo.into_store();
            let (mut service, _) =
                DocumentService::open_session(store, config).map_err(|e| e.user_message())?;
            let diagram = service
                .import(&file_name, &contents, Instant::now())
                .map_err(|e| e.user_message())?;
            service.save_current(&diagram).map_err(|e| e.user_message())?;
            eprintln!("Imported as: {}", service.current_name());
        }
        Command::Rename { old_name, new_name } => {
            repo.rename(&old_name, &new_name).map_err(describe)?;
            eprintln!("Renamed {old_name} -> {new_name}");
        }
        Command::Delete { name } => {
            repo.delete(&name).map_err(describe)?;
            eprintln!("Deleted {name}");
        }
        Command::NextName => {
            let name = repo
                .next_available_name(&config.untitled_prefix)
                .map_err(describe)?;
            println!("{name}");
        }
        Command::Ping | Command::Route { .. } | Command::Markers => {}
    }
    Ok(())
}

fn route(source: &NodeBounds, target: &NodeBounds) -> Result<(), String> {
    let endpoints = resolve_edge_endpoints(source, target).map_err(|e| e.to_string())?;
    let layout = EdgeLayout::from_endpoints(endpoints);
    println!("source=({},{})", endpoints.source.x, endpoints.source.y);
    println!("target=({},{})", endpoints.target.x, endpoints.target.y);
    println!("angle={}", endpoints.angle_degrees());
    println!("path={}", layout.path);
    Ok(())
}

fn describe(err: blueprintdb_core::DocumentError) -> String {
    DocumentServiceError::from(err).user_message()
}

fn load_config(path: Option<&Path>) -> Result<StoreConfig, String> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;
    let config = StoreConfig::from_json(&raw).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var(DB_PATH_ENV)
                .ok()
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

fn parse_node(raw: &str) -> Result<NodeBounds, String> {
    let parts = raw.split(',').map(str::trim).collect::<Vec<_>>();
    if !(4..=5).contains(&parts.len()) {
        return Err(format!("expected cx,cy,w,h[,shape], got `{raw}`"));
    }
    let mut numbers = [0.0_f64; 4];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("`{part}` is not a number"))?;
    }
    let shape = match parts.get(4).copied().unwrap_or("rectangle") {
        "rectangle" | "rect" => ShapeKind::Rectangle,
        "circle" => ShapeKind::Circle,
        "diamond" => ShapeKind::Diamond,
        other => return Err(format!("unsupported shape `{other}`")),
    };
    let [cx, cy, width, height] = numbers;
    Ok(NodeBounds::new(raw, Point::new(cx, cy), width, height, shape))
}
