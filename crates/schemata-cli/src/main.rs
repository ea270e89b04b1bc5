//! Schemata CLI — search the JSON Schema catalog from the terminal

mod host;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::{ArgAction, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use schemata::actions::schema_snippet;
use schemata::catalog::{fetch_or_empty, CatalogEntry, CatalogSource, SchemaStoreCatalog};
use schemata::data::{cache_dir, FavoritesStore, KeyValueStore, Settings};
use schemata::notice::LogNotifier;
use schemata::view::ListView;
use schemata::{Result, SchemataError};

use crate::host::SystemHost;

#[derive(Parser, Debug)]
#[command(name = "schemata", about = "Search the JSON Schema catalog", version)]
struct Cli {
    /// Catalog document to fetch instead of the configured one
    #[arg(long, global = true, value_name = "URL")]
    catalog_url: Option<String>,

    /// Directory holding favorites and settings
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print catalog entries matching a query
    Search {
        /// Matched against name, description and file patterns
        query: Option<String>,
    },
    /// Print metadata for one schema
    Show { url: String },
    /// Print the `$schema` property for a schema URL
    Snippet { url: String },
    /// Manage favorite schemas
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorites by name
    List,
    /// Add a catalog entry to favorites
    Add { url: String },
    /// Remove a favorite
    Remove { url: String },
    /// Add or remove, depending on current state
    Toggle { url: String },
}

const LOG_FILE_NAME: &str = "schemata.log";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.command.is_none());

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over `-v`. The interactive list owns the terminal, so
/// it logs to `<cache dir>/schemata/schemata.log` instead of stderr.
fn init_logging(verbose: u8, to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let log_file = if to_file { open_log_file() } else { None };
    let result = match log_file {
        Some(file) => builder.with_writer(Mutex::new(file)).with_ansi(false).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(e) = result {
        eprintln!("Logging unavailable: {e}");
    }
}

fn open_log_file() -> Option<fs::File> {
    open_log_file_in(&cache_dir().ok()?)
}

/// Each interactive session starts a fresh log
fn open_log_file_in(dir: &Path) -> Option<fs::File> {
    fs::create_dir_all(dir).ok()?;
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dir.join(LOG_FILE_NAME))
        .ok()
}

fn run(cli: Cli) -> Result<()> {
    let store = match &cli.data_dir {
        Some(dir) => KeyValueStore::with_dir(dir),
        None => KeyValueStore::open_default()?,
    };
    let settings = Settings::load(&store).unwrap_or_else(|e| {
        warn!(error = %e, "settings unreadable, using defaults");
        Settings::default()
    });
    let catalog_url = cli
        .catalog_url
        .clone()
        .unwrap_or_else(|| settings.catalog_url.clone());
    let source = SchemaStoreCatalog::with_url(catalog_url)?;
    let favorites = FavoritesStore::new(store.clone());

    match cli.command {
        None => {
            let app = tui::App::new(Arc::new(source), store, settings, SystemHost::new());
            if let Some(snippet) = tui::run(app)? {
                println!("{snippet}");
            }
        }
        Some(Command::Search { query }) => {
            let results = fetch_or_empty(&source, &LogNotifier);
            let map = favorites.get();
            let view = ListView::build(&map, &results, query.as_deref().unwrap_or(""));
            for (_, row) in view.iter() {
                println!("{}", search_line(row.entry, row.is_favorite));
            }
        }
        Some(Command::Show { url }) => {
            let map = favorites.get();
            let entry = match map.get(&url) {
                Some(entry) => entry.clone(),
                None => find_entry(&source, &url)?,
            };
            print!("{}", describe(&entry, map.contains_key(&url)));
        }
        Some(Command::Snippet { url }) => println!("{}", schema_snippet(&url)),
        Some(Command::Favorites { action }) => run_favorites(action, &favorites, &source)?,
    }
    Ok(())
}

fn run_favorites(
    action: FavoritesCommand,
    favorites: &FavoritesStore,
    source: &dyn CatalogSource,
) -> Result<()> {
    match action {
        FavoritesCommand::List => {
            let map = favorites.get();
            let view = ListView::build(&map, &[], "");
            for (_, row) in view.iter() {
                println!("{}", search_line(row.entry, false));
            }
        }
        FavoritesCommand::Add { url } => {
            let entry = find_entry(source, &url)?;
            favorites.add(&entry)?;
            eprintln!("Added {} to favorites", entry.name);
        }
        FavoritesCommand::Remove { url } => match favorites.remove(&url)? {
            Some(entry) => eprintln!("Removed {} from favorites", entry.name),
            None => return Err(SchemataError::NotFound(format!("{url} is not a favorite"))),
        },
        FavoritesCommand::Toggle { url } => {
            let entry = match favorites.get().remove(&url) {
                Some(entry) => entry,
                None => find_entry(source, &url)?,
            };
            let title = if favorites.toggle(&entry)? {
                "Added to favorites"
            } else {
                "Removed from favorites"
            };
            eprintln!("{title}: {}", entry.name);
        }
    }
    Ok(())
}

/// Look up a catalog entry by its URL
fn find_entry(source: &dyn CatalogSource, url: &str) -> Result<CatalogEntry> {
    fetch_or_empty(source, &LogNotifier)
        .into_iter()
        .find(|entry| entry.url == url)
        .ok_or_else(|| SchemataError::NotFound(format!("no schema with URL {url}")))
}

fn search_line(entry: &CatalogEntry, is_favorite: bool) -> String {
    let star = if is_favorite { "★ " } else { "" };
    format!("{star}{}\t{}", entry.name, entry.url)
}

fn describe(entry: &CatalogEntry, is_favorite: bool) -> String {
    let mut out = format!("{}\n", entry.name);
    if !entry.description.is_empty() {
        out.push_str(&format!("  {}\n", entry.description));
    }
    out.push_str(&format!("  URL:        {}\n", entry.url));
    let patterns = entry.file_patterns();
    if !patterns.is_empty() {
        out.push_str(&format!("  File match: {}\n", patterns.join(", ")));
    }
    if let Some(versions) = &entry.versions {
        out.push_str("  Versions:\n");
        for (label, url) in versions {
            out.push_str(&format!("    {label}  {url}\n"));
        }
    }
    if is_favorite {
        out.push_str("  Favorite:   ★\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    const CATALOG: &str = r#"{"schemas": [
        {"name": "Cargo.toml", "url": "https://json.schemastore.org/cargo.json"},
        {"name": "tsconfig.json", "url": "https://json.schemastore.org/tsconfig.json"}
    ]}"#;

    fn temp_path(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = temp_dir().join(format!("schemata_main_test_{}_{}_{}", std::process::id(), id, name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    /// Serve `CATALOG` to a single request
    fn catalog_once() -> SchemaStoreCatalog {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{CATALOG}",
                    CATALOG.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        SchemaStoreCatalog::with_url(format!("http://{addr}/catalog.json")).unwrap()
    }

    fn unreachable_catalog() -> SchemaStoreCatalog {
        SchemaStoreCatalog::with_url("http://127.0.0.1:1/catalog.json").unwrap()
    }

    fn favorites_in(dir: &Path) -> FavoritesStore {
        FavoritesStore::new(KeyValueStore::with_dir(dir))
    }

    #[test]
    fn test_favorites_add_from_catalog() {
        let dir = temp_path("add");
        let favorites = favorites_in(&dir);
        let url = "https://json.schemastore.org/tsconfig.json".to_string();
        run_favorites(FavoritesCommand::Add { url: url.clone() }, &favorites, &catalog_once())
            .unwrap();
        assert_eq!(favorites.get()[&url].name, "tsconfig.json");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_favorites_add_unknown_url() {
        let dir = temp_path("add_unknown");
        let favorites = favorites_in(&dir);
        let err = run_favorites(
            FavoritesCommand::Add { url: "https://x.test/missing.json".into() },
            &favorites,
            &catalog_once(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemataError::NotFound(_)));
        assert!(favorites.get().is_empty());
    }

    #[test]
    fn test_favorites_remove_non_favorite() {
        let dir = temp_path("remove_missing");
        let favorites = favorites_in(&dir);
        let err = run_favorites(
            FavoritesCommand::Remove { url: "https://json.schemastore.org/cargo.json".into() },
            &favorites,
            &unreachable_catalog(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemataError::NotFound(_)));
    }

    #[test]
    fn test_favorites_toggle_adds_then_removes() {
        let dir = temp_path("toggle");
        let favorites = favorites_in(&dir);
        let url = "https://json.schemastore.org/cargo.json".to_string();

        run_favorites(FavoritesCommand::Toggle { url: url.clone() }, &favorites, &catalog_once())
            .unwrap();
        assert!(favorites.contains(&url));

        // Removing needs no catalog
        run_favorites(FavoritesCommand::Toggle { url: url.clone() }, &favorites, &unreachable_catalog())
            .unwrap();
        assert!(!favorites.contains(&url));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_log_file_truncated_per_session() {
        let dir = temp_path("log");
        let mut first = open_log_file_in(&dir).unwrap();
        first.write_all(b"previous session\n").unwrap();
        drop(first);

        let _second = open_log_file_in(&dir).unwrap();
        assert_eq!(fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap(), "");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_default_is_interactive() {
        let cli = Cli::try_parse_from(["schemata"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "schemata",
            "search",
            "tsconfig",
            "--catalog-url",
            "http://127.0.0.1:1/catalog.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.catalog_url.as_deref(), Some("http://127.0.0.1:1/catalog.json"));
        assert!(matches!(cli.command, Some(Command::Search { query: Some(q) }) if q == "tsconfig"));
    }

    #[test]
    fn test_favorites_subcommands() {
        let cli = Cli::try_parse_from(["schemata", "favorites", "toggle", "https://x.test/a.json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Favorites { action: FavoritesCommand::Toggle { url } }) if url == "https://x.test/a.json"
        ));
        assert!(Cli::try_parse_from(["schemata", "favorites", "add"]).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(5), "debug");
    }

    #[test]
    fn test_search_line() {
        let entry = CatalogEntry::new("tsconfig.json", "https://json.schemastore.org/tsconfig.json");
        assert_eq!(
            search_line(&entry, true),
            "★ tsconfig.json\thttps://json.schemastore.org/tsconfig.json"
        );
        assert!(search_line(&entry, false).starts_with("tsconfig.json\t"));
    }

    #[test]
    fn test_describe() {
        let entry = CatalogEntry::new("Cargo.toml", "https://json.schemastore.org/cargo.json")
            .with_description("Rust package manifest")
            .with_file_match("Cargo.toml")
            .with_version("0.1", "https://json.schemastore.org/cargo-0.1.json");
        let text = describe(&entry, false);
        assert!(text.starts_with("Cargo.toml\n  Rust package manifest\n"));
        assert!(text.contains("File match: Cargo.toml"));
        assert!(text.contains("0.1  https://json.schemastore.org/cargo-0.1.json"));
        assert!(!text.contains('★'));
    }

    #[test]
    fn test_find_entry_not_found_on_fetch_failure() {
        let source = SchemaStoreCatalog::with_url("http://127.0.0.1:1/catalog.json").unwrap();
        let err = find_entry(&source, "https://x.test/a.json").unwrap_err();
        assert!(matches!(err, SchemataError::NotFound(_)));
    }
}
