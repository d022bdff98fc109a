//! Media Vault CLI
//!
//! Browse the media catalog from the terminal: categories, listings and
//! single-item details, as text or JSON.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use media_vault::{extract_metadata, CatalogConfig, LookupError, MediaScanner};

const ABOUT: &str = r#"
Media Vault - private media catalog

Examples:
  media_vault categories                          List categories with item counts
  media_vault list peliculas                      List the files of one category
  media_vault show peliculas "Matrix.mp4"         Show one file with its metadata
  media_vault --root /srv/media --json list musica
  media_vault --config vault.json categories      Load settings from a JSON file

The root can also be set with the MEDIA_VAULT_ROOT (or ROOT_MEDIA_PATH) environment variable.
"#;

/// Exit code for an unconfigured category
const EXIT_CATEGORY_NOT_FOUND: u8 = 2;
/// Exit code for a file that does not exist in the category
const EXIT_ITEM_NOT_FOUND: u8 = 3;

/// Private media catalog
#[derive(Parser)]
#[command(name = "media_vault")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Root directory holding the category folders
    #[arg(short = 'r', long, global = true)]
    root: Option<PathBuf>,

    /// Threads used to stat files (0 = auto)
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories whose folder exists, with item counts
    Categories,
    /// List the media files of one category
    List {
        /// Category key (e.g. peliculas)
        category: String,
    },
    /// Show one media file with its metadata
    Show {
        /// Category key (e.g. peliculas)
        category: String,
        /// Exact file name including extension
        filename: String,
    },
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match CatalogConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(threads) = cli.threads {
        config.num_threads = threads;
    }

    let Some(command) = cli.command else {
        println!("{}", ABOUT);
        println!("Run 'media_vault --help' for the full list of options");
        return ExitCode::SUCCESS;
    };

    info!("Root: {:?}", config.root);
    info!("Threads: {}", config.effective_threads());
    let scanner = MediaScanner::new(config);

    match command {
        Commands::Categories => print_categories(&scanner, cli.json),
        Commands::List { category } => print_listing(&scanner, &category, cli.json),
        Commands::Show { category, filename } => {
            print_details(&scanner, &category, &filename, cli.json)
        }
    }
}

fn print_categories(scanner: &MediaScanner, json: bool) -> ExitCode {
    let categories = scanner.list_categories();

    if json {
        let values: Vec<_> = categories.iter().map(|c| c.to_json()).collect();
        print_json(&serde_json::Value::Array(values));
    } else if categories.is_empty() {
        println!("No category folders found under {:?}", scanner.config().root);
    } else {
        for category in &categories {
            println!(
                "{:<12} {:<20} {:>6} items",
                category.name, category.display_name, category.item_count
            );
        }
    }
    ExitCode::SUCCESS
}

fn print_listing(scanner: &MediaScanner, category: &str, json: bool) -> ExitCode {
    let items = match scanner.list_media_items(category) {
        Ok(items) => items,
        Err(e) => return lookup_failed(e),
    };

    if json {
        let values: Vec<_> = items.iter().map(|item| item.to_json()).collect();
        print_json(&serde_json::Value::Array(values));
        return ExitCode::SUCCESS;
    }

    let display_name = scanner
        .config()
        .category(category)
        .map_or(category, |c| c.folder.as_str());
    println!("{} ({} items)", display_name, items.len());
    for item in &items {
        println!(
            "  {:<40} {:<9} {:>10.2} MB  {}",
            item.name,
            item.media_type.as_str(),
            item.file_size_mb(),
            item.modified_date.format("%Y-%m-%d %H:%M")
        );
    }
    ExitCode::SUCCESS
}

fn print_details(scanner: &MediaScanner, category: &str, filename: &str, json: bool) -> ExitCode {
    let item = match scanner.get_media_item_by_name(category, filename) {
        Ok(Some(item)) => item,
        Ok(None) => {
            eprintln!("Media file not found: {}", filename);
            return ExitCode::from(EXIT_ITEM_NOT_FOUND);
        }
        Err(e) => return lookup_failed(e),
    };
    let details = extract_metadata(&item);

    if json {
        print_json(&details.to_json());
        return ExitCode::SUCCESS;
    }

    println!("{}", item.name);
    println!("  Path:      {}", item.file_path.display());
    println!("  Type:      {}", item.media_type);
    println!("  Extension: {}", item.extension);
    println!(
        "  Size:      {} bytes ({} MB, {} GB)",
        item.file_size,
        item.file_size_mb(),
        item.file_size_gb()
    );
    println!("  Created:   {}", item.created_date.format("%Y-%m-%d %H:%M:%S"));
    println!("  Modified:  {}", item.modified_date.format("%Y-%m-%d %H:%M:%S"));
    if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(&details.extended_metadata) {
        for (key, value) in fields {
            let shown = if value.is_null() { "-".to_string() } else { value.to_string() };
            println!("  {:<10} {}", format!("{}:", key), shown);
        }
    }
    ExitCode::SUCCESS
}

fn lookup_failed(err: LookupError) -> ExitCode {
    eprintln!("{}", err);
    match err {
        LookupError::UnknownCategory(_) => ExitCode::from(EXIT_CATEGORY_NOT_FOUND),
        LookupError::InvalidFilename(_) => ExitCode::from(EXIT_ITEM_NOT_FOUND),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => log::error!("Failed to serialize output: {}", e),
    }
}
