use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use catalog_seo_core::adapter::{CatalogServices, ObjectMetadataAdapter};
use catalog_seo_core::config::{
    config_path, load_config, read_config_file, set_config_key, write_config_file, AppConfig,
};
use catalog_seo_core::cover::DirCoverCache;
use catalog_seo_core::memory::MemoryCatalog;
use catalog_seo_core::report::ObjectReport;
use catalog_seo_core::urls::BaseUrlResolver;

#[derive(Parser)]
#[command(name = "catalog-seo")]
#[command(about = "Inspect structured-data metadata of library catalog objects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the metadata the adapter produces for one object
    Inspect {
        /// Catalog object id
        #[arg(required = true)]
        object_id: String,

        /// Catalog fixture (JSON)
        #[arg(long, required = true)]
        catalog: String,

        /// Cover cache directory (overrides config)
        #[arg(long)]
        covers: Option<String>,

        /// Site base URL (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Include work examples
        #[arg(long)]
        examples: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize default config file
    Init,
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Key (dot-separated path)
        key: String,
        /// Value
        value: String,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Inspect {
            object_id,
            catalog,
            covers,
            base_url,
            examples,
        } => run_inspect(
            object_id,
            catalog,
            covers.as_deref(),
            base_url.as_deref(),
            *examples,
            cli.json,
        ),
        Commands::Config { action } => run_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_inspect(
    object_id: &str,
    catalog_path: &str,
    covers: Option<&str>,
    base_url: Option<&str>,
    examples: bool,
    json: bool,
) -> CliResult {
    let mut cfg = load_config();
    if let Some(base) = base_url {
        cfg.site.base_url = base.to_string();
    }
    if let Some(root) = covers {
        cfg.covers.root = Some(root.to_string());
    }

    let catalog = Arc::new(MemoryCatalog::load(Path::new(catalog_path))?);
    tracing::debug!("Loaded catalog from {}", catalog_path);

    let services = CatalogServices {
        repository: catalog.clone(),
        urls: Arc::new(BaseUrlResolver::new(cfg.site.base_url.clone())),
        covers: Arc::new(DirCoverCache::new(cfg.covers_root(), cfg.covers_public_base())),
        cover_providers: Vec::new(),
        availability: catalog.clone(),
        config: Arc::new(cfg),
        libraries: catalog,
    };

    let adapter = ObjectMetadataAdapter::load(&services, object_id)?;
    let report = ObjectReport::collect(&adapter, examples)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, 0);
    }
    Ok(())
}

fn print_report(report: &ObjectReport, depth: usize) {
    let indent = "  ".repeat(depth);
    let show = |v: Option<&str>| v.unwrap_or("-").to_string();

    println!("{}Object:         {}", indent, report.id);
    println!("{}URL:            {}", indent, report.object_url);
    println!("{}Collection:     {}", indent, show(report.collection_url.as_deref()));
    println!("{}Name:           {}", indent, show(report.name.as_deref()));
    println!("{}Description:    {}", indent, show(report.description.as_deref()));
    println!("{}Edition:        {}", indent, show(report.book_edition.as_deref()));
    println!("{}Published:      {}", indent, show(report.date_published.as_deref()));
    println!("{}ISBN:           {}", indent, show(report.isbn.as_deref()));
    println!("{}Image:          {}", indent, show(report.image_url.as_deref()));
    match report.image_dimensions {
        Some((w, h)) => println!("{}Image size:     {}x{}", indent, w, h),
        None => println!("{}Image size:     -", indent),
    }
    println!("{}Borrowable:     {}", indent, report.has_borrow_action);
    println!("{}Lender library: {}", indent, show(report.lender_library.as_deref()));

    if !report.work_examples.is_empty() {
        println!("{}Work examples:", indent);
        for example in &report.work_examples {
            print_report(example, depth + 1);
        }
    }
}

fn run_config(action: &ConfigAction, json: bool) -> CliResult {
    let path = config_path().ok_or("Could not determine config directory")?;
    match action {
        ConfigAction::Init => {
            write_config_file(&path, &AppConfig::default())?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let cfg = load_config();
            let rendered = if json {
                serde_json::to_string_pretty(&cfg)?
            } else {
                toml::to_string_pretty(&cfg)?
            };
            println!("{}", rendered);
        }
        ConfigAction::Set { key, value } => {
            // A config that fails to parse is reported, never replaced by defaults.
            let mut cfg = if path.is_file() {
                read_config_file(&path)?
            } else {
                AppConfig::default()
            };
            set_config_key(&mut cfg, key, value)?;
            write_config_file(&path, &cfg)?;
            tracing::debug!("Set {} in {}", key, path.display());
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}
