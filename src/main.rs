use anyhow::{Context, Result};
use chocolate_map::{audit, import_csv, load_view, logging, Catalog, MapConfig, Severity};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chocolate-map", version, about = "🍫 Chocolate shop map")]
struct Cli {
    /// Map config (TOML)
    #[arg(long, global = true, env = "CHOCO_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Shop catalog (JSON) instead of the embedded one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the map in the terminal (default)
    Ui,
    /// Write the standalone map page
    Export {
        #[arg(short, long, default_value = "index.html")]
        out: PathBuf,
    },
    /// Audit the catalog for data-quality problems
    Check,
    /// Convert a CSV spreadsheet into a catalog JSON file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(short, long, default_value = "data/shops.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let config = cli.config.as_deref();
    let catalog = cli.catalog.as_deref();

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => run_ui_mode(config, catalog),
        Command::Export { out } => run_export(config, catalog, &out),
        Command::Check => run_check(config, catalog),
        Command::Import { csv, out } => run_import(&csv, &out),
    }
}

fn run_export(config: Option<&Path>, catalog: Option<&Path>, out: &Path) -> Result<()> {
    let view = load_view(config, catalog).context("Failed to load map view")?;
    view.export(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!("🗺️  Exported {} markers → {}", view.markers().len(), out.display());
    Ok(())
}

fn run_check(config: Option<&Path>, catalog: Option<&Path>) -> Result<()> {
    let config = MapConfig::load_or_default(config).context("Failed to load config")?;
    let catalog_path = catalog.or(config.catalog.path.as_deref());
    let catalog = Catalog::open(catalog_path).context("Failed to load catalog")?;

    println!("🔍 Auditing catalog...");
    let report = audit(&catalog);

    for issue in &report.issues {
        let icon = match issue.severity {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️ ",
            Severity::Info => "ℹ️ ",
        };
        println!(
            "{} [{}] #{} {} ({}): {}",
            icon,
            issue.severity.as_str(),
            issue.index,
            issue.shop,
            issue.field,
            issue.message
        );
    }

    println!("\n{}", report.summary());
    if report.has_critical_issues() {
        eprintln!("❌ Catalog has critical issues");
        std::process::exit(1);
    }

    println!("✅ Catalog OK");
    Ok(())
}

fn run_import(csv: &Path, out: &Path) -> Result<()> {
    println!("📥 Importing {}...", csv.display());
    let catalog = import_csv(csv, out)
        .with_context(|| format!("Failed to import {}", csv.display()))?;

    println!("✓ Wrote {} shops → {}", catalog.len(), out.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: Option<&Path>, catalog: Option<&Path>) -> Result<()> {
    let view = load_view(config, catalog).context("Failed to load map view")?;

    let mut app = chocolate_map::ui::App::new(view);
    chocolate_map::ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: Option<&Path>, _catalog: Option<&Path>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or export the web page: chocolate-map export");
    std::process::exit(1);
}
