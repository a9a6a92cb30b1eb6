mod annotations;
mod app;
mod content;
mod error;
mod graph;
mod layout;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use annotations::{LayoutDirection, ShakeTowards};

#[derive(Debug, Parser)]
#[command(author, version, about = "Interactive viewer for cross-referenced annotations")]
struct Args {
    /// Annotation document (JSON, optionally wrapped in `const annotationsJSON = ...;`).
    document: PathBuf,

    /// Override the document's layout direction.
    #[arg(long, value_enum)]
    dir: Option<LayoutDirection>,

    /// Override which end of the hierarchy anchors the layout.
    #[arg(long, value_enum)]
    shake: Option<ShakeTowards>,

    /// Refuse to open documents that fail validation.
    #[arg(long)]
    strict: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LECT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet)?;

    let document = annotations::read_document(&args.document, args.strict)
        .with_context(|| format!("failed to open {}", args.document.display()))?;

    let settings = app::ViewerSettings {
        document_path: args.document,
        direction: args.dir,
        shake: args.shake,
        strict: args.strict,
    };
    info!(path = %settings.document_path.display(), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "lect",
        options,
        Box::new(move |cc| Ok(Box::new(app::LectViewerApp::new(cc, document, settings)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer exited with an error: {error}"))
}
