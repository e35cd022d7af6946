//! Dispatch Explainer Binary
//!
//! Run with: `singledispatch-explain [OPTIONS] [MANIFEST]`

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use singledispatch_explain::{Explainer, Manifest};

#[derive(Parser)]
#[command(name = "singledispatch-explain")]
#[command(about = "Show how single-dispatch resolves each type of a hierarchy")]
#[command(version)]
struct Cli {
    /// Hierarchy manifest (TOML)
    #[arg(value_name = "MANIFEST")]
    manifest: Option<PathBuf>,

    /// Use the builtin hierarchy instead of the manifest's `[[type]]` entries
    #[arg(short, long)]
    builtins: bool,

    /// Only explain this type
    #[arg(short = 't', long = "type", value_name = "NAME")]
    ty: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let manifest = match &cli.manifest {
        Some(path) => Manifest::load(path)
            .with_context(|| format!("failed to load manifest {}", path.display()))?,
        None if cli.builtins => Manifest::default(),
        None => bail!("a manifest is required unless --builtins is given"),
    };
    debug!(
        types = manifest.types.len(),
        registrations = manifest.registrations.len(),
        "parsed manifest"
    );

    let explainer = if cli.builtins {
        if !manifest.types.is_empty() {
            warn!("ignoring [[type]] entries: --builtins is set");
        }
        Explainer::builtins(&manifest)
    } else {
        Explainer::from_manifest(&manifest)
    }
    .context("invalid dispatch setup")?;

    let report = match &cli.ty {
        Some(name) => explainer.render_type(name)?,
        None => explainer.render_all(),
    };
    print!("{report}");
    Ok(())
}
