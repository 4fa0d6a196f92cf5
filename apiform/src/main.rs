use std::path::Path;

use apiform_core::{
    codegen::{DiskWriter, GeneratorContext, MemoryWriter},
    config::ResolvedConfig,
    parse::Document,
    registry::Registry,
};
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

mod config;

use self::config::{Command, Main};

fn main() -> Result<()> {
    let Ok(main) = Main::parse().map_err(|err| err.exit());
    init_tracing(main.verbose);

    match main.command {
        Command::Generate(config) => {
            let registry = read_registry(&config.endpoints)?;
            let cx = GeneratorContext::new(&config, &registry)?;

            println!(
                "Endpoints: {} ({} provider)",
                registry.len(),
                config.provider.as_str()
            );
            let writer = DiskWriter::new(&config.output);
            println!("Writing generated code to `{}`...", writer.root().display());

            let report = apiform_codegen_typescript::generate(cx, &writer)?;
            for (kind, paths) in &report.iter().chunk_by(|&(kind, _)| kind) {
                println!(
                    "Generated {kind}: {}",
                    paths.map(|(_, path)| format!("`{}`", path.display())).join(", ")
                );
            }

            println!("Generation complete ({} files)", report.len());
        }
        Command::Check(config) => {
            let registry = read_registry(&config.endpoints)?;
            let cx = GeneratorContext::new(&config, &registry)?;

            let writer = MemoryWriter::new();
            apiform_codegen_typescript::generate(cx, &writer)?;
            let stale = stale_artifacts(&config, writer)?;
            if !stale.is_empty() {
                miette::bail!(
                    help = "run `apiform generate` to update them",
                    "{} generated file(s) in `{}` are out of date: {}",
                    stale.len(),
                    config.output.display(),
                    stale.iter().map(|path| format!("`{path}`")).join(", "),
                );
            }

            println!(
                "Generated code in `{}` is up to date",
                config.output.display()
            );
        }
    }

    Ok(())
}

/// Logs warnings by default; each `-v` raises the level. `RUST_LOG`
/// overrides both.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and validates the endpoint registry, as JSON if the file
/// ends in `.json`, or YAML otherwise.
fn read_registry(path: &Path) -> Result<Registry> {
    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .with_context(|| format!("Failed to read `{}`", path.display()))?;

    let doc = if path.extension().is_some_and(|ext| ext == "json") {
        Document::from_json(&source)
    } else {
        Document::from_yaml(&source)
    }
    .with_context(|| format!("Failed to parse `{}`", path.display()))?;

    let registry = Registry::from_doc(doc)
        .with_context(|| format!("Invalid endpoint registry in `{}`", path.display()))?;
    for conflict in registry.category_conflicts() {
        tracing::warn!(endpoint = conflict.endpoint, "{conflict}");
    }

    Ok(registry)
}

/// Returns the paths of rendered artifacts that are missing from
/// the output directory, or differ from what's there.
fn stale_artifacts(config: &ResolvedConfig, rendered: MemoryWriter) -> Result<Vec<String>> {
    let mut stale = vec![];
    for (path, text) in rendered.into_files() {
        let existing = config.output.join(&path);
        let matches = match std::fs::read_to_string(&existing) {
            Ok(contents) => contents == text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                return Err(err)
                    .into_diagnostic()
                    .with_context(|| format!("Failed to read `{}`", existing.display()));
            }
        };
        if !matches {
            tracing::info!(path = %existing.display(), "artifact is out of date");
            stale.push(path.display().to_string());
        }
    }
    Ok(stale)
}
