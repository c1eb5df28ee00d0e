//! `tspaths resolve`: map specifiers through the project's `paths`.

use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tspaths_core::loader::ENV_PROJECT;
use tspaths_core::{process_env, Config, DiskFs, Registry, TokioFs, SCHEMA_VERSION};

/// Arguments of the resolve command after clap parsing.
#[derive(Debug)]
pub struct ResolveArgs {
    pub specifiers: Vec<String>,
    pub parent: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub main_fields: Vec<String>,
    pub use_async: bool,
    /// Rewrite mapped specifiers relative to `parent`.
    pub relative: bool,
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    schema_version: u32,
    config_file: Option<&'a Path>,
    absolute_base_url: &'a str,
    results: Vec<ResolveEntry>,
}

#[derive(Debug, Serialize)]
struct ResolveEntry {
    specifier: String,
    resolved: Option<String>,
}

pub fn run(config: &Config, args: ResolveArgs, json: bool) -> Result<()> {
    let project = config.project.as_ref().map(|p| p.to_string_lossy().into_owned());
    let env = |key: &str| {
        if key == ENV_PROJECT && project.is_some() {
            return project.clone();
        }
        process_env(key)
    };

    let mut registry = Registry::new(&config.cwd, None, &env)
        .into_diagnostic()?
        .ok_or_else(|| {
            miette!(
                "no tsconfig.json or jsconfig.json found from {}",
                config.cwd.display()
            )
        })?;
    if !args.extensions.is_empty() {
        registry = registry.with_extensions(normalize_extensions(&args.extensions));
    }
    if !args.main_fields.is_empty() {
        registry = registry.with_main_fields(args.main_fields.clone());
    }

    let parent = args.parent.as_ref().map(|p| config.cwd.join(p));
    let mode = match parent.as_deref() {
        Some(file) if args.relative => Mode::Relative(file),
        parent => Mode::Absolute(parent),
    };
    let results = if args.use_async {
        let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
        runtime.block_on(resolve_all_async(&mut registry, &args.specifiers, mode))?
    } else {
        resolve_all(&mut registry, &args.specifiers, mode)?
    };

    let primary = &registry.matchers()[0].config;
    if json {
        let output = ResolveOutput {
            schema_version: SCHEMA_VERSION,
            config_file: primary.config_file.as_deref(),
            absolute_base_url: &primary.absolute_base_url,
            results,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        print_human(&results, args.relative).into_diagnostic()?;
    }

    Ok(())
}

/// What to print for each specifier.
#[derive(Debug, Clone, Copy)]
enum Mode<'a> {
    /// The mapped absolute path, for an import from the optional parent.
    Absolute(Option<&'a Path>),
    /// A specifier relative to the importing file.
    Relative(&'a Path),
}

fn resolve_all(registry: &mut Registry<'_>, specifiers: &[String], mode: Mode<'_>) -> Result<Vec<ResolveEntry>> {
    specifiers
        .iter()
        .map(|specifier| {
            let resolved = match mode {
                Mode::Absolute(parent) => registry.resolve_request(specifier, parent, &DiskFs),
                Mode::Relative(parent) => registry.resolve_relative(specifier, parent, &DiskFs),
            }
            .into_diagnostic()?;
            Ok(ResolveEntry {
                specifier: specifier.clone(),
                resolved,
            })
        })
        .collect()
}

async fn resolve_all_async(
    registry: &mut Registry<'_>,
    specifiers: &[String],
    mode: Mode<'_>,
) -> Result<Vec<ResolveEntry>> {
    let mut results = Vec::with_capacity(specifiers.len());
    for specifier in specifiers {
        let resolved = match mode {
            Mode::Absolute(parent) => registry.resolve_request_async(specifier, parent, &TokioFs).await,
            Mode::Relative(parent) => registry.resolve_relative_async(specifier, parent, &TokioFs).await,
        }
        .into_diagnostic()?;
        results.push(ResolveEntry {
            specifier: specifier.clone(),
            resolved,
        });
    }
    Ok(results)
}

/// Accept `ts` as well as `.ts`.
fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{ext}")
            }
        })
        .collect()
}

fn print_human(results: &[ResolveEntry], relative: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for entry in results {
        match &entry.resolved {
            Some(path) => writeln!(out, "{} -> {path}", entry.specifier)?,
            None if relative => writeln!(out, "{}: unchanged", entry.specifier)?,
            None => writeln!(out, "{}: not found", entry.specifier)?,
        }
    }
    Ok(())
}
