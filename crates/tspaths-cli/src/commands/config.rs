//! `tspaths config`: show the configuration the resolver would use.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use tspaths_core::resolver::MappingEntry;
use tspaths_core::{load_config, process_env, Config, LoadedConfig, SCHEMA_VERSION};

#[derive(Debug, Serialize)]
struct ConfigOutput<'a> {
    schema_version: u32,
    #[serde(flatten)]
    config: &'a LoadedConfig,
    entries: &'a [MappingEntry],
}

pub fn run(config: &Config, json: bool) -> Result<()> {
    let loaded = load_config(&config.cwd, config.project.as_deref(), &process_env).into_diagnostic()?;
    let matcher = loaded.matcher();

    if json {
        let output = ConfigOutput {
            schema_version: SCHEMA_VERSION,
            config: &loaded,
            entries: matcher.entries(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        print_human(&loaded, matcher.entries()).into_diagnostic()?;
    }
    Ok(())
}

fn print_human(loaded: &LoadedConfig, entries: &[MappingEntry]) -> io::Result<()> {
    let mut out = io::stdout().lock();

    match &loaded.config_file {
        Some(file) => writeln!(out, "Config file:       {}", file.display())?,
        None => writeln!(out, "Config file:       (explicit)")?,
    }
    writeln!(out, "baseUrl:           {}", loaded.base_url.as_deref().unwrap_or("(not set)"))?;
    writeln!(out, "Absolute baseUrl:  {}", loaded.absolute_base_url)?;
    writeln!(out, "Main fields:       {}", loaded.main_fields.join(", "))?;
    writeln!(out, "Match all:         {}", loaded.add_match_all)?;
    writeln!(out)?;

    if entries.is_empty() {
        writeln!(out, "No path mappings.")?;
        return Ok(());
    }
    writeln!(out, "Mappings (most specific first):")?;
    for entry in entries {
        writeln!(out, "  {} -> {}", entry.pattern, entry.targets.join(", "))?;
    }
    Ok(())
}
