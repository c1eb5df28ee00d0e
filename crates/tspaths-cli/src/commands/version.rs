use miette::{IntoDiagnostic, Result};
use tspaths_core::version::version_string;
use tspaths_core::{SCHEMA_VERSION, VERSION};

pub fn run(json: bool) -> Result<()> {
    if json {
        let doc = serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "version": VERSION,
        });
        println!("{}", serde_json::to_string_pretty(&doc).into_diagnostic()?);
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
