#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;
use tspaths_core::Config;

#[derive(Parser, Debug)]
#[command(name = "tspaths")]
#[command(author, version, about = "Resolve module specifiers through tsconfig paths", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve specifiers through the project's path mappings
    Resolve {
        /// Specifiers to resolve, e.g. "@app/utils"
        #[arg(required = true)]
        specifiers: Vec<String>,

        /// Config file or directory to use instead of searching from the working directory
        #[arg(long, value_name = "PATH", env = "TS_NODE_PROJECT")]
        project: Option<PathBuf>,

        /// File the specifiers are imported from
        #[arg(long, value_name = "FILE")]
        parent: Option<PathBuf>,

        /// Extensions to probe, in order (comma separated)
        #[arg(long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// package.json fields naming a package entry, in order (comma separated)
        #[arg(long, value_delimiter = ',')]
        main_fields: Vec<String>,

        /// Probe the filesystem asynchronously
        #[arg(long = "async")]
        use_async: bool,

        /// Print each mapped specifier relative to the --parent file instead of as an absolute path
        #[arg(long, requires = "parent")]
        relative: bool,
    },

    /// Show the loaded path mapping configuration
    Config {
        /// Config file or directory to use instead of searching from the working directory
        #[arg(long, value_name = "PATH", env = "TS_NODE_PROJECT")]
        project: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Resolve {
            specifiers,
            project,
            parent,
            extensions,
            main_fields,
            use_async,
            relative,
        }) => {
            let config = config.with_project(project);
            let _span = tracing::info_span!("resolve", cwd = %config.cwd.display()).entered();
            commands::resolve::run(
                &config,
                commands::resolve::ResolveArgs {
                    specifiers,
                    parent,
                    extensions,
                    main_fields,
                    use_async,
                    relative,
                },
                cli.json,
            )
        }
        Some(Commands::Config { project }) => {
            let config = config.with_project(project);
            commands::config::run(&config, cli.json)
        }
    }
}
