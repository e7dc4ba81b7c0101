//! Script Filter CLI
//!
//! Developer tooling for extension scripts: inspect the host environment and
//! reformat result documents. Logs go to stderr so stdout stays a clean JSON
//! stream for the host.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use script_filter_schemas::config::EnvironmentConfig;
use script_filter_schemas::{
    Action, FilterItemIcon, ItemFields, ItemText, ItemType, Modifier, OutputFormat,
    ScriptEnvironmentVariables, ScriptFilter, ScriptFilterConfig, ScriptFilterItem,
    ScriptFilterItemAction, SchemaError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "script-filter")]
#[command(about = "Inspect script filter environments and documents")]
#[command(version)]
struct Cli {
    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, global = true, value_enum)]
    format: Option<FormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pretty,
    Compact,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pretty => OutputFormat::Pretty,
            FormatArg::Compact => OutputFormat::Compact,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the host environment of this process as JSON
    Env,

    /// Read a result document and print it in the chosen format
    Fmt {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Print a sample result document using every field
    Example,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.as_deref().and_then(|p| p.to_str());
    let config = ScriptFilterConfig::load_from(config_path)?;
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    match cli.command {
        Commands::Env => {
            let text = match read_host_env(std::env::vars(), &config.environment)? {
                Some(env) => format.to_json(&env)?,
                None => "null".to_string(),
            };
            println!("{}", text);
            Ok(())
        }

        Commands::Fmt { file } => {
            let text = match &file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let filter = ScriptFilter::from_json(&text)?;
            info!(items = filter.items.len(), "parsed document");
            filter.write_to(io::stdout().lock(), format)?;
            Ok(())
        }

        Commands::Example => {
            example().write_to(io::stdout().lock(), format)?;
            Ok(())
        }
    }
}

/// Read the host environment from `vars`.
///
/// `None` when a required variable is missing and the config tolerates
/// running outside the host.
fn read_host_env<I, K, V>(
    vars: I,
    config: &EnvironmentConfig,
) -> Result<Option<ScriptEnvironmentVariables>, SchemaError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let env = match ScriptEnvironmentVariables::from_vars(vars) {
        Ok(env) => env,
        Err(SchemaError::MissingVariable { name }) if !config.require_host => {
            warn!(%name, "not running under the host");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if let Some(storage) = env.bundle_storage() {
        info!(bundle_id = storage.bundle_id, "extension has a bundle id");
    }
    Ok(Some(env))
}

fn example() -> ScriptFilter {
    let desktop = ItemFields::new("Desktop")
        .with_uid("desktop")
        .with_subtitle("~/Desktop")
        .with_arg("~/Desktop")
        .with_icon(FilterItemIcon::file_icon("~/Desktop"))
        .with_match("desk top")
        .with_valid(true)
        .with_autocomplete("Desktop")
        .with_type(ItemType::File)
        .with_action(Action::Typed(ScriptFilterItemAction {
            file: Some("~/Desktop".to_string()),
            ..Default::default()
        }))
        .with_text(ItemText {
            copy: Some("~/Desktop".to_string()),
            largetype: Some("Desktop".to_string()),
        })
        .with_quicklookurl("~/Desktop")
        .with_variable("folder", "desktop");

    let item = ScriptFilterItem::from(desktop)
        .with_mod(
            Modifier::Cmd,
            ItemFields::new("Desktop")
                .with_subtitle("Reveal in Finder")
                .with_arg("~/Desktop")
                .with_variables(Default::default()),
        )
        .with_mod(
            Modifier::Opt,
            ItemFields::new("Desktop")
                .with_subtitle("Not available")
                .with_valid(false),
        );

    let placeholder = ItemFields::new("Searching…")
        .with_subtitle("Results will refresh shortly")
        .with_valid(false)
        .with_icon(FilterItemIcon::file_type("public.folder"));

    ScriptFilter::new(vec![item, placeholder.into()])
        .with_variable("session", "example")
        .with_rerun(1.0)
}
