//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use docdesk_core::{ToolResult, Toolbox, list_tools};
use docdesk_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docdesk command-line interface.
#[derive(Parser)]
#[command(
    name = "docdesk",
    version,
    about = "Query a component catalog, an API specification, rule files, a customer registry and a company page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.docdesk/docdesk.toml).
    #[arg(long, global = true, env = "DOCDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Component catalog (overrides `sources.catalog_path`).
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// API specification (overrides `sources.api_spec_path`).
    #[arg(long, global = true)]
    pub api_spec: Option<PathBuf>,

    /// Customer registry (overrides `sources.customers_path`).
    #[arg(long, global = true)]
    pub customers: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Look up a component by name; without a name, list components.
    Component {
        /// Component name (case-insensitive).
        name: Option<String>,
    },

    /// List the components of a category.
    Category {
        /// Category display name (case-insensitive).
        name: String,
    },

    /// List customers; with a name, those whose name contains it.
    Customer {
        /// Part of the customer name (case-insensitive).
        name: Option<String>,
    },

    /// Query the API specification.
    Api {
        /// Endpoints carrying this tag (case-sensitive).
        #[arg(long)]
        tag: Option<String>,

        /// Substring searched in path, operationId, summary and description.
        #[arg(long)]
        search: Option<String>,

        /// Exact endpoint path; used together with --method.
        #[arg(long, requires = "method")]
        path: Option<String>,

        /// HTTP method (case-insensitive); used together with --path.
        #[arg(long, requires = "path")]
        method: Option<String>,
    },

    /// Suggest endpoints and steps for implementing a feature.
    Guide {
        /// Free-text feature description.
        description: String,

        /// Endpoint to resolve explicitly, as "METHOD /path" (repeatable).
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,
    },

    /// Summarize text from an argument, a file, or stdin.
    Summarize {
        /// Text to summarize.
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from this file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Maximum sentences to keep (defaults to `summary.default_sentences`).
        #[arg(short = 'n', long)]
        sentences: Option<usize>,
    },

    /// Fetch the company page and extract a profile.
    Company {
        /// Page to inspect (overrides `web.company_url`).
        #[arg(long)]
        url: Option<String>,
    },

    /// Read the rules of a markdown rule file.
    Rules {
        /// Rule file; relative paths also resolve under `sources.rules_dir`.
        path: PathBuf,

        /// Group rules under their `## ` section headings.
        #[arg(long)]
        sections: bool,
    },

    /// Print the tool descriptors with their JSON input schemas.
    Tools,

    /// Invoke a tool by name with JSON arguments.
    Call {
        /// Tool name, as listed by `tools`.
        name: String,

        /// JSON object of arguments (defaults to `{}`).
        args: Option<String>,
    },

    /// Show the load status of both indexes.
    Status,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docdesk=info",
        1 => "docdesk=debug",
        _ => "docdesk=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    // `config init` must work even when the existing file does not parse.
    if let Command::Config {
        action: ConfigAction::Init,
    } = cli.command
    {
        return cmd_config_init();
    }

    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Config { .. } => cmd_config_show(&config),
        Command::Tools => print_json(&list_tools()),
        command => {
            let toolbox = Toolbox::new(config).wrap_err("failed to start toolbox")?;
            dispatch(&toolbox, command).await
        }
    }
}

async fn dispatch(toolbox: &Toolbox, command: Command) -> Result<ExitCode> {
    match command {
        Command::Component { name } => emit(toolbox.lookup_component(name.as_deref())),
        Command::Category { name } => emit(toolbox.lookup_components_by_category(&name)),
        Command::Customer { name } => emit(toolbox.get_customer_info(name.as_deref())),
        Command::Api {
            tag,
            search,
            path,
            method,
        } => emit(toolbox.query_api(
            tag.as_deref(),
            search.as_deref(),
            path.as_deref(),
            method.as_deref(),
        )),
        Command::Guide {
            description,
            endpoints,
        } => emit(toolbox.guide_implementation(&description, &endpoints)),
        Command::Summarize {
            text,
            file,
            sentences,
        } => {
            let text = read_input(text, file)?;
            emit(toolbox.summarize_text(&text, sentences))
        }
        Command::Company { .. } => cmd_company(toolbox).await,
        Command::Rules { path, sections } => emit(toolbox.read_rule_file(&path, sections)),
        Command::Status => print_json(&toolbox.status()),
        Command::Call { name, args } => {
            let args: serde_json::Value = match args {
                Some(raw) => serde_json::from_str(&raw).wrap_err("arguments are not valid JSON")?,
                None => json!({}),
            };
            emit(toolbox.call_tool(&name, args).await)
        }
        Command::Tools | Command::Config { .. } => Err(eyre!("command handled before dispatch")),
    }
}

/// Config file, then CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(catalog) = &cli.catalog {
        config.sources.catalog_path = catalog.clone();
    }
    if let Some(api_spec) = &cli.api_spec {
        config.sources.api_spec_path = api_spec.clone();
    }
    if let Some(customers) = &cli.customers {
        config.sources.customers_path = customers.clone();
    }
    if let Command::Company { url: Some(url) } = &cli.command {
        config.web.company_url = url.clone();
    }

    debug!(
        catalog = %config.sources.catalog_path.display(),
        api_spec = %config.sources.api_spec_path.display(),
        "configuration resolved"
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_company(toolbox: &Toolbox) -> Result<ExitCode> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching {}", toolbox.config().web.company_url));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = toolbox.get_company_info().await;
    spinner.finish_and_clear();

    emit(result)
}

fn cmd_config_init() -> Result<ExitCode> {
    let path = init_config()?;
    print_json(&json!({ "config_path": path.display().to_string() }))
}

fn cmd_config_show(config: &AppConfig) -> Result<ExitCode> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Print a tool result as JSON. Tool errors become `{"error": {...}}` and a
/// failing exit code.
fn emit<T: Serialize>(result: ToolResult<T>) -> Result<ExitCode> {
    match result {
        Ok(value) => print_json(&value),
        Err(err) => {
            print_json(&json!({ "error": err }))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        return std::fs::read_to_string(&file)
            .wrap_err_with(|| format!("failed to read {}", file.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .wrap_err("failed to read stdin")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_path_requires_method() {
        assert!(Cli::try_parse_from(["docdesk", "api", "--path", "/jobs"]).is_err());
        assert!(
            Cli::try_parse_from(["docdesk", "api", "--path", "/jobs", "--method", "get"]).is_ok()
        );
    }

    #[test]
    fn guide_collects_repeated_endpoints() {
        let cli = Cli::try_parse_from([
            "docdesk",
            "guide",
            "apply to a job",
            "--endpoint",
            "GET /jobs",
            "--endpoint",
            "POST /applications",
        ])
        .unwrap();
        match cli.command {
            Command::Guide { endpoints, .. } => {
                assert_eq!(endpoints, ["GET /jobs", "POST /applications"]);
            }
            _ => panic!("expected guide"),
        }
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docdesk",
            "component",
            "Button",
            "--catalog",
            "cat.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("cat.json")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn summarize_text_and_file_conflict() {
        assert!(
            Cli::try_parse_from(["docdesk", "summarize", "Some text.", "--file", "a.txt"]).is_err()
        );
    }
}
