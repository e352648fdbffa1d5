use clap::{Parser, Subcommand};

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(name = "reportview", version, about = "Browse and filter JSON lint reports", long_about = None)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: REPORTVIEW_LOG=] [default: info]
    #[arg(
        long,
        env = "REPORTVIEW_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a default reportview.toml config file
    Init(InitArgs),
    /// Serve the report viewer over HTTP
    Serve(ServeArgs),
    /// List report files, most recent first
    List(SourceArgs),
    /// Show a report's violations with optional filtering
    Show(ShowArgs),
    /// Print the JSON Schema of a report file
    Schema,
}

/// Arguments for the init command
#[derive(Parser)]
pub struct InitArgs {
    /// Path to config file
    #[arg(long, default_value = "reportview.toml")]
    pub config: String,

    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// Where to find configuration and reports
#[derive(Parser, Debug, Clone)]
pub struct SourceArgs {
    /// Path to config file (initialize with `reportview init`)
    #[arg(long, default_value = "reportview.toml")]
    pub config: String,

    /// Override config values using dot notation (e.g. server.port=8080)
    #[arg(long = "config-override")]
    pub config_overrides: Vec<String>,

    /// Reports directory (overrides reports.dir)
    #[arg(long)]
    pub reports_dir: Option<String>,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Report filename [default: most recently modified report]
    pub filename: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Severity filter: all, critical, high, medium or low
    #[arg(long, default_value = "all")]
    pub severity: String,

    /// Case-insensitive search over message, code, category and rule
    #[arg(long, default_value = "")]
    pub search: String,

    /// Output file path (.md or .json)
    #[arg(long)]
    pub output: Option<String>,
}
