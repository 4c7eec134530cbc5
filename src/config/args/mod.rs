use crate::config::{
    AgeWindow, Command, Config, ConnectionConfig, DeleteConfig, FilterConfig, ScanConfig,
    TracingConfig,
};
use crate::types::PersonalAccessToken;
use chrono::Utc;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use fancy_regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;

use value_parser::file_exist::is_file_exist;
use value_parser::url::check_scheme;

pub mod value_parser;


// ---------------------------------------------------------------------------
// Default constants
// ---------------------------------------------------------------------------

const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_HTTP_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;
const DEFAULT_DRY_RUN: bool = false;

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

const ERROR_MESSAGE_PATTERN_REQUIRED: &str = "--filename-regex or --path-regex required.";
const ERROR_MESSAGE_INVALID_REGEX: &str = "Invalid regular expression pattern";
const ERROR_MESSAGE_COMMAND_REQUIRED: &str = "A subcommand is required: scan or delete.";

// ---------------------------------------------------------------------------
// CLIArgs (clap-derived argument struct)
// ---------------------------------------------------------------------------

/// artifact-sweep - Audit and prune Azure DevOps build artifact containers.
///
/// `scan` lists the files of "Container" build artifacts matching a path or
/// file name pattern and writes them to a CSV file. `delete` reads such a
/// file back and deletes the listed items after confirmation.
///
/// Example:
///   artifact-sweep scan --url https://dev.azure.com/org --project app \
///     --definition-id 12 --filename-regex '\.pdb$' --min-age-days 30 --out-csv old.csv
///   artifact-sweep delete --url https://dev.azure.com/org --in-csv old.csv --dry-run
#[derive(Parser, Clone, Debug)]
#[command(name = "artifact-sweep", version, about, long_about = None, arg_required_else_help = true)]
pub struct CLIArgs {
    #[command(subcommand)]
    pub command: Option<SweepCommand>,

    // -----------------------------------------------------------------------
    // Logging options
    // -----------------------------------------------------------------------
    /// Verbosity level. -q (quiet), default (normal), -v (diagnostics), -vv.
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Output logs in JSON format.
    #[arg(long, env, global = true, default_value_t = DEFAULT_JSON_TRACING, help_heading = "Logging")]
    pub json_tracing: bool,

    /// Include HTTP client (reqwest/hyper) events in the logs.
    #[arg(long, env, global = true, default_value_t = DEFAULT_HTTP_TRACING, help_heading = "Logging")]
    pub http_tracing: bool,

    /// Disable colored output in logs.
    #[arg(long, env, global = true, default_value_t = DEFAULT_DISABLE_COLOR_TRACING, help_heading = "Logging")]
    pub disable_color_tracing: bool,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SweepCommand {
    /// Export the files of build artifacts matching the given patterns to CSV.
    Scan(ScanArgs),
    /// Delete the container items listed in a CSV file produced by `scan`.
    Delete(DeleteArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    /// Azure DevOps organization (or TFS collection) URL.
    #[arg(long, env = "AZURE_DEVOPS_ORG_URL", value_parser = check_scheme, help_heading = "Connection")]
    pub url: String,

    /// Personal Access Token. If not supplied, it is prompted for.
    #[arg(
        long,
        env = "AZURE_DEVOPS_EXT_PAT",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new(),
        help_heading = "Connection"
    )]
    pub pat: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Project id or name.
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), help_heading = "Scan")]
    pub project: String,

    /// Build definition id.
    #[arg(long, help_heading = "Scan")]
    pub definition_id: u32,

    /// Regular expression tested against the file name (last path segment).
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), help_heading = "Filter")]
    pub filename_regex: Option<String>,

    /// Regular expression tested against the full item path.
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), help_heading = "Filter")]
    pub path_regex: Option<String>,

    /// Minimum age of builds to scan, in days.
    #[arg(long, help_heading = "Filter")]
    pub min_age_days: Option<u32>,

    /// Maximum age of builds to scan, in days.
    #[arg(long, help_heading = "Filter")]
    pub max_age_days: Option<u32>,

    /// Output CSV file.
    #[arg(long, help_heading = "Scan")]
    pub out_csv: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Input CSV file (as written by `scan`).
    #[arg(long, value_parser = is_file_exist, help_heading = "Delete")]
    pub in_csv: String,

    /// Print what would be deleted without deleting anything.
    #[arg(short = 'd', long, default_value_t = DEFAULT_DRY_RUN, help_heading = "Delete")]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// parse_from_args (public API)
// ---------------------------------------------------------------------------

/// Parse command-line arguments into a `CLIArgs` struct.
///
/// # Example
///
/// ```
/// use artifact_sweep::config::args::{SweepCommand, parse_from_args};
///
/// let args = vec![
///     "artifact-sweep",
///     "scan",
///     "--url",
///     "https://dev.azure.com/org",
///     "--project",
///     "app",
///     "--definition-id",
///     "12",
///     "--filename-regex",
///     r"\.pdb$",
///     "--out-csv",
///     "out.csv",
/// ];
/// let cli_args = parse_from_args(args).unwrap();
/// assert!(matches!(cli_args.command, Some(SweepCommand::Scan(_))));
/// ```
pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

/// Parse arguments and build a Config in one step.
pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = CLIArgs::try_parse_from(args).map_err(|e| e.to_string())?;
    Config::try_from(cli_args)
}

// ---------------------------------------------------------------------------
// Validation and Config conversion
// ---------------------------------------------------------------------------

fn compile_regex(pattern: &Option<String>, name: &str) -> Result<Option<Regex>, String> {
    match pattern {
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|e| format!("{ERROR_MESSAGE_INVALID_REGEX} for {name}: {e}")),
        None => Ok(None),
    }
}

impl ConnectionArgs {
    fn build_connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.url.trim_end_matches('/').to_string(),
            pat: self.pat.as_deref().map(PersonalAccessToken::new),
        }
    }
}

impl ScanArgs {
    fn build_filter_config(&self) -> Result<FilterConfig, String> {
        let filter_config = FilterConfig {
            path_regex: compile_regex(&self.path_regex, "path-regex")?,
            filename_regex: compile_regex(&self.filename_regex, "filename-regex")?,
        };

        if !filter_config.has_any_pattern() {
            return Err(ERROR_MESSAGE_PATTERN_REQUIRED.to_string());
        }

        Ok(filter_config)
    }

    fn build_scan_config(&self) -> Result<ScanConfig, String> {
        let filter_config = self.build_filter_config()?;
        let age_window =
            AgeWindow::from_age_days(self.min_age_days, self.max_age_days, Utc::now())?;

        Ok(ScanConfig {
            project: self.project.clone(),
            definition_id: self.definition_id,
            filter_config,
            age_window,
            out_csv: self.out_csv.clone(),
        })
    }
}

impl CLIArgs {
    fn build_tracing_config(&self) -> Option<TracingConfig> {
        let log_level = self.verbosity.log_level()?;

        Some(TracingConfig {
            tracing_level: log_level,
            json_tracing: self.json_tracing,
            http_tracing: self.http_tracing,
            disable_color_tracing: self.disable_color_tracing,
        })
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = String;

    fn try_from(args: CLIArgs) -> Result<Self, Self::Error> {
        let tracing_config = args.build_tracing_config();

        let (connection, command) = match args.command {
            Some(SweepCommand::Scan(ref scan_args)) => (
                scan_args.connection.build_connection_config(),
                Command::Scan(scan_args.build_scan_config()?),
            ),
            Some(SweepCommand::Delete(ref delete_args)) => (
                delete_args.connection.build_connection_config(),
                Command::Delete(DeleteConfig {
                    in_csv: PathBuf::from(&delete_args.in_csv),
                    dry_run: delete_args.dry_run,
                }),
            ),
            None => return Err(ERROR_MESSAGE_COMMAND_REQUIRED.to_string()),
        };

        Ok(Config {
            connection,
            tracing_config,
            command,
        })
    }
}
