//! Clap derive structures for the `bedwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bedwatch -- hospital bed occupancy from the command line
#[derive(Debug, Parser)]
#[command(
    name = "bedwatch",
    version,
    about = "Monitor hospital bed occupancy and forecasts from the command line",
    long_about = "Dashboard, live monitoring, and administration for a hospital bed \
        occupancy backend.\n\n\
        Shows current utilization, 7-day occupancy forecasts and capacity alerts, \
        and falls back to demo data when the backend cannot be reached.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BEDWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "BEDWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session token (overrides keyring and profile)
    #[arg(long, env = "BEDWATCH_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BEDWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BEDWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BEDWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in as a hospital administrator
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Manage hospitals
    #[command(alias = "h")]
    Hospitals(HospitalsArgs),

    /// Manage daily EHR occupancy records
    Ehr(EhrArgs),

    /// Show the occupancy forecast for a hospital
    Predict(PredictArgs),

    /// Show the monitoring dashboard for a hospital
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Follow a hospital's dashboard, announcing changes until Ctrl-C
    Watch(WatchArgs),

    /// Patient-facing availability, forecasts, and recommendations
    Public(PublicArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,
}

// ── Hospitals ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HospitalsArgs {
    #[command(subcommand)]
    pub command: HospitalsCommand,
}

#[derive(Debug, Subcommand)]
pub enum HospitalsCommand {
    /// List hospitals
    #[command(alias = "ls")]
    List {
        /// Only show hospitals whose name or location contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Show one hospital
    Get {
        /// Hospital ID
        id: i64,
    },

    /// Add a hospital
    Create {
        /// Hospital name
        #[arg(long)]
        name: String,

        /// City / region
        #[arg(long)]
        location: String,

        /// Total bed count
        #[arg(long, allow_negative_numbers = true)]
        total_beds: i64,

        /// ICU bed count
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        icu_beds: i64,
    },

    /// Change fields of a hospital
    Update {
        /// Hospital ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        total_beds: Option<i64>,

        #[arg(long)]
        icu_beds: Option<i64>,
    },

    /// Show the dashboard details of a hospital
    View {
        /// Hospital ID
        id: i64,
    },

    /// Edit a hospital interactively
    Edit {
        /// Hospital ID
        id: i64,
    },

    /// Remove a hospital
    Delete {
        /// Hospital ID
        id: i64,
    },

    /// Totals across all hospitals
    Stats,

    /// Configure the hospital's own EHR feed
    Integration {
        /// Hospital ID
        id: i64,

        /// Feed endpoint URL
        #[arg(long)]
        endpoint: String,

        /// Feed API key
        #[arg(long)]
        api_key: Option<String>,

        /// Disable scheduled syncing
        #[arg(long)]
        no_sync: bool,

        /// Minutes between scheduled syncs
        #[arg(long)]
        interval_minutes: Option<u32>,
    },

    /// Pull fresh records from the configured feed now
    Sync {
        /// Hospital ID
        id: i64,
    },
}

// ── EHR ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EhrArgs {
    #[command(subcommand)]
    pub command: EhrCommand,
}

#[derive(Debug, Subcommand)]
pub enum EhrCommand {
    /// List records for a hospital
    #[command(alias = "ls")]
    List {
        /// Hospital ID
        #[arg(long = "hospital")]
        hospital_id: i64,
    },

    /// Show one record
    Get {
        /// Record ID
        id: i64,
    },

    /// Add a daily record
    Create {
        /// Hospital ID
        #[arg(long = "hospital")]
        hospital_id: i64,

        /// Record date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        #[arg(long)]
        occupied_beds: i64,

        #[arg(long, default_value = "0")]
        admissions: i64,

        #[arg(long, default_value = "0")]
        discharges: i64,

        #[arg(long, default_value = "0")]
        icu_occupied: i64,

        #[arg(long, default_value = "0")]
        emergency_cases: i64,
    },
}

// ── Predict / Dashboard / Watch ──────────────────────────────────────

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Hospital ID
    pub id: i64,

    /// Days to forecast
    #[arg(long, short = 'd', default_value = "7")]
    pub days: u32,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Hospital ID (defaults to the first hospital)
    #[arg(long = "hospital", short = 'H')]
    pub hospital_id: Option<i64>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Hospital ID (defaults to the first hospital)
    #[arg(long = "hospital", short = 'H')]
    pub hospital_id: Option<i64>,

    /// Polling interval (e.g. "30s", "2m"; defaults to the profile setting)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,
}

// ── Public ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PublicArgs {
    #[command(subcommand)]
    pub command: PublicCommand,
}

#[derive(Debug, Subcommand)]
pub enum PublicCommand {
    /// List hospitals
    Hospitals {
        /// Only hospitals in this city
        #[arg(long)]
        city: Option<String>,
    },

    /// Current bed availability
    Availability {
        /// Hospital ID
        id: i64,
    },

    /// Day-by-day availability forecast
    Forecast {
        /// Hospital ID
        id: i64,

        /// Days to forecast (1-14)
        #[arg(long, short = 'd', default_value = "7")]
        days: u32,
    },

    /// Rank hospitals by expected availability
    Compare {
        /// Only hospitals in this city
        #[arg(long)]
        city: Option<String>,
    },

    /// Best hospital to visit in a city
    Recommend {
        /// City name
        city: String,
    },

    /// Capacity alerts and alternatives for a hospital
    Alerts {
        /// Hospital ID
        id: i64,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Store a session token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
