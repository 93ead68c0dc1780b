//! Clap derive structures for the `connect-mesh` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// connect-mesh -- control Häfele Connect Mesh lights and sockets
#[derive(Debug, Parser)]
#[command(
    name = "connect-mesh",
    version,
    about = "Control Häfele Connect Mesh networks from the command line",
    long_about = "Talks to the Connect Mesh cloud API: list networks and devices,\n\
        switch and dim lights, recall scenes, and watch device status.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "CONNECT_MESH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cloud API token (overrides profile and keyring)
    #[arg(long, env = "CONNECT_MESH_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Network ID (overrides profile)
    #[arg(long, short = 'n', env = "CONNECT_MESH_NETWORK", global = true)]
    pub network: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CONNECT_MESH_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CONNECT_MESH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    On,
    Off,
}

impl PowerArg {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect mesh networks
    #[command(alias = "net")]
    Networks(NetworksArgs),

    /// List devices and read their status
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Switch a device on or off
    Power {
        /// Device unique ID
        device: String,

        /// Target state
        state: PowerArg,
    },

    /// Set a light's brightness (0-255)
    #[command(alias = "dim")]
    Brightness {
        /// Device unique ID
        device: String,

        /// Brightness, 0-255
        value: i64,
    },

    /// Set a light's color temperature
    #[command(alias = "ct")]
    Temperature(TemperatureArgs),

    /// Set a light's color as hue/saturation/lightness
    Hsl {
        /// Device unique ID
        device: String,

        /// Hue in degrees, 0-360
        hue: f64,

        /// Saturation, 0-1
        saturation: f64,

        /// Lightness, 0-1
        lightness: f64,
    },

    /// List and control device groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// List and recall scenes
    Scenes(ScenesArgs),

    /// List and ping gateways
    #[command(alias = "gw")]
    Gateways(GatewaysArgs),

    /// Poll every device of a network and print status changes until Ctrl-C
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List networks on the account
    #[command(alias = "ls")]
    List,

    /// Show network details
    Get {
        /// Network ID
        network: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices (of --network if given, otherwise all)
    #[command(alias = "ls")]
    List,

    /// Show device details
    Get {
        /// Device unique ID
        device: String,
    },

    /// Read a device's current status
    Status {
        /// Device unique ID
        device: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEMPERATURE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("unit")
        .required(true)
        .args(["kelvin", "mireds"])
))]
pub struct TemperatureArgs {
    /// Device unique ID
    pub device: String,

    /// Color temperature in kelvin (2000-6500)
    #[arg(long, short = 'k')]
    pub kelvin: Option<i64>,

    /// Color temperature in mireds (153-500)
    #[arg(long, short = 'm')]
    pub mireds: Option<i64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups (of --network if given, otherwise all)
    #[command(alias = "ls")]
    List,

    /// Switch every device of a group on or off
    Power {
        /// Group ID
        group: String,

        /// Target state
        state: PowerArg,
    },

    /// Set a group's brightness (0-255)
    Brightness {
        /// Group ID
        group: String,

        /// Brightness, 0-255
        value: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SCENES / GATEWAYS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ScenesArgs {
    #[command(subcommand)]
    pub command: ScenesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenesCommand {
    /// List scenes (of --network if given, otherwise all)
    #[command(alias = "ls")]
    List,

    /// Recall a stored scene
    Recall {
        /// Scene ID
        scene: String,
    },
}

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: GatewaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List gateways
    #[command(alias = "ls")]
    List,

    /// Ask the cloud to ping a gateway
    Ping {
        /// Gateway ID
        gateway: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Status poll period in seconds (10-300, overrides profile)
    #[arg(long)]
    pub scan_interval: Option<u64>,

    /// Print every snapshot, not only changes
    #[arg(long)]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

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

    /// List configured profiles
    Profiles,

    /// Store an API token for the active profile in the system keyring
    SetToken,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
