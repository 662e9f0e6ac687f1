//! Clap derive structures for the `fstctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use fstctl_core::{MacAddress, RespondStatus};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fstctl -- drive fast session transfer through a daemon control socket
#[derive(Debug, Parser)]
#[command(
    name = "fstctl",
    version,
    about = "Manage FST sessions on hostapd and wpa_supplicant",
    long_about = "Talks to the hostapd / wpa_supplicant control interface to inspect\n\
        FST groups, interfaces and peers, drive session setup and transfer,\n\
        and watch FST notifications as they arrive.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "FSTCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Daemon control socket (overrides profile)
    #[arg(long, short = 'c', env = "FSTCTL_CTRL", global = true)]
    pub ctrl: Option<PathBuf>,

    /// Directory for the client-side sockets
    #[arg(long, env = "FSTCTL_CLIENT_DIR", global = true)]
    pub client_dir: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FSTCTL_OUTPUT",
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

    /// Request timeout in seconds
    #[arg(long, env = "FSTCTL_TIMEOUT", global = true)]
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
    /// List FST groups
    #[command(alias = "g")]
    Groups,

    /// List the interfaces of a group
    Ifaces {
        /// Group id
        group: String,
    },

    /// List the peers seen on an interface
    Peers {
        /// Group id
        group: String,
        /// Interface name
        iface: String,
    },

    /// Show a peer's multi-band IEs
    Mbies {
        /// Interface name
        iface: String,
        /// Peer MAC address
        peer: MacAddress,
    },

    /// List the session ids of a group
    Sessions {
        /// Group id
        group: String,
    },

    /// Inspect and drive one session
    #[command(alias = "s")]
    Session(SessionArgs),

    /// Attach an interface to a group
    Attach(AttachArgs),

    /// Detach an interface from its group
    Detach {
        /// Interface name
        iface: String,
    },

    /// Add or remove daemon interfaces (wpa_supplicant only)
    Iface(IfaceArgs),

    /// Add and select an open network profile for a peer (wpa_supplicant only)
    DupConnection {
        /// Interface to configure
        iface: String,
        /// Peer MAC address (becomes the profile's bssid)
        peer: MacAddress,
    },

    /// Remove every network profile on an interface (wpa_supplicant only)
    Disconnect {
        /// Interface name
        iface: String,
    },

    /// Report whether the daemon is hostapd or wpa_supplicant
    Mode,

    /// Print FST notifications until interrupted
    #[command(alias = "watch")]
    Monitor(MonitorArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show a session's peers, interfaces, llt and state
    Info { id: u32 },

    /// Create a session in a group and print its id
    Add { group: String },

    /// Remove a session
    #[command(alias = "rm")]
    Remove { id: u32 },

    /// Start session setup
    Initiate { id: u32 },

    /// Transfer the session to its new interface
    Transfer { id: u32 },

    /// Tear the session down
    Teardown { id: u32 },

    /// Answer a peer's setup request
    Respond {
        id: u32,
        #[arg(value_enum)]
        status: RespondArg,
    },

    /// Set one session parameter (e.g. old_ifname, new_ifname, old_peer_addr, llt)
    Set {
        id: u32,
        name: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RespondArg {
    Accept,
    Reject,
}

impl From<RespondArg> for RespondStatus {
    fn from(arg: RespondArg) -> Self {
        match arg {
            RespondArg::Accept => Self::Accept,
            RespondArg::Reject => Self::Reject,
        }
    }
}

// ── Interfaces ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// Interface name
    pub iface: String,

    /// Group id
    pub group: String,

    /// Interface priority within the group
    #[arg(long, default_value = "0")]
    pub priority: u32,

    /// Link-lifetime timer
    #[arg(long, default_value = "0")]
    pub llt: u32,
}

#[derive(Debug, Args)]
pub struct IfaceArgs {
    #[command(subcommand)]
    pub command: IfaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum IfaceCommand {
    /// Ask wpa_supplicant to manage an interface
    Add { name: String },

    /// Ask wpa_supplicant to stop managing an interface
    #[command(alias = "rm")]
    Remove { name: String },
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Keepalive PING period in seconds; 0 disables it (overrides profile)
    #[arg(long)]
    pub ping_interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Print the effective configuration as TOML
    Show,

    /// Create or update a profile pointing at a control socket
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Control socket path
        ctrl_iface: PathBuf,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
