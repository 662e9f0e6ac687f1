//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fstctl_config::ConfigError;
use fstctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to control socket {path}")]
    #[diagnostic(
        code(fstctl::connection_failed),
        help(
            "Check that hostapd / wpa_supplicant is running with ctrl_interface set\n\
             and that you may write to the socket.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { path: String, reason: String },

    #[error("Control socket {path} is already in use by this process")]
    #[diagnostic(code(fstctl::conflict))]
    AlreadyConnected { path: String },

    #[error("Control channel closed")]
    #[diagnostic(code(fstctl::disconnected))]
    Disconnected,

    // ── Daemon replies ───────────────────────────────────────────────
    #[error("Daemon rejected `{command}`")]
    #[diagnostic(
        code(fstctl::rejected),
        help("Reply: {reply}\nCheck the ids and interface names with `fstctl groups` / `fstctl ifaces`.")
    )]
    Rejected { command: String, reply: String },

    #[error("Unexpected reply to `{command}`: {message}")]
    #[diagnostic(code(fstctl::protocol))]
    Protocol { command: String, message: String },

    #[error("'{operation}' is not supported by this daemon ({mode})")]
    #[diagnostic(
        code(fstctl::unsupported),
        help("This command needs wpa_supplicant; point --ctrl at its global control socket.")
    )]
    Unsupported { operation: String, mode: String },

    #[error("Daemon error: {message}")]
    #[diagnostic(code(fstctl::daemon))]
    Daemon { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fstctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fstctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fstctl config init --name {name} <CTRL_IFACE>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No control socket configured")]
    #[diagnostic(
        code(fstctl::no_config),
        help(
            "Pass --ctrl /var/run/hostapd/<iface>, set FSTCTL_CTRL,\n\
             or create a profile with: fstctl config init <CTRL_IFACE>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fstctl::config))]
    Config(Box<ConfigError>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Daemon did not answer within {millis}ms")]
    #[diagnostic(
        code(fstctl::timeout),
        help("Increase timeout with --timeout or check that the daemon is responsive.")
    )]
    Timeout { millis: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot render JSON output: {0}")]
    #[diagnostic(code(fstctl::json))]
    Json(#[from] serde_json::Error),

    #[error("Cannot render YAML output: {0}")]
    #[diagnostic(code(fstctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::AlreadyConnected { .. } => exit_code::CONFLICT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { path, reason } => CliError::ConnectionFailed {
                path: path.display().to_string(),
                reason,
            },

            CoreError::AlreadyConnected { path } => CliError::AlreadyConnected {
                path: path.display().to_string(),
            },

            CoreError::Disconnected => CliError::Disconnected,

            CoreError::Timeout { timeout_ms } => CliError::Timeout { millis: timeout_ms },

            CoreError::Rejected { command, reply } => CliError::Rejected { command, reply },

            CoreError::Protocol { command, message } => CliError::Protocol { command, message },

            CoreError::Unsupported { operation, mode } => CliError::Unsupported {
                operation: operation.into(),
                mode: mode.to_string(),
            },

            CoreError::InvalidArgument { message } => CliError::Validation {
                field: "argument".into(),
                reason: message,
            },

            CoreError::CommandTooLong { len, limit } => CliError::Validation {
                field: "command".into(),
                reason: format!("{len} bytes exceeds the {limit}-byte limit"),
            },

            other @ (CoreError::EventChannelBusy
            | CoreError::Transport { .. }
            | CoreError::Resource { .. }) => CliError::Daemon {
                message: other.to_string(),
            },
        }
    }
}
