//! Command handlers for user administration.
//!
//! # Usage
//!
//! ```bash
//! # Add a user, printing the generated password
//! hyadm add-user --username alice
//!
//! # Rotate without confirmation, machine-readable output
//! hyadm rotate-password --username alice --yes --output json
//!
//! # Print the client share URL
//! hyadm connection --username alice
//!
//! # Traffic table
//! hyadm stats
//! ```

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;
use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;

use crate::admin::UserAdmin;
use crate::error::AdminError;

/// Output format of a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments of commands that change the server document.
#[derive(Args, Debug, Clone, Default)]
pub struct MutationArgs {
    /// Username (prompted for on a terminal when omitted).
    #[arg(short, long)]
    pub username: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// Arguments of read-only commands about one user.
#[derive(Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// Username (prompted for on a terminal when omitted).
    #[arg(short, long)]
    pub username: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// User administration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Add a user with a generated password.
    AddUser(MutationArgs),

    /// Replace a user's password with a generated one.
    RotatePassword(MutationArgs),

    /// Remove a user.
    RemoveUser(MutationArgs),

    /// List users.
    ListUsers(OutputArgs),

    /// Print the hy2:// connection URL of a user.
    Connection(LookupArgs),

    /// Show per-user traffic and online state.
    Stats(OutputArgs),
}

/// Error from a command handler.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("operation canceled")]
    Canceled,

    #[error("{action}: {source}")]
    Admin {
        action: &'static str,
        #[source]
        source: AdminError,
    },

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }

    fn admin(action: &'static str) -> impl FnOnce(AdminError) -> Self {
        move |source| Self::Admin { action, source }
    }
}

/// Prompt input and command output.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Standard streams; prompts are enabled when stdin is a terminal.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self::new(stdin.lock(), io::stdout(), interactive)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt_required(&mut self, label: &str) -> Result<String, CliError> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
            let mut line = String::new();
            let read = self.input.read_line(&mut line)?;
            let value = line.trim();
            if !value.is_empty() {
                return Ok(value.to_owned());
            }
            if read == 0 {
                return Err(CliError::Usage("input ended".into()));
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        write!(self.output, "{prompt} [y/N]: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).is_err() {
            return Ok(false);
        }
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn username(&mut self, given: Option<String>, command: &str) -> Result<String, CliError> {
        match given.filter(|u| !u.is_empty()) {
            Some(username) => Ok(username),
            None if self.interactive => self.prompt_required("Username"),
            None => Err(CliError::Usage(format!(
                "--username is required for {command}"
            ))),
        }
    }

    fn json(&mut self, value: &serde_json::Value) -> Result<(), CliError> {
        serde_json::to_writer(&mut self.output, value)?;
        writeln!(self.output)?;
        Ok(())
    }
}

/// Run one command.
///
/// `config_path` is the server document path, shown in prompts and output.
pub async fn run<R: BufRead, W: Write>(
    command: AdminCommand,
    admin: &UserAdmin,
    config_path: &Path,
    console: &mut Console<R, W>,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let config = config_path.display().to_string();
    match command {
        AdminCommand::AddUser(args) => {
            let username = console.username(args.username, "add-user")?;
            if !args.yes && !console.confirm(&format!("Add user {username:?} into {config}?"))? {
                return Err(CliError::Canceled);
            }
            let password = admin
                .add_user(&username)
                .await
                .map_err(CliError::admin("add user"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({
                    "status": "ok",
                    "username": username,
                    "password": password,
                    "config": config,
                })),
                OutputFormat::Text => {
                    writeln!(console.output, "User {username:?} added to {config}")?;
                    writeln!(console.output, "Password: {password}")?;
                    Ok(())
                }
            }
        }
        AdminCommand::RotatePassword(args) => {
            let username = console.username(args.username, "rotate-password")?;
            if !args.yes
                && !console.confirm(&format!("Rotate password for {username:?} in {config}?"))?
            {
                return Err(CliError::Canceled);
            }
            let password = admin
                .rotate_password(&username)
                .await
                .map_err(CliError::admin("rotate password"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({
                    "status": "ok",
                    "username": username,
                    "password": password,
                    "config": config,
                })),
                OutputFormat::Text => {
                    writeln!(console.output, "Password rotated for {username:?} in {config}")?;
                    writeln!(console.output, "New password: {password}")?;
                    Ok(())
                }
            }
        }
        AdminCommand::RemoveUser(args) => {
            let username = console.username(args.username, "remove-user")?;
            if !args.yes && !console.confirm(&format!("Remove user {username:?} from {config}?"))? {
                return Err(CliError::Canceled);
            }
            admin
                .remove_user(&username)
                .await
                .map_err(CliError::admin("remove user"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({
                    "status": "ok",
                    "username": username,
                    "config": config,
                })),
                OutputFormat::Text => {
                    writeln!(console.output, "User {username:?} removed from {config}")?;
                    Ok(())
                }
            }
        }
        AdminCommand::ListUsers(args) => {
            let users = admin
                .list_users()
                .await
                .map_err(CliError::admin("list users"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({"status": "ok", "users": users})),
                OutputFormat::Text => {
                    for user in &users {
                        writeln!(console.output, "{user}")?;
                    }
                    Ok(())
                }
            }
        }
        AdminCommand::Connection(args) => {
            let username = console.username(args.username, "connection")?;
            let url = admin
                .connection_url(&username)
                .await
                .map_err(CliError::admin("build connection url"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({"status": "ok", "url": url.as_str()})),
                OutputFormat::Text => {
                    writeln!(console.output, "{url}")?;
                    Ok(())
                }
            }
        }
        AdminCommand::Stats(args) => {
            let stats = admin
                .user_stats(cancel)
                .await
                .map_err(CliError::admin("user stats"))?;
            match args.output {
                OutputFormat::Json => console.json(&json!({
                    "status": "ok",
                    "stats_enabled": admin.stats_enabled(),
                    "users": stats,
                })),
                OutputFormat::Text => {
                    if !admin.stats_enabled() {
                        writeln!(console.output, "Traffic stats are disabled; showing users only.")?;
                    }
                    if stats.is_empty() {
                        writeln!(console.output, "No users.")?;
                        return Ok(());
                    }
                    let rows: Vec<StatsRow> = stats
                        .into_iter()
                        .map(|(username, s)| StatsRow {
                            username,
                            online: if s.online { "yes" } else { "no" }.to_owned(),
                            rx: format_bytes(s.rx_bytes),
                            tx: format_bytes(s.tx_bytes),
                            total: format_bytes(s.total_bytes),
                        })
                        .collect();
                    writeln!(console.output, "{}", Table::new(rows))?;
                    Ok(())
                }
            }
        }
    }
}

/// Stats row for display.
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "RX")]
    rx: String,
    #[tabled(rename = "TX")]
    tx: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format bytes to human readable string.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
