pub mod console;
pub mod devices;
pub mod ports;
pub mod reset;
pub mod scan;
pub mod show;
pub mod update;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use lanwatch_core::views::ViewError;

use crate::terminal::print;

#[derive(Parser)]
#[command(name = "lanwatch")]
#[command(about = "Operator console for a LAN device inventory.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the inventory backend
    #[arg(long, global = true, env = "LANWATCH_API_URL")]
    pub api_url: Option<String>,

    /// Less output, repeat to hide device trees as well
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// More logging, repeat for trace output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every device in the inventory
    #[command(alias = "d", alias = "ls")]
    Devices,
    /// Show one device with its port and HTTP history
    #[command(alias = "s")]
    Show {
        ip: String,
        /// Show the HTTP responses instead of the port scans
        #[arg(long)]
        http: bool,
    },
    /// Discover devices in a network range
    #[command(alias = "sc")]
    Scan {
        /// CIDR, hyphen range or single IP; the backend default when omitted
        range: Option<String>,
        /// Scan one of the common ranges listed by --list-presets
        #[arg(short, long, conflicts_with = "range")]
        preset: Option<usize>,
        #[arg(long)]
        list_presets: bool,
    },
    /// Run a full port scan (1-65535) of one device
    #[command(alias = "p")]
    Ports { ip: String },
    /// Edit the stored fields of one device
    #[command(alias = "u")]
    Update {
        ip: String,
        #[arg(long)]
        hostname: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long = "os")]
        os_info: Option<String>,
        #[arg(long = "mac")]
        mac_address: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete every device from the inventory
    Reset,
    /// Interactive console
    #[command(alias = "c")]
    Console,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Maps a view outcome to an exit code, printing the failure unless the
/// rendered snapshot already showed it.
///
/// `recorded` is the inline error the view kept. Refusals such as a busy view
/// or blank input are not recorded and fall back to `fallback`.
pub(crate) fn conclude<T>(
    result: &Result<T, ViewError>,
    recorded: Option<&str>,
    rendered: bool,
    fallback: &str,
) -> ExitCode {
    let Err(err) = result else {
        return ExitCode::SUCCESS;
    };
    match recorded {
        Some(_) if rendered => {}
        Some(msg) => print::view_error(msg),
        None => print::view_error(&err.describe(fallback)),
    }
    ExitCode::FAILURE
}
