//! Interactive console.
//!
//! Mounts the inventory once and keeps it, the device detail and the range
//! picker alive between commands. Everything runs on the calling task; one
//! command finishes before the next line is read.

use std::process::ExitCode;
use std::sync::Arc;

use colored::*;
use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::device_detail::{DeviceDetailView, FULL_SCAN_NOTICE, Panel};
use lanwatch_core::views::inventory::{InventoryView, ResetOutcome};
use lanwatch_core::views::scan_request::{RangePicker, ScanRequestView};
use lanwatch_core::views::{
    Activity, DETAIL_FAILED, LOAD_FAILED, PORT_SCAN_FAILED, RESET_FAILED, SCAN_FAILED, ViewError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, info, warn};

use crate::commands::conclude;
use crate::terminal::input::KeyConfirm;
use crate::terminal::{colors, format, print, render, spinner};

const PROMPT: &str = "lanwatch> ";

const HELP: &[(&str, &str)] = &[
    ("refresh", "reload the device list"),
    ("scan [range]", "scan a range, or the picker's choice"),
    ("quick", "scan the backend's default range"),
    ("presets", "list the range presets"),
    ("pick <n>", "choose preset n for the next scan"),
    ("pick custom <range>", "type a custom range for the next scan"),
    ("show <ip>", "open a device"),
    ("ports | http", "switch the device panel"),
    ("portscan", "full port scan of the open device"),
    ("close", "close the device"),
    ("reset", "delete every device"),
    ("counts", "device counts"),
    ("help", "this list"),
    ("quit", "leave the console"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConsoleCommand {
    Refresh,
    Scan(Option<String>),
    Quick,
    Presets,
    Pick(usize),
    PickCustom(String),
    Show(String),
    Panel(Panel),
    PortScan,
    Close,
    Reset,
    Counts,
    Help,
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (verb.to_lowercase().as_str(), rest.as_slice()) {
            ("refresh" | "r", []) => ConsoleCommand::Refresh,
            ("scan", []) => ConsoleCommand::Scan(None),
            ("scan", [range]) => ConsoleCommand::Scan(Some(range.to_string())),
            ("quick", []) => ConsoleCommand::Quick,
            ("presets", []) => ConsoleCommand::Presets,
            ("pick", ["custom", range @ ..]) => ConsoleCommand::PickCustom(range.join(" ")),
            ("pick", [idx]) => ConsoleCommand::Pick(
                idx.parse()
                    .map_err(|_| format!("'{idx}' is not a preset number"))?,
            ),
            ("show", [ip]) => ConsoleCommand::Show(ip.to_string()),
            ("ports", []) => ConsoleCommand::Panel(Panel::PortScans),
            ("http", []) => ConsoleCommand::Panel(Panel::HttpResponses),
            ("portscan", []) => ConsoleCommand::PortScan,
            ("close", []) => ConsoleCommand::Close,
            ("reset", []) => ConsoleCommand::Reset,
            ("counts", []) => ConsoleCommand::Counts,
            ("help" | "?", []) => ConsoleCommand::Help,
            ("quit" | "exit" | "q", []) => ConsoleCommand::Quit,
            _ => return Err(format!("Unknown command '{}', try 'help'", line.trim())),
        };
        Ok(Some(command))
    }
}

struct Console<'a> {
    inventory: InventoryView,
    detail: DeviceDetailView,
    picker: RangePicker,
    cfg: &'a Config,
}

pub async fn console(service: Arc<dyn DeviceService>, cfg: &Config) -> anyhow::Result<ExitCode> {
    let console = Console {
        inventory: InventoryView::new(service.clone()),
        detail: DeviceDetailView::new(service),
        picker: RangePicker::default(),
        cfg,
    };
    console.run().await
}

impl Console<'_> {
    async fn run(mut self) -> anyhow::Result<ExitCode> {
        help();
        let loaded = self
            .inventory
            .mount()
            .instrument(spinner::working("Loading devices"))
            .await;
        self.show_inventory(&loaded, LOAD_FAILED);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = match ConsoleCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(msg) => {
                    print::view_error(&msg);
                    continue;
                }
            };
            if command == ConsoleCommand::Quit {
                break;
            }
            self.dispatch(command).await;
        }

        self.detail.hide();
        self.inventory.unmount();
        Ok(ExitCode::SUCCESS)
    }

    async fn dispatch(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Refresh => {
                let loaded = self
                    .inventory
                    .refresh()
                    .instrument(spinner::working("Loading devices"))
                    .await;
                self.show_inventory(&loaded, LOAD_FAILED);
            }
            ConsoleCommand::Scan(Some(range)) => {
                let scanned = self
                    .inventory
                    .scan_network(&range)
                    .instrument(spinner::working(&format!("Scanning {}", range.trim())))
                    .await;
                self.show_inventory(&scanned, SCAN_FAILED);
            }
            ConsoleCommand::Scan(None) => {
                let mut request = ScanRequestView::new(self.picker.clone());
                let span = spinner::working("Scanning the selected range");
                let scanned = self.inventory.scan_with(&mut request).instrument(span).await;
                self.show_inventory(&scanned, SCAN_FAILED);
            }
            ConsoleCommand::Quick => {
                let scanned = self
                    .inventory
                    .quick_scan()
                    .instrument(spinner::working("Scanning the default range"))
                    .await;
                self.show_inventory(&scanned, SCAN_FAILED);
            }
            ConsoleCommand::Presets => render::presets(&self.picker),
            ConsoleCommand::Pick(idx) => match self.picker.select_preset(idx) {
                Ok(preset) => info!("Next scan: {}", preset.value),
                Err(err) => print::view_error(&err.describe(SCAN_FAILED)),
            },
            ConsoleCommand::PickCustom(range) => {
                self.picker.select_custom();
                self.picker.set_custom(range);
                render::presets(&self.picker);
            }
            ConsoleCommand::Show(ip) => {
                let loaded = self
                    .detail
                    .show(&ip)
                    .instrument(spinner::working(&format!("Loading {ip}")))
                    .await;
                self.show_detail(&loaded, DETAIL_FAILED);
            }
            ConsoleCommand::Panel(panel) => {
                self.detail.select_panel(panel);
                render::detail(&self.detail.snapshot(), self.cfg);
            }
            ConsoleCommand::PortScan => self.port_scan().await,
            ConsoleCommand::Close => self.detail.hide(),
            ConsoleCommand::Reset => {
                let confirm = KeyConfirm::new(self.cfg.assume_yes);
                let outcome = self.inventory.reset(&confirm).await;
                if let Ok(ResetOutcome::Declined) = outcome {
                    info!("Reset cancelled, nothing was deleted");
                    return;
                }
                self.detail.hide();
                self.show_inventory(&outcome, RESET_FAILED);
            }
            ConsoleCommand::Counts => {
                print::print_status(format::counts_line(&self.inventory.counts()));
            }
            ConsoleCommand::Help => help(),
            ConsoleCommand::Quit => {}
        }
    }

    async fn port_scan(&self) {
        let Some(ip) = self.detail.ip() else {
            print::view_error("Open a device with 'show <ip>' first");
            return;
        };
        let activity = self.inventory.activity();
        if activity != Activity::Idle {
            print::view_error(&ViewError::Busy(activity).describe(PORT_SCAN_FAILED));
            return;
        }

        warn!("{FULL_SCAN_NOTICE}");
        let scanned = self
            .inventory
            .scan_ports_of(&self.detail)
            .instrument(spinner::port_scan(&ip))
            .await;
        if scanned.is_ok() {
            info!("Port scan of {ip} finished");
        }
        self.show_detail(&scanned, PORT_SCAN_FAILED);
    }

    fn show_inventory<T>(&self, result: &Result<T, ViewError>, fallback: &str) {
        let snapshot = self.inventory.snapshot();
        render::inventory(&snapshot, self.cfg);
        conclude(result, snapshot.error.as_deref(), true, fallback);
    }

    fn show_detail<T>(&self, result: &Result<T, ViewError>, fallback: &str) {
        let snapshot = self.detail.snapshot();
        render::detail(&snapshot, self.cfg);
        conclude(result, snapshot.error.as_deref(), true, fallback);
    }
}

fn prompt() -> std::io::Result<()> {
    ::console::Term::stderr().write_str(&format!("{}", PROMPT.color(colors::PRIMARY).bold()))
}

fn help() {
    print::header("commands", 0);
    for (command, what) in HELP {
        print::aligned_line(command, what.color(colors::SEPARATOR));
    }
}
