mod commands;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use commands::{CommandLine, Commands, devices, ports, reset, scan, show, update};
use lanwatch_common::config::{ApiConfig, Config};
use lanwatch_core::client::HttpDeviceService;
use lanwatch_core::service::DeviceService;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;

    let cfg = Config {
        api: ApiConfig::resolve(commands.api_url.as_deref()),
        quiet: commands.quiet,
        no_banner: commands.no_banner,
        assume_yes: commands.assume_yes,
    };
    print::banner(cfg.no_banner, cfg.quiet);

    let service: Arc<dyn DeviceService> = Arc::new(HttpDeviceService::new(&cfg.api)?);

    match commands.command {
        Commands::Devices => devices::devices(service, &cfg).await,
        Commands::Show { ip, http } => show::show(service, &ip, http, &cfg).await,
        Commands::Scan {
            range,
            preset,
            list_presets,
        } => scan::scan(service, range, preset, list_presets, &cfg).await,
        Commands::Ports { ip } => ports::ports(service, &ip, &cfg).await,
        Commands::Update {
            ip,
            hostname,
            vendor,
            os_info,
            mac_address,
            status,
        } => {
            let fields = update::Fields {
                hostname,
                vendor,
                os_info,
                mac_address,
                status,
            };
            update::update(service, &ip, fields, &cfg).await
        }
        Commands::Reset => reset::reset(service, &cfg).await,
        Commands::Console => commands::console::console(service, &cfg).await,
    }
}
