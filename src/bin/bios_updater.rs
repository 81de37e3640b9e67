//! CLI binary for bios-updater.

use bios_updater::firmware::{self, MachineIdentity};
use bios_updater::progress::indicatif_progress;
use bios_updater::update::{DellSupportSource, ElevatedLauncher, HttpInstallerFetcher};
use bios_updater::{ConsolePresenter, Outcome, Status, UpdaterConfig, Updater};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for every failure path.
const FAILURE: u8 = 1;

/// Check Dell's support site for a newer BIOS and launch its installer.
#[derive(Parser)]
#[command(name = "bios-updater", version, about)]
struct Cli {
    /// Look up this service tag instead of the one stored in firmware.
    #[arg(long, value_name = "TAG")]
    service_tag: Option<String>,

    /// Report whether an update exists without downloading it.
    #[arg(long)]
    check_only: bool,

    /// Directory for the installer and log.txt (default: <temp>/BIOS).
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Exit without waiting for a key press or delay.
    #[arg(long)]
    no_pause: bool,

    /// Show the browser window while reading the support site.
    #[arg(long)]
    headed: bool,
}

impl Cli {
    fn into_config(self) -> UpdaterConfig {
        let mut config = UpdaterConfig::default();
        if let Some(dir) = self.scratch_dir {
            config.scratch_dir = dir;
        }
        config.service_tag_override = self.service_tag;
        config.check_only = self.check_only;
        config.support.headless = !self.headed;
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = ConsolePresenter::new(!cli.no_pause);
    let config = cli.into_config();

    if let Err(e) = config.validate() {
        presenter.show(&Status::error(e.to_string()));
        return ExitCode::from(FAILURE);
    }

    // Dropped last, flushing the activity log.
    let _log_guard = match bios_updater::logging::init(&config.scratch_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            presenter.show(&Status::error(format!("Error writing log to file: {e}")));
            None
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            presenter.show(&Status::error(format!("{e:#}")));
            return ExitCode::from(FAILURE);
        }
    };

    match runtime.block_on(run(&config, &presenter)) {
        Ok(outcome) => {
            presenter.pause(outcome.pause());
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            tracing::error!("{e}");
            presenter.show(&Status::error(e.user_message()));
            presenter.pause(e.pause());
            ExitCode::from(FAILURE)
        }
    }
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")
}

async fn run(config: &UpdaterConfig, presenter: &ConsolePresenter) -> bios_updater::Result<Outcome> {
    let fetcher = HttpInstallerFetcher::new(config)?.with_progress(indicatif_progress());

    let updater = Updater::new(
        firmware::create_provider(),
        DellSupportSource::new(config.support.clone()),
        fetcher,
        ElevatedLauncher,
    )
    .with_identity_override(config.service_tag_override.clone().map(MachineIdentity::new))
    .check_only(config.check_only)
    .with_status(presenter.callback());

    updater.run().await
}
