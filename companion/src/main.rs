//! zoomer-sync: polls the conferencing app through a status script and keeps
//! the pad's mic and camera indicators in step with it.

mod device;
mod meeting;

use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hidapi::HidApi;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zoomer_keymap::Status;

use device::{Filter, Pad};
use meeting::Meeting;

#[derive(Parser)]
#[command(name = "zoomer-sync", version, about)]
struct Cli {
    /// Seconds between status polls
    #[arg(long, default_value_t = 3, value_name = "SECS")]
    interval: u64,

    /// Shell command that prints the meeting state as JSON
    #[arg(long, env = "ZOOMER_STATUS_CMD", default_value = "osascript zoomer.scpt")]
    command: String,

    /// Poll once and exit
    #[arg(long)]
    once: bool,

    /// Match any vendor and product id, only the raw-HID usage page
    #[arg(long)]
    any_device: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Write one status code (1-4) to the pad and exit
    Send {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        code: u8,
    },
    /// List raw-HID interfaces that look like the pad
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let api = HidApi::new().context("Failed to initialize HID API")?;
    let filter = if cli.any_device {
        Filter {
            vendor_id: None,
            product_id: None,
        }
    } else {
        Filter::default()
    };

    match &cli.action {
        Some(Action::List) => {
            let mut found = 0;
            for info in device::matching(&api, &filter) {
                found += 1;
                println!(
                    "{:04x}:{:04x} {} {:?}",
                    info.vendor_id(),
                    info.product_id(),
                    info.product_string().unwrap_or("?"),
                    info.path()
                );
            }
            if found == 0 {
                println!("No controller plugged in");
            }
            Ok(())
        }
        Some(Action::Send { code }) => {
            let status = Status::from_code(*code)
                .map_err(|e| anyhow::anyhow!("bad status code {code}: {e:?}"))?;
            let pad = Pad::open(&api, &filter)?;
            pad.send(status)?;
            info!("{} <- {}", pad.name(), status.describe());
            Ok(())
        }
        None => run(&cli, api, &filter),
    }
}

fn run(cli: &Cli, mut api: HidApi, filter: &Filter) -> Result<()> {
    let mut pad = Some(Pad::open(&api, filter)?);
    let interval = Duration::from_secs(cli.interval.max(1));

    loop {
        if pad.is_none() {
            if let Err(e) = api.refresh_devices() {
                warn!("Failed to refresh HID devices: {e}");
            }
            match Pad::open(&api, filter) {
                Ok(p) => pad = Some(p),
                Err(e) => warn!("{e:#}"),
            }
        }
        if let Some(p) = &pad {
            if let Err(e) = sync_once(&cli.command, p) {
                error!("{e:#}");
                if cli.once {
                    return Err(e);
                }
                // drop the handle so the next pass reconnects
                pad = None;
            }
        }
        if cli.once {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

fn sync_once(command: &str, pad: &Pad) -> Result<()> {
    let stdout = match status_script(command) {
        Ok(out) => out,
        Err(e) => {
            // the app may simply not be running; keep the pad connection
            warn!("{e:#}");
            return Ok(());
        }
    };
    match Meeting::parse(&stdout) {
        Ok(Meeting::Closed) => info!("you need to open the meeting app"),
        Ok(Meeting::Open) => info!("no active meeting"),
        Ok(Meeting::Call(status)) => {
            info!("{}", status.describe());
            pad.send(status)?;
        }
        Err(e) => warn!("{e}"),
    }
    Ok(())
}

fn status_script(command: &str) -> Result<String> {
    #[cfg(windows)]
    let output = Command::new("cmd").args(["/C", command]).output();
    #[cfg(not(windows))]
    let output = Command::new("sh").args(["-c", command]).output();

    let output = output.with_context(|| format!("Failed to run `{command}`"))?;
    if !output.status.success() {
        bail!(
            "`{command}` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
