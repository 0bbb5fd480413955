use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::{env, path::PathBuf};

use crate::{config, input, pipeline};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if env::args().len() == 1 || pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let config_path: Option<PathBuf> = pargs.opt_value_from_str("--config")?;

    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("watch") => {
            let tun = config::load(config_path.as_deref())?;
            pipeline::run_live(&tun, None)
        }

        Some("record") => {
            let out: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: gesturepad record <out.json>"))?;
            let tun = config::load(config_path.as_deref())?;
            pipeline::run_live(&tun, Some(&out))
        }

        Some("replay") => {
            let trace: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: gesturepad replay <trace.json>"))?;
            let tun = config::load(config_path.as_deref())?;
            pipeline::replay(&trace, &tun)
        }

        Some("devices") => {
            let devices = input::discover_multitouch();
            if devices.is_empty() {
                println!("no multitouch devices detected");
            }
            for d in devices {
                println!("{} ({})", d.name, d.path);
            }
            Ok(())
        }

        Some("doctor") => {
            let report = config::doctor_report();
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!(
        r#"gesturepad — multitouch drag/pinch visualizer

USAGE:
  gesturepad help [command]        Show general or command-specific help
  gesturepad watch                 Interpret gestures live from touch devices
  gesturepad record <out.json>     Watch and record the pointer-event trace
  gesturepad replay <trace.json>   Replay a recorded trace deterministically
  gesturepad devices               List detected multitouch devices
  gesturepad doctor                Diagnose permissions/devices

OPTIONS:
  --config <path>                  Use an alternate tunables file

TIPS:
  - One finger drags the rectangle, two fingers stretch it per axis
  - Tunables: ~/.config/gesturepad/config.toml
  - Logs: RUST_LOG=debug gesturepad watch
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "watch" => println!(
            "usage: gesturepad watch\nRuns the interpreter against live touch input until SIGINT."
        ),
        "record" => println!(
            "usage: gesturepad record <out.json>\nLike watch, and writes the decoded pointer events as a JSON trace."
        ),
        "replay" => println!(
            "usage: gesturepad replay <trace.json>\nFeeds a recorded trace through the interpreter and prints the result."
        ),
        "devices" => {
            println!("usage: gesturepad devices\nLists devices speaking the MT slot protocol.")
        }
        "doctor" => println!(
            "usage: gesturepad doctor\nChecks /dev/input access and input-group membership."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}
