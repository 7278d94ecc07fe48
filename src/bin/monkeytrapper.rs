// Monkeytrapper CLI
// Scroll normalizer for the Mousetrapper, run as a long-lived service

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use monkeytrapper_core::{
    session, Config, SessionError, Termination, EXIT_FAILURE, EXIT_OK,
};

/// Grab a Mousetrapper and re-emit it with a normalized scroll wheel
#[derive(Parser, Debug)]
#[command(name = "monkeytrapper")]
#[command(version)]
#[command(about = "Grab a Mousetrapper and re-emit it with a normalized scroll wheel", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Substring of the source device's physical path
    #[arg(long, value_name = "PHYS")]
    phys: Option<String>,

    /// Substring of the source device's name
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Name of the virtual device
    #[arg(long, value_name = "NAME")]
    virtual_name: Option<String>,

    /// Wheel step written for each rewritten scroll event
    #[arg(long, value_name = "STEP")]
    scroll_value: Option<i32>,

    /// Only rewrite fast-edge scrolling, keep native acceleration below it
    #[arg(long)]
    allow_accel: bool,

    /// Rewrite every scroll step, even if the config allows acceleration
    #[arg(long, conflicts_with = "allow_accel")]
    no_allow_accel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config, print it and exit
    #[arg(long)]
    check_config: bool,

    /// List available input devices
    #[arg(long)]
    list_devices: bool,
}

impl Args {
    /// Load the config file and apply command line overrides on top
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref()).with_context(|| match &self.config {
            Some(path) => format!("Could not load config {}", path.display()),
            None => "Could not load default config".to_string(),
        })?;

        if let Some(phys) = &self.phys {
            config.device.phys = phys.clone();
        }
        if let Some(name) = &self.name {
            config.device.name = name.clone();
        }
        if let Some(virtual_name) = &self.virtual_name {
            config.output.name = virtual_name.clone();
        }
        if let Some(value) = self.scroll_value {
            config.scroll.value = value;
        }
        if self.allow_accel {
            config.scroll.allow_accel = true;
        }
        if self.no_allow_accel {
            config.scroll.allow_accel = false;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn list_devices(config: &Config) {
    let devices = monkeytrapper_core::list_devices(&config.device);
    if devices.is_empty() {
        println!("No input devices found (are you in the input group?)");
        return;
    }

    println!("Found {} input device(s):", devices.len());
    for device in &devices {
        let marker = if device.matched { "*" } else { " " };
        println!(
            "{} {}: {} [{}]",
            marker,
            device.path.display(),
            device.name,
            device.phys.as_deref().unwrap_or("")
        );
    }
}

fn exit_code_for(result: &anyhow::Result<Termination>) -> u8 {
    match result {
        Ok(_) => EXIT_OK,
        Err(e) => e
            .downcast_ref::<SessionError>()
            .map(SessionError::exit_code)
            .unwrap_or(EXIT_FAILURE),
    }
}

fn run(args: &Args) -> anyhow::Result<Termination> {
    let config = args.resolve_config()?;
    log::debug!("Effective configuration: {:?}", config);

    let termination = session::run(&config)?;
    log::info!("Stopped: {:?}", termination);
    Ok(termination)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_devices || args.check_config {
        let config = match args.resolve_config() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return ExitCode::from(EXIT_FAILURE);
            }
        };
        if args.list_devices {
            list_devices(&config);
        } else {
            match config.to_toml() {
                Ok(rendered) => {
                    println!("Configuration is valid");
                    print!("{}", rendered);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_FAILURE);
                }
            }
        }
        return ExitCode::from(EXIT_OK);
    }

    let result = run(&args);
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    ExitCode::from(exit_code_for(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkeytrapper_core::{ScrollMode, ScrollRule, EXIT_DEVICE_NOT_FOUND};

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["monkeytrapper", "--config", "/tmp/test.toml"]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
        assert!(args.phys.is_none());
        assert!(!args.allow_accel);
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_devices);
    }

    #[test]
    fn test_args_with_overrides() {
        let args = Args::parse_from([
            "monkeytrapper",
            "--phys",
            "usb-0000:00:1d.0-1/input0",
            "--name",
            "Mousetrapper",
            "--virtual-name",
            "Trapped",
            "--scroll-value",
            "5",
            "--allow-accel",
            "--verbose",
        ]);

        assert_eq!(args.phys.as_deref(), Some("usb-0000:00:1d.0-1/input0"));
        assert_eq!(args.name.as_deref(), Some("Mousetrapper"));
        assert_eq!(args.virtual_name.as_deref(), Some("Trapped"));
        assert_eq!(args.scroll_value, Some(5));
        assert!(args.allow_accel);
        assert!(args.verbose);
    }

    #[test]
    fn test_overrides_apply_on_top_of_config_file() {
        let path = std::env::temp_dir().join(format!("monkeytrapper-test-{}.toml", std::process::id()));
        std::fs::write(&path, "[scroll]\nvalue = 4\n").unwrap();

        let args = Args::parse_from([
            "monkeytrapper",
            "--config",
            path.to_str().unwrap(),
            "--allow-accel",
            "--virtual-name",
            "Trapped",
        ]);
        let config = args.resolve_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.scroll_rule(), ScrollRule::new(ScrollMode::Threshold, 4));
        assert_eq!(config.output.name, "Trapped");
    }

    #[test]
    fn test_no_allow_accel_overrides_config_file() {
        let path = std::env::temp_dir().join(format!("monkeytrapper-accel-{}.toml", std::process::id()));
        std::fs::write(&path, "[scroll]\nallow_accel = true\n").unwrap();

        let args = Args::parse_from(["monkeytrapper", "--config", path.to_str().unwrap(), "--no-allow-accel"]);
        let config = args.resolve_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.scroll.mode(), ScrollMode::Fixed);
    }

    #[test]
    fn test_accel_flags_conflict() {
        let result = Args::try_parse_from(["monkeytrapper", "--allow-accel", "--no-allow-accel"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let path = std::env::temp_dir().join(format!("monkeytrapper-invalid-{}.toml", std::process::id()));
        std::fs::write(&path, "").unwrap();

        let args = Args::parse_from([
            "monkeytrapper",
            "--config",
            path.to_str().unwrap(),
            "--scroll-value",
            "0",
        ]);
        let result = args.resolve_config();
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&Ok(Termination::Shutdown)), EXIT_OK);

        let not_found: anyhow::Result<Termination> = Err(SessionError::DeviceNotFound {
            phys: "input1".to_string(),
            name: "Mousetrapper".to_string(),
        }
        .into());
        assert_eq!(exit_code_for(&not_found), EXIT_DEVICE_NOT_FOUND);

        let grab: anyhow::Result<Termination> =
            Err(SessionError::GrabFailed(std::io::Error::from_raw_os_error(16)).into());
        assert_eq!(exit_code_for(&grab), EXIT_FAILURE);

        let config: anyhow::Result<Termination> = Err(anyhow::anyhow!("bad config"));
        assert_eq!(exit_code_for(&config), EXIT_FAILURE);
    }
}
