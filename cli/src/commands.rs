pub mod probe;
pub mod reboot;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rebootr_common::config::Config;
use rebootr_common::vendor::Vendor;
use std::time::Duration;
use url::Url;

#[derive(Parser)]
#[command(name = "rebootr")]
#[command(about = "Identifies VoIP phones by their web console, reboots them and measures the downtime.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reboot every phone listed in the targets file
    #[command(alias = "r")]
    Reboot(RebootArgs),
    /// Check which targets answer on the console port
    #[command(alias = "p")]
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct RebootArgs {
    /// File with one address per line
    #[arg(short, long, default_value = "data.txt")]
    pub targets: PathBuf,

    /// Where the result log is written (truncated first)
    #[arg(short, long, default_value = "results.txt")]
    pub results: PathBuf,

    /// TOML file overriding the factory credentials, one table per vendor
    #[arg(short, long)]
    pub credentials: Option<PathBuf>,

    /// WebDriver endpoint used to drive the browser
    #[arg(long, default_value = "http://localhost:9515")]
    pub webdriver: Url,

    /// Order in which vendor detectors are tried
    #[arg(short, long, value_delimiter = ',', default_value = "grandstream,snom,polycom")]
    pub order: Vec<Vendor>,

    /// Port probed to decide whether a phone is up [default: 80]
    #[arg(long)]
    pub port: Option<u16>,

    /// Milliseconds between two probes [default: 500]
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: Option<u64>,

    /// Seconds a rebooted phone gets to come back [default: 200]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub online_timeout: Option<u64>,

    /// Seconds a phone gets to drop off after the reboot click, 0 waits forever [default: 300]
    #[arg(long, value_name = "SECS")]
    pub offline_timeout: Option<u64>,

    /// Milliseconds to pause before each detector attempt [default: 2000]
    #[arg(long, value_name = "MS")]
    pub detector_pause_ms: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub show_browser: bool,
}

impl RebootArgs {
    pub fn config(&self) -> Config {
        let mut cfg = Config::default();
        if let Some(port) = self.port {
            cfg.probe_port = port;
        }
        if let Some(ms) = self.poll_interval_ms {
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = self.online_timeout {
            cfg.online_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.offline_timeout {
            cfg.offline_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(ms) = self.detector_pause_ms {
            cfg.detector_pause = Duration::from_millis(ms);
        }
        cfg.headless = !self.show_browser;
        cfg
    }
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// File with one address per line
    #[arg(short, long, default_value = "data.txt")]
    pub targets: PathBuf,

    /// Port to probe
    #[arg(long, default_value_t = 80)]
    pub port: u16,

    /// Connect timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 2000)]
    pub timeout_ms: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reboot_args(args: &[&str]) -> RebootArgs {
        let mut argv = vec!["rebootr", "reboot"];
        argv.extend_from_slice(args);
        match CommandLine::try_parse_from(argv).unwrap().command {
            Commands::Reboot(args) => args,
            Commands::Probe(_) => panic!("parsed as probe"),
        }
    }

    #[test]
    fn defaults_match_config_defaults() {
        let args = reboot_args(&[]);
        assert_eq!(args.targets, PathBuf::from("data.txt"));
        assert_eq!(args.results, PathBuf::from("results.txt"));
        assert_eq!(args.order, vec![Vendor::Grandstream, Vendor::Snom, Vendor::Polycom]);
        assert_eq!(args.config(), Config::default());
    }

    #[test]
    fn overrides_reach_the_config() {
        let args = reboot_args(&[
            "--order",
            "polycom,snom",
            "--port",
            "8080",
            "--online-timeout",
            "60",
            "--offline-timeout",
            "0",
            "--show-browser",
        ]);
        let cfg = args.config();
        assert_eq!(args.order, vec![Vendor::Polycom, Vendor::Snom]);
        assert_eq!(cfg.probe_port, 8080);
        assert_eq!(cfg.online_timeout, Duration::from_secs(60));
        assert_eq!(cfg.offline_timeout, None);
        assert!(!cfg.headless);
    }

    #[test]
    fn unknown_vendor_is_rejected() {
        let parsed = CommandLine::try_parse_from(["rebootr", "r", "--order", "cisco"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_online_timeout_is_rejected() {
        let parsed = CommandLine::try_parse_from(["rebootr", "r", "--online-timeout", "0"]);
        assert!(parsed.is_err());
        let parsed = CommandLine::try_parse_from(["rebootr", "r", "--poll-interval-ms", "0"]);
        assert!(parsed.is_err());
        assert_eq!(
            reboot_args(&["--online-timeout", "1"]).config().online_timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn probe_alias_and_global_verbose() {
        let cli = CommandLine::try_parse_from(["rebootr", "p", "--port", "443", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Probe(args) => assert_eq!(args.port, 443),
            Commands::Reboot(_) => panic!("parsed as reboot"),
        }
    }
}
