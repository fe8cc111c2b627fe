use std::{path::PathBuf, time::Duration};

use clap::builder::styling::AnsiColor;
use clap::builder::{PossibleValue, Styles};
use clap::{ArgGroup, Parser};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::Cyan.on_default())
}

fn parse_sleep(value: &str) -> Result<Duration, String> {
    let seconds = value
        .parse::<f64>()
        .map_err(|_| format!("invalid number: {}", value))?;
    if !seconds.is_finite() {
        return Err("sleep time must be a finite number".to_string());
    }
    if seconds < 0.0 {
        return Err("sleep time cannot be a negative number".to_string());
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("invalid sleep time {}: {}", value, e))
}

/// Get geolocation from an IP address or hostname, using 'ip-api.com',
/// 'freegeoip.app', 'ipinfo.io', 'coding.tools' or a local city-level
/// database (e.g. db-ip.com "IP to City Lite" mmdb).
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    styles = get_styles(),
    group(ArgGroup::new("target").required(true).args(["address", "input_file"]))
)]
pub struct Cli {
    /// IP address or hostname to locate.
    #[arg(value_name = "IP|HOSTNAME")]
    pub address: Option<String>,

    /// Geolocation API to use.
    #[arg(
        short = 'g',
        long = "api",
        default_value = "ipapi",
        value_parser([
            PossibleValue::new("ipapi"),
            PossibleValue::new("freegeoip"),
            PossibleValue::new("ipinfo"),
            PossibleValue::new("coding"),
        ])
    )]
    pub api: String,

    /// Time in seconds to sleep between HTTP requests.
    #[arg(
        short = 's',
        long = "sleep",
        default_value = "1.5",
        allow_negative_numbers = true,
        value_parser = parse_sleep
    )]
    pub sleep: Duration,

    /// Timeout in seconds to wait for a reply.
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Local lookup using a city-level mmdb database instead of an API.
    #[arg(short = 'd', long = "database")]
    pub database_file: Option<PathBuf>,

    /// Read IPs/hostnames from this file, one per line.
    #[arg(short = 'i', long = "input")]
    pub input_file: Option<PathBuf>,

    /// Append geolocation results to this file.
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Log level for diagnostics on stderr.
    #[arg(
        long = "log",
        default_value = "off",
        value_parser([
            PossibleValue::new("debug"),
            PossibleValue::new("info"),
            PossibleValue::new("warn"),
            PossibleValue::new("error"),
            PossibleValue::new("trace"),
            PossibleValue::new("off"),
        ])
    )]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["ipgeo", "8.8.8.8"]).unwrap();
        assert_eq!(cli.address.as_deref(), Some("8.8.8.8"));
        assert_eq!(cli.api, "ipapi");
        assert_eq!(cli.sleep, Duration::from_millis(1500));
        assert_eq!(cli.timeout, 5);
        assert!(cli.database_file.is_none());
        assert!(cli.input_file.is_none());
        assert!(cli.output_file.is_none());
    }

    #[test]
    fn input_file_alone_is_enough() {
        let cli = Cli::try_parse_from(["ipgeo", "-i", "hosts.txt", "-g", "ipinfo", "-s", "0"]).unwrap();
        assert_eq!(cli.input_file, Some(PathBuf::from("hosts.txt")));
        assert_eq!(cli.api, "ipinfo");
        assert_eq!(cli.sleep, Duration::ZERO);
    }

    #[test]
    fn address_and_input_file_conflict() {
        let err = Cli::try_parse_from(["ipgeo", "8.8.8.8", "-i", "hosts.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn address_or_input_file_is_required() {
        let err = Cli::try_parse_from(["ipgeo", "-g", "coding"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn only_one_address() {
        let err = Cli::try_parse_from(["ipgeo", "8.8.8.8", "1.1.1.1"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn negative_sleep_is_reported_as_such() {
        let err = Cli::try_parse_from(["ipgeo", "8.8.8.8", "-s", "-1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("sleep time cannot be a negative number"));
    }

    #[test]
    fn non_finite_sleep_is_rejected() {
        for value in ["nan", "inf", "NaN"] {
            let err = Cli::try_parse_from(["ipgeo", "8.8.8.8", "-s", value]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{}", value);
            assert!(err.to_string().contains("sleep time must be a finite number"));
            assert!(!err.to_string().contains("negative"));
        }
    }

    #[test]
    fn oversized_sleep_is_a_usage_error() {
        let err = Cli::try_parse_from(["ipgeo", "8.8.8.8", "-s", "1e20"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("invalid sleep time 1e20"));
    }

    #[test]
    fn fractional_sleep() {
        let cli = Cli::try_parse_from(["ipgeo", "8.8.8.8", "-s", "0.25"]).unwrap();
        assert_eq!(cli.sleep, Duration::from_millis(250));
    }

    #[test]
    fn rejects_out_of_range_values() {
        for args in [
            ["ipgeo", "8.8.8.8", "-s", "-1"],
            ["ipgeo", "8.8.8.8", "-t", "0"],
            ["ipgeo", "8.8.8.8", "-g", "maxmind"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", args);
        }
    }
}
