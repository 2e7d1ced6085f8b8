use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};

use crate::alert::AlertKind;
use crate::duration::{parse_fire_period, FirePeriod};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const BUILD_TIME: &str = match option_env!("PROMSAINT_BUILD_TIME") {
    Some(built) => built,
    None => "unknown",
};

pub const OVERRIDE_IGNORED: &str =
    "If one of -hostalert or -servicealert is set, -alert-type is ignored";

/// Flags passed by the monitoring engine for a single notification.
///
/// Boolean flags take no value or an inline one (`-hostalert=false`), so a
/// following flag is never swallowed as their argument.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "promsaint-cli")]
#[command(about = "Forward a host or service notification to a Promsaint daemon")]
#[command(disable_version_flag = true)]
pub struct AlertArgs {
    /// This is a host alert
    #[arg(long = "hostalert", action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value = "false", default_missing_value = "true",
          value_parser = BoolishValueParser::new())]
    pub host_alert: bool,

    /// This is a service alert
    #[arg(long = "servicealert", action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value = "false", default_missing_value = "true",
          value_parser = BoolishValueParser::new())]
    pub service_alert: bool,

    /// Value of notify label [default: blackhole]
    #[arg(long, allow_hyphen_values = true)]
    pub notify: Option<String>,

    /// PROBLEM / ACKNOWLEDGEMENT / RECOVERY
    #[arg(long = "ntype", default_value = "", allow_hyphen_values = true)]
    pub notification_type: String,

    /// Host states: UP / DOWN. Service states: CRITICAL / WARNING / UNKNOWN / OK
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub state: String,

    /// Hostname of firing alert
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub host: String,

    /// Servicename of firing alert
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub service: String,

    /// Alternative alert type
    #[arg(long = "alert-type", default_value = "", allow_hyphen_values = true)]
    pub alert_type: String,

    /// Name of firing alert, when type is not service or host
    #[arg(long = "alert-name", default_value = "", allow_hyphen_values = true)]
    pub alert_name: String,

    /// Service output
    #[arg(long = "msg", default_value = "", allow_hyphen_values = true)]
    pub message: String,

    /// Service note (reference link)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub note: String,

    /// Url of running Promsaint daemon to post to [default: http://localhost:8080]
    #[arg(long)]
    pub promsaint: Option<String>,

    /// Log all info to file; empty logs to stdout
    #[arg(long = "log.file")]
    pub log_file: Option<String>,

    /// Print version information
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value = "false", default_missing_value = "true",
          value_parser = BoolishValueParser::new())]
    pub version: bool,

    /// The period in which the alert fires
    #[arg(long = "fire-period", default_value = "0s", allow_hyphen_values = true,
          value_parser = parse_fire_period)]
    pub fire_period: FirePeriod,

    /// Path to a TOML file with [promsaint] defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value = "false", default_missing_value = "true",
          value_parser = BoolishValueParser::new())]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("One of -hostalert or -servicealert or -alert-type must be set")]
    MissingAlertType,

    #[error("When -alert-type is set, -alert-name needs to be set as well")]
    MissingAlertName,

    #[error("Only one of -hostalert or -servicealert can be set")]
    ConflictingAlertType,
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub kind: AlertKind,
    pub warnings: Vec<&'static str>,
}

impl AlertArgs {
    /// The log file to append to, if a non-empty one was given.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(Path::new)
    }

    pub fn validate(&self) -> Result<Validated, ValidationError> {
        let has_override = !self.alert_type.is_empty();
        let mut warnings = Vec::new();

        if !self.host_alert && !self.service_alert && !has_override {
            return Err(ValidationError::MissingAlertType);
        }

        if (self.host_alert || self.service_alert) && has_override {
            warnings.push(OVERRIDE_IGNORED);
        }

        if has_override && self.alert_name.is_empty() {
            return Err(ValidationError::MissingAlertName);
        }

        if self.host_alert && self.service_alert {
            return Err(ValidationError::ConflictingAlertType);
        }

        let kind = if self.host_alert {
            AlertKind::Host
        } else if self.service_alert {
            AlertKind::Service
        } else {
            AlertKind::Custom(self.alert_type.clone())
        };

        Ok(Validated { kind, warnings })
    }
}

/// Rewrites single-dash long flags (`-hostalert`, `-log.file=x`) into the
/// double-dash form. Values that follow a flag are passed through untouched.
///
/// Flag parsing ends at `--` or at the first token that is not a flag, and
/// everything from there on is dropped, the way Go's `flag.Parse` leaves
/// trailing arguments unread.
pub fn normalize_args<I, T>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let command = AlertArgs::command();
    let mut tokens = raw.into_iter().map(Into::into);
    let mut normalized: Vec<String> = tokens.next().into_iter().collect();

    while let Some(token) = tokens.next() {
        if token == "--" || token == "-" || !token.starts_with('-') {
            break;
        }

        let single_dash = !token.starts_with("--");
        let Some(flag) = token.strip_prefix("--").or_else(|| token.strip_prefix('-')) else {
            normalized.push(token);
            continue;
        };
        let (name, inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };
        let Some(arg) = command.get_arguments().find(|arg| arg.get_long() == Some(name)) else {
            normalized.push(token);
            continue;
        };
        let expects_value =
            !inline_value && arg.get_action().takes_values() && !arg.is_require_equals_set();

        normalized.push(if single_dash { format!("-{token}") } else { token });
        if expects_value {
            if let Some(value) = tokens.next() {
                normalized.push(value);
            }
        }
    }

    normalized
}

/// Writes the two-line version banner.
pub fn write_version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Version: {VERSION}")?;
    writeln!(out, "Built:   {BUILD_TIME}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AlertArgs {
        let mut raw = vec!["promsaint-cli"];
        raw.extend_from_slice(args);
        AlertArgs::try_parse_from(normalize_args(raw)).expect("valid flags")
    }

    #[test]
    fn test_parse_go_style_flags() {
        let args = parse(&[
            "-hostalert",
            "-notify",
            "Slack",
            "-ntype=PROBLEM",
            "-state",
            "DOWN",
            "-host",
            "db01",
            "-msg",
            "PING CRITICAL",
            "-fire-period",
            "5m",
            "-log.file=/tmp/promsaint.log",
        ]);

        assert!(args.host_alert);
        assert!(!args.service_alert);
        assert_eq!(args.notify.as_deref(), Some("Slack"));
        assert_eq!(args.notification_type, "PROBLEM");
        assert_eq!(args.state, "DOWN");
        assert_eq!(args.host, "db01");
        assert_eq!(args.message, "PING CRITICAL");
        assert_eq!(args.fire_period.to_string(), "5m0s");
        assert_eq!(args.log_file(), Some(Path::new("/tmp/promsaint.log")));
        assert_eq!(args.promsaint, None);
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&[]);

        assert!(!args.host_alert);
        assert!(!args.version);
        assert_eq!(args.notify, None);
        assert_eq!(args.alert_type, "");
        assert_eq!(args.fire_period, FirePeriod::default());
        assert_eq!(args.log_file(), None);
    }

    #[test]
    fn test_empty_log_file_logs_to_stdout() {
        let args = parse(&["-hostalert", "-log.file="]);
        assert!(args.host_alert);
        assert_eq!(args.log_file(), None);

        let args = parse(&["-hostalert", "-log.file", ""]);
        assert_eq!(args.log_file(), None);
    }

    #[test]
    fn test_negative_fire_period_is_forwarded() {
        let args = parse(&["-hostalert", "-fire-period", "-5m"]);
        assert!(args.fire_period.negative);
        assert_eq!(args.fire_period.to_string(), "-5m0s");
    }

    #[test]
    fn test_bool_flags_take_inline_values() {
        let args = parse(&["-hostalert=false", "--servicealert=true", "-host", "web01"]);
        assert!(!args.host_alert);
        assert!(args.service_alert);
        assert_eq!(args.host, "web01");
    }

    #[test]
    fn test_values_starting_with_hyphen_are_kept() {
        let args = parse(&["-servicealert", "-msg", "-host", "-service", "--note"]);

        assert!(args.service_alert);
        assert_eq!(args.message, "-host");
        assert_eq!(args.service, "--note");
        assert_eq!(args.host, "");
    }

    #[test]
    fn test_invalid_fire_period_is_rejected() {
        let raw = normalize_args(["promsaint-cli", "-hostalert", "-fire-period", "ten minutes"]);
        assert!(AlertArgs::try_parse_from(raw).is_err());
    }

    #[test]
    fn test_normalize_leaves_unknown_flags() {
        let raw = normalize_args(["promsaint-cli", "-v", "-5", "-bogus", "--notify=ops"]);
        assert_eq!(raw, vec!["promsaint-cli", "-v", "-5", "-bogus", "--notify=ops"]);
    }

    #[test]
    fn test_parsing_stops_at_first_bare_argument() {
        let args = parse(&["-hostalert", "extra", "-host", "h"]);
        assert!(args.host_alert);
        assert_eq!(args.host, "");

        let args = parse(&["-servicealert", "-service", "disk space", "--", "-hostalert"]);
        assert!(args.service_alert);
        assert!(!args.host_alert);
        assert_eq!(args.service, "disk space");

        let raw = normalize_args(["promsaint-cli", "-hostalert", "-", "-host", "h"]);
        assert_eq!(raw, vec!["promsaint-cli", "--hostalert"]);
    }

    #[test]
    fn test_validate_requires_an_alert_type() {
        let args = AlertArgs::default();
        assert_eq!(args.validate(), Err(ValidationError::MissingAlertType));
    }

    #[test]
    fn test_validate_rejects_host_and_service() {
        let args = AlertArgs {
            host_alert: true,
            service_alert: true,
            ..AlertArgs::default()
        };
        assert_eq!(args.validate(), Err(ValidationError::ConflictingAlertType));
    }

    #[test]
    fn test_validate_override_requires_name() {
        let args = AlertArgs {
            alert_type: "custom".to_string(),
            ..AlertArgs::default()
        };
        assert_eq!(args.validate(), Err(ValidationError::MissingAlertName));
    }

    #[test]
    fn test_validate_accepts_override_with_name() {
        let args = parse(&["-alert-type", "custom", "-alert-name", "diskfull"]);
        let validated = args.validate().expect("valid override");

        assert_eq!(validated.kind, AlertKind::Custom("custom".to_string()));
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn test_validate_host_wins_over_override() {
        let args = parse(&["-hostalert", "-alert-type", "custom", "-alert-name", "diskfull"]);
        let validated = args.validate().expect("host alert");

        assert_eq!(validated.kind, AlertKind::Host);
        assert_eq!(validated.warnings, vec![OVERRIDE_IGNORED]);
    }

    #[test]
    fn test_validate_service_alert() {
        let args = parse(&["-servicealert", "-service", "HTTP"]);
        let validated = args.validate().expect("service alert");

        assert_eq!(validated.kind, AlertKind::Service);
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn test_version_flag_skips_alert_flags() {
        let args = parse(&["-version"]);
        assert!(args.version);
    }

    #[test]
    fn test_version_banner_has_two_lines() -> io::Result<()> {
        let mut out = Vec::new();
        write_version(&mut out)?;

        let banner = String::from_utf8(out).expect("utf-8 banner");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Version: {VERSION}"));
        assert!(lines[1].starts_with("Built:   "));
        Ok(())
    }
}
