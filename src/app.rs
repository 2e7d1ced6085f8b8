use std::io;

use clap::Parser;
use log::{debug, error, info, warn};

use crate::alert::AlertRecord;
use crate::cli::{self, AlertArgs};
use crate::logging;
use crate::promsaint::{PromsaintClient, PromsaintConfig};

pub const EXIT_OK: i32 = 0;
// Rejected input exits 1, failures while delivering exit 2. A non-2xx answer
// from Promsaint is only logged; the monitoring engine re-invokes on its own.
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_FAILED: i32 = 2;

/// Handles one invocation and returns the process exit code.
pub async fn run(raw: Vec<String>) -> i32 {
    let args = match AlertArgs::try_parse_from(cli::normalize_args(raw.iter().cloned())) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    if args.version {
        return match cli::write_version(&mut io::stdout()) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                eprintln!("Failed to print version: {}", e);
                EXIT_FAILED
            }
        };
    }

    let config = match &args.config {
        Some(path) => match PromsaintConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config from {}: {:#}", path.display(), e);
                return EXIT_INVALID;
            }
        },
        None => PromsaintConfig::default(),
    }
    .with_overrides(args.promsaint.as_deref(), args.notify.as_deref(), args.log_file());

    let log_file = config
        .log_file
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());
    if let Err(e) = logging::init(log_file, args.verbose, raw.join(" ")) {
        eprintln!("{:#}", e);
        return EXIT_FAILED;
    }

    let validated = match args.validate() {
        Ok(validated) => validated,
        Err(e) => {
            error!("{}", e);
            return EXIT_INVALID;
        }
    };
    for warning in &validated.warnings {
        warn!("{}", warning);
    }

    let alert = AlertRecord::from_args(&args, &validated.kind, &config.notify);
    debug!("Alert: {:?}", alert);

    info!("Forwarding to Promsaint");
    let client = match PromsaintClient::new(&config.url) {
        Ok(client) => client,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INVALID;
        }
    };
    let delivery = match client.forward(&alert).await {
        Ok(delivery) => delivery,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_FAILED;
        }
    };

    if let Some(message) = delivery.error_message() {
        error!("{}", message);
        if let Some(body) = &delivery.body {
            debug!("Promsaint response:{}", body);
        }
    }

    EXIT_OK
}
