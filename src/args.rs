use std::path::PathBuf;

use argh::FromArgs;

use crate::battery;

pub const DEFAULT_LIMIT: u8 = 10;
pub const DEFAULT_NOTIFY_CMD: &str = "/usr/bin/notify-send";

#[derive(FromArgs, Debug)]
/// Watch the battery level and notify when it drops to a limit.
pub struct WatchArgs {
    /// full path to the notify command
    #[argh(option)]
    pub notify_cmd: Option<String>,

    /// the battery level when the notification will happen (0-100)
    #[argh(option, from_str_fn(parse_limit))]
    pub limit: Option<u8>,

    /// full path to the file where the status of the battery is stored
    #[argh(option)]
    pub status_path: Option<String>,

    /// full path to the file where the current capacity of the battery is stored
    #[argh(option)]
    pub cap_path: Option<String>,

    /// limit for the simple invocation, same meaning as --limit
    #[argh(positional, from_str_fn(parse_limit))]
    pub limit_arg: Option<u8>,
}

impl WatchArgs {
    /// False only when the limit comes from the built-in default.
    pub fn has_explicit_limit(&self) -> bool {
        self.limit.is_some() || self.limit_arg.is_some()
    }
}

fn parse_limit(value: &str) -> Result<u8, String> {
    match value.parse::<i64>() {
        Ok(n) if (0..=100).contains(&n) => Ok(n as u8),
        _ => Err(format!(
            "The given limit ({value}) is not correct. Only integer values between 0 and 100 are allowed."
        )),
    }
}

/// Immutable settings for the whole run, resolved once at startup.
pub struct Config {
    pub limit: u8,
    pub status_path: PathBuf,
    pub capacity_path: PathBuf,
    pub notify_cmd: PathBuf,
}

impl Config {
    pub fn resolve(args: WatchArgs) -> Self {
        // The --limit flag wins over the positional form.
        let limit = args.limit.or(args.limit_arg).unwrap_or(DEFAULT_LIMIT);
        let (status_path, capacity_path) = match (args.status_path, args.cap_path) {
            (Some(status), Some(cap)) => (PathBuf::from(status), PathBuf::from(cap)),
            (status, cap) => {
                let supply = battery::default_supply_dir();
                (
                    status.map(PathBuf::from).unwrap_or_else(|| supply.join("status")),
                    cap.map(PathBuf::from).unwrap_or_else(|| supply.join("capacity")),
                )
            }
        };
        Self {
            limit,
            status_path,
            capacity_path,
            notify_cmd: PathBuf::from(
                args.notify_cmd.unwrap_or_else(|| DEFAULT_NOTIFY_CMD.into()),
            ),
        }
    }
}
