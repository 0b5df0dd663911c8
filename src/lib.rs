pub mod args;
pub mod battery;
pub mod lock;
pub mod monitor;
pub mod notify;

use std::time::Duration;

pub const LOCK_FILE_NAME: &str = ".watch-battery.lock";
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
