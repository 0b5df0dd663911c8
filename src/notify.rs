use std::path::PathBuf;

use log::warn;
use tokio::process::Command;

/// Fire-and-forget launcher for the external desktop notifier.
pub struct Notifier {
    cmd: PathBuf,
}

impl Notifier {
    pub fn new(cmd: impl Into<PathBuf>) -> Self {
        Self { cmd: cmd.into() }
    }

    /// Spawn the notifier with the low-battery message. The child inherits
    /// our stdio and is never waited on; a broken or missing notifier must
    /// not stop the watch, so launch failures only log a warning.
    pub fn notify_low(&self, capacity: u8, limit: u8) {
        let spawned = Command::new(&self.cmd)
            .args(notification_args(capacity, limit))
            .spawn();
        if let Err(err) = spawned {
            warn!("failed to launch notifier {}: {err}", self.cmd.display());
        }
    }
}

fn notification_args(capacity: u8, limit: u8) -> [String; 6] {
    [
        "--urgency=normal".into(),
        "--expire-time=0".into(),
        "--app-name=Battery".into(),
        "--icon=battery-empty".into(),
        format!("Low battery ({capacity}%)"),
        format!("the limit of {limit}% was reached"),
    ]
}
