use anyhow::Result;
use chrono::{Local, SecondsFormat};
use tokio::time;

use crate::args::Config;
use crate::battery::BatterySource;
use crate::notify::Notifier;
use crate::POLL_INTERVAL;

/// Below-limit ticks whose count is a multiple of this are not notified,
/// so out of every five consecutive ticks four fire and one is skipped.
const NOTIFY_SKIP_EVERY: u64 = 5;
/// Cadence of the supplementary `...<capacity - limit>%` line.
const DELTA_LINE_EVERY: u64 = 10;

/// Counters owned exclusively by the poll loop.
struct LoopState {
    charging: bool,
    below_limit_ticks: u64,
    ticks: u64,
}

/// What a single discharging observation asks the loop to do.
struct Tick {
    notify: bool,
    delta_line: Option<i32>,
}

impl LoopState {
    fn new() -> Self {
        Self {
            charging: false,
            below_limit_ticks: 0,
            ticks: 0,
        }
    }

    /// Returns true only on the first non-discharging observation after a
    /// discharging one, so the transition line prints exactly once per edge.
    fn on_charging(&mut self) -> bool {
        let first = !self.charging;
        self.charging = true;
        first
    }

    fn on_discharging(&mut self, capacity: u8, limit: u8) -> Tick {
        self.charging = false;
        let mut notify = false;
        if capacity <= limit {
            // Counting starts at zero, so the very first below-limit tick is
            // skipped and the following four fire.
            notify = self.below_limit_ticks % NOTIFY_SKIP_EVERY != 0;
            self.below_limit_ticks += 1;
        }
        let delta_line = (self.ticks != 0 && self.ticks % DELTA_LINE_EVERY == 0)
            .then(|| i32::from(capacity) - i32::from(limit));
        Tick { notify, delta_line }
    }

    /// Advances the overall tick count, once per loop pass.
    fn end_tick(&mut self) {
        self.ticks += 1;
    }
}

/// The poll loop: samples the battery every two seconds forever. Only a
/// sysfs read failure makes `run` return, and then with an error the caller
/// turns into the process exit.
pub struct Monitor {
    limit: u8,
    source: BatterySource,
    notifier: Notifier,
    state: LoopState,
}

impl Monitor {
    pub fn new(config: &Config) -> Self {
        Self {
            limit: config.limit,
            source: BatterySource::new(&config.status_path, &config.capacity_path),
            notifier: Notifier::new(&config.notify_cmd),
            state: LoopState::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let status = self.source.read_status().await?;
            if status.is_discharging() {
                let capacity = self.source.read_capacity().await?;
                let tick = self.state.on_discharging(capacity, self.limit);
                if tick.notify {
                    self.notifier.notify_low(capacity, self.limit);
                }
                let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
                println!("{now} {capacity}%");
                if let Some(delta) = tick.delta_line {
                    println!("...{delta}%");
                }
            } else if self.state.on_charging() {
                println!("---Charging---");
            }
            time::sleep(POLL_INTERVAL).await;
            self.state.end_tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_of_five_below_limit_ticks_notify() {
        let mut state = LoopState::new();
        let fired: Vec<bool> = (0..10)
            .map(|_| state.on_discharging(5, 10).notify)
            .collect();
        assert_eq!(
            fired,
            [false, true, true, true, true, false, true, true, true, true]
        );
    }

    #[test]
    fn capacity_equal_to_the_limit_counts_as_below() {
        let mut state = LoopState::new();
        state.on_discharging(10, 10);
        assert_eq!(state.below_limit_ticks, 1);
    }

    #[test]
    fn above_limit_ticks_do_not_advance_the_throttle() {
        let mut state = LoopState::new();
        for _ in 0..7 {
            assert!(!state.on_discharging(50, 10).notify);
        }
        assert_eq!(state.below_limit_ticks, 0);
        // the pattern still starts at the skipped tick afterwards
        assert!(!state.on_discharging(5, 10).notify);
        assert!(state.on_discharging(5, 10).notify);
    }

    #[test]
    fn charging_line_is_edge_triggered() {
        let mut state = LoopState::new();
        assert!(state.on_charging());
        assert!(!state.on_charging());
        assert!(!state.on_charging());
        state.on_discharging(50, 10);
        assert!(state.on_charging());
        assert!(!state.on_charging());
    }

    #[test]
    fn delta_line_prints_every_tenth_overall_tick() {
        let mut state = LoopState::new();
        let mut deltas = Vec::new();
        for _ in 0..21 {
            deltas.push(state.on_discharging(5, 10).delta_line);
            state.end_tick();
        }
        for (i, delta) in deltas.iter().enumerate() {
            if i != 0 && i % 10 == 0 {
                assert_eq!(*delta, Some(-5), "tick {i}");
            } else {
                assert_eq!(*delta, None, "tick {i}");
            }
        }
    }

    #[test]
    fn charging_ticks_still_advance_the_delta_cadence() {
        let mut state = LoopState::new();
        for _ in 0..10 {
            state.on_charging();
            state.end_tick();
        }
        assert_eq!(state.on_discharging(5, 10).delta_line, Some(-5));
    }
}
