use std::process::ExitCode;

use log::debug;

use watch_battery::args::{Config, WatchArgs, DEFAULT_LIMIT};
use watch_battery::lock::InstanceLock;
use watch_battery::monitor::Monitor;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // An invalid limit makes argh print the diagnostic and exit 1 here,
    // before the lock is touched.
    let args: WatchArgs = argh::from_env();
    if !args.has_explicit_limit() {
        println!("No limit given, watching with the default of {DEFAULT_LIMIT}%");
    }
    let config = Config::resolve(args);

    let lock = match InstanceLock::acquire() {
        Ok(lock) => lock,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };
    debug!(
        "holding {}, watching {}",
        lock.path().display(),
        config.status_path.display()
    );

    // The monitor never exits on its own; a fatal sysfs error surfaces here
    // as Err, and returning (instead of exiting in the task) lets the lock
    // guard drop and release.
    let result = tokio::spawn(Monitor::new(&config).run()).await;
    drop(lock);
    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("battery watch task failed: {err}");
            ExitCode::FAILURE
        }
    }
}
