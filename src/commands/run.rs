// src/commands/run.rs

use crate::config::AppConfig;
use crate::detection::{self, FocusProbe};
use crate::errors::{AppError, AppResult};
use crate::persistence::{self, LogStore};
use crate::tracking::Tracker;
use log::info;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// How often the foreground thread checks for Ctrl+C and the session deadline.
const WAIT_POLL: Duration = Duration::from_millis(200);

pub fn execute(
    app_config: &AppConfig,
    duration_minutes: Option<u64>,
    export_file: Option<&Path>,
) -> AppResult<()> {
    println!("Starting {} tracker (run command)...", app_config.app_name);
    match duration_minutes {
        Some(minutes) => println!("Session ends after {} minute(s) or on Ctrl+C.", minutes),
        None => println!("Press Ctrl+C to stop."),
    }
    info!(
        "Data directory: {:?} (storage: {:?}, key: '{}')",
        app_config.data_dir, app_config.storage, app_config.log_key
    );

    let store = LogStore::new(persistence::open_store(app_config)?, app_config.log_key.clone());
    let probe: Arc<dyn FocusProbe> = Arc::from(detection::create_probe(app_config));
    let tracker = Tracker::new(probe, store, app_config.sample_interval);

    // Ctrl+C Handling
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nCtrl+C detected. Shutting down tracker...");
        r.store(false, Ordering::SeqCst);
    })?;

    // Stands in for the session registry's timer: stop once the booked
    // duration has passed.
    let deadline = duration_minutes
        .map(|minutes| Instant::now() + Duration::from_secs(minutes.saturating_mul(60)));

    tracker.start()?;
    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            info!("Session duration reached.");
            break;
        }
        thread::sleep(WAIT_POLL);
    }
    tracker.stop();

    let report = tracker.get_report(None);
    let text = report.export_text();

    println!("\n--- Activity for {} ---", report.day());
    if report.is_empty() {
        println!("No activity recorded.");
    } else {
        print!("{text}");
    }

    if let Some(path) = export_file {
        fs::write(path, &text).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        println!("Exported {} line(s) to {:?}.", report.entries().len(), path);
    }

    println!("Tracker stopped.");
    Ok(())
}
