//! Logger that accumulates messages in a buffer, so that tests can assert on what was logged.
//!
//! # Examples
//!
//! ```
//! # use testing::logger;
//! logger::init(log::LevelFilter::Info).unwrap();
//! log::info!("Revenue: 20");
//! log::debug!("Not captured");
//! log::warn!("No arrivals at station 2");
//! assert_eq!(
//!     logger::take(),
//!     vec![
//!         String::from("[INFO]  Revenue: 20"),
//!         String::from("[WARN]  No arrivals at station 2"),
//!     ]
//! );
//! assert!(logger::take().is_empty());
//! ```

use std::sync::{Arc, Mutex};

use log::LevelFilter;

lazy_static::lazy_static! {
    static ref LOG_BUFFER: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    static ref INITIALIZED: Mutex<bool> = Mutex::new(false);
}

/// Installs the buffering logger at the given level. Subsequent calls are no-ops.
///
/// # Errors
///
/// Fails if a different logger has already been installed.
///
/// # Panics
///
/// Panics if a thread panicked while holding the buffer.
pub fn init(level: LevelFilter) -> Result<(), fern::InitError> {
    let mut initialized = INITIALIZED.lock().expect("Poisoned lock");
    if !*initialized {
        let buffer = Arc::clone(&LOG_BUFFER);
        fern::Dispatch::new()
            .level(level)
            .chain(fern::Output::call(move |record| {
                buffer.lock().expect("Poisoned lock").push(format!(
                    "{:7} {}",
                    format!("[{}]", record.level()),
                    record.args()
                ));
            }))
            .apply()?;
        *initialized = true;
    }
    Ok(())
}

/// Clears the buffer and returns its contents.
///
/// # Panics
///
/// Panics if a thread panicked while holding the buffer.
#[must_use]
pub fn take() -> Vec<String> {
    LOG_BUFFER.lock().expect("Poisoned lock").drain(..).collect()
}
