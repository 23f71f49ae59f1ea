//! Recording of rule lifecycle messages and report entries.

use std::io::Write;
use std::sync::Mutex;

use crate::recordable::Recordable;

/// Abstracts where rule output goes so the engine never writes logs or
/// files directly. Swapping the sink (log files, a message queue) requires
/// no change to the rules.
#[cfg_attr(test, mockall::automock)]
pub trait Recorder {
    /// Record a rule state change ("starting", "complete").
    fn record_state(&self, rule_name: &str, msg: &str);
    /// Record a rule failure with full error detail.
    fn record_error(&self, rule_name: &str, detail: &str);
    /// Record a free-form reporting message, e.g. the rule description.
    fn record_message(&self, rule_name: &str, msg: &str);
    /// Record one report entry (a violation or a statistic).
    fn record_entry(&self, rule_name: &str, entry: &Recordable);
}

/// A [`Recorder`] that writes through the `log` facade.
#[derive(Debug, Default, Clone)]
pub struct LogRecorder;

impl LogRecorder {
    /// Create a new log-backed recorder.
    pub fn new() -> Self {
        Self
    }
}

impl Recorder for LogRecorder {
    fn record_state(&self, rule_name: &str, msg: &str) {
        log::info!("{rule_name} : {msg}");
    }

    fn record_error(&self, rule_name: &str, detail: &str) {
        log::error!("{rule_name} : {detail}");
    }

    fn record_message(&self, rule_name: &str, msg: &str) {
        log::info!("{rule_name} : {msg}");
    }

    fn record_entry(&self, rule_name: &str, entry: &Recordable) {
        self.record_message(rule_name, &entry.to_string());
    }
}

/// A [`Recorder`] that writes each report entry to a sink as one JSON
/// object per line. Lifecycle states, messages, and errors still go
/// through the `log` facade so the JSON stream stays machine-readable.
#[derive(Debug)]
pub struct JsonRecorder<W: Write> {
    sink: Mutex<W>,
}

impl<W: Write> JsonRecorder<W> {
    /// Create a recorder that serializes entries into `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Consume the recorder and hand back its sink.
    pub fn into_inner(self) -> W {
        self.sink
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> Recorder for JsonRecorder<W> {
    fn record_state(&self, rule_name: &str, msg: &str) {
        log::info!("{rule_name} : {msg}");
    }

    fn record_error(&self, rule_name: &str, detail: &str) {
        log::error!("{rule_name} : {detail}");
    }

    fn record_message(&self, rule_name: &str, msg: &str) {
        log::info!("{rule_name} : {msg}");
    }

    fn record_entry(&self, rule_name: &str, entry: &Recordable) {
        let line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(err) => {
                log::error!("{rule_name} : could not serialize entry: {err}");
                return;
            }
        };
        let mut sink = self
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(sink, "{line}") {
            log::error!("{rule_name} : could not write entry: {err}");
        }
    }
}
