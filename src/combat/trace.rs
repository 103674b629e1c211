use serde::Serialize;

/// Whether the current trial records its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    Events,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatLogEntry {
    pub time: f64,
    pub message: String,
}

impl std::fmt::Display for CombatLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "|{:.4}| {}", self.time, self.message)
    }
}

/// Event collector for one trial. Messages are only built when recording.
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    mode: TraceMode,
    entries: Vec<CombatLogEntry>,
}

impl CombatLog {
    pub fn set_mode(&mut self, mode: TraceMode) {
        self.mode = mode;
    }

    pub fn is_recording(&self) -> bool {
        self.mode == TraceMode::Events
    }

    pub fn record<F>(&mut self, time: f64, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.mode == TraceMode::Off && !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let entry = CombatLogEntry {
            time,
            message: message(),
        };
        log::trace!("{entry}");
        if self.mode == TraceMode::Events {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn take_entries(&mut self) -> Vec<CombatLogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
