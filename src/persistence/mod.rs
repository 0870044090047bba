//! Best-effort "skill ready" notifications
//!
//! When a skill meter fills, the driver may hand a notice to a sink. The
//! file-backed sink writes `skill_state_<role>.json` on a background thread so
//! the simulation loop never waits on the filesystem. Failures are logged at
//! debug level and otherwise ignored; nothing here is ever read back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError, bounded};
use serde::Serialize;

use crate::sim::PlayerRole;

/// Pending notices allowed before new ones are dropped
pub const NOTICE_QUEUE_CAPACITY: usize = 16;

/// A skill meter became ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillReadyNotice {
    pub role: PlayerRole,
    /// Milliseconds since the session started
    pub timestamp_ms: u64,
}

/// On-disk shape of a notice
#[derive(Debug, Serialize)]
struct SkillReadyRecord<'a> {
    skill_ready: bool,
    who: &'a str,
    timestamp: u64,
}

impl SkillReadyNotice {
    pub fn new(role: PlayerRole, timestamp_ms: u64) -> Self {
        Self { role, timestamp_ms }
    }

    pub fn file_name(&self) -> String {
        format!("skill_state_{}.json", self.role.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&SkillReadyRecord {
            skill_ready: true,
            who: self.role.as_str(),
            timestamp: self.timestamp_ms,
        })
    }
}

/// Write one notice into `dir`, replacing any previous file for that role
pub fn record(dir: &Path, notice: &SkillReadyNotice) -> io::Result<()> {
    let json = notice.to_json()?;
    fs::write(dir.join(notice.file_name()), json)
}

/// Receiver of skill-ready notices
///
/// Implementations must return promptly and never fail the caller.
pub trait SkillReadySink {
    fn notify(&mut self, notice: SkillReadyNotice);
}

/// Discards every notice
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SkillReadySink for NullSink {
    fn notify(&mut self, _notice: SkillReadyNotice) {}
}

/// Writes notices to JSON files from a background thread
pub struct JsonFileRecorder {
    sender: Option<Sender<SkillReadyNotice>>,
    worker: Option<JoinHandle<()>>,
}

impl JsonFileRecorder {
    /// Start the writer thread; files land in `dir`
    pub fn spawn(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let (sender, receiver) = bounded::<SkillReadyNotice>(NOTICE_QUEUE_CAPACITY);
        let worker = std::thread::Builder::new()
            .name("skill-recorder".into())
            .spawn(move || {
                for notice in receiver.iter() {
                    if let Err(e) = record(&dir, &notice) {
                        log::debug!("Failed to record skill state for {}: {}", notice.role.as_str(), e);
                    }
                }
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl SkillReadySink for JsonFileRecorder {
    fn notify(&mut self, notice: SkillReadyNotice) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(notice) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::debug!("Skill recorder queue full, notice dropped"),
            Err(TrySendError::Disconnected(_)) => log::debug!("Skill recorder stopped, notice dropped"),
        }
    }
}

impl Drop for JsonFileRecorder {
    /// Flush queued notices before returning
    fn drop(&mut self) {
        // Closing the channel ends the worker's loop
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
