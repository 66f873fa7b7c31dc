//! Structured observation of decoder output
//!
//! A single optional observer hook threaded through the pipeline: every
//! dispatched operation, drawn character, and reported error can be
//! mirrored to a [`Tracer`]. The hook is purely observational — it must
//! never affect parsing — and exists so an external harness can assert
//! the exact operation sequence a byte stream produces, rather than
//! poking at terminal rendering state.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Observer for decoder activity.
///
/// `Send` so a traced parser can still move between threads with its
/// session.
pub trait Tracer: Send {
    /// A dispatched operation: name plus up to two numeric arguments.
    fn command(&mut self, name: &'static str, args: &[u32]);

    /// A drawn character.
    fn draw(&mut self, ch: char);

    /// A recovered protocol error.
    fn error(&mut self, message: &str);
}

/// Owned form of one trace callback, for recording and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// A dispatched operation
    Command { name: String, args: Vec<u32> },
    /// A drawn character
    Draw(char),
    /// A recovered protocol error
    Error(String),
}

/// A [`Tracer`] that appends every event to a shared list.
///
/// Clones share the same list, so a harness can keep one handle and
/// hand the other to the parser.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl Recorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the recorded events without clearing them
    pub fn events(&self) -> Vec<TraceEvent> {
        self.lock().clone()
    }

    /// Remove and return the recorded events
    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Names of recorded command events, in order
    pub fn command_names(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|ev| match ev {
                TraceEvent::Command { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TraceEvent>> {
        self.events.lock().expect("trace recorder poisoned")
    }
}

impl Tracer for Recorder {
    fn command(&mut self, name: &'static str, args: &[u32]) {
        self.lock().push(TraceEvent::Command {
            name: name.to_string(),
            args: args.to_vec(),
        });
    }

    fn draw(&mut self, ch: char) {
        self.lock().push(TraceEvent::Draw(ch));
    }

    fn error(&mut self, message: &str) {
        self.lock().push(TraceEvent::Error(message.to_string()));
    }
}
