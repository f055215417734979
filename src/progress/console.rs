//! Console progress handler printing one block per component

use super::{ProgressEvent, ProgressHandler};
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints human-readable progress lines:
///
/// ```text
/// 1. Processing: foo-svc
///    Build number: 5.21
/// ```
pub struct ConsoleHandler {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn render(event: &ProgressEvent) -> Option<String> {
        match event {
            ProgressEvent::RunStarted { .. } => Some("Processing components...\n".to_string()),
            ProgressEvent::ComponentStarted { ordinal, component } => {
                Some(format!("{}. Processing: {}", ordinal, component))
            }
            ProgressEvent::ComponentResolved { version, .. } => {
                Some(format!("   Build number: {}\n", version))
            }
            ProgressEvent::JobLocated { .. } | ProgressEvent::RunCompleted { .. } => None,
        }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        let Some(line) = Self::render(event) else {
            return;
        };
        // Progress output is best effort; a closed stdout must not stop the run.
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}
