//! Optional per-packet state log owned by the Markov loss models.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::link::error::{LinkError, LinkResult};

/// Line-oriented log of state evaluations. Opened eagerly at construction;
/// `#` header lines record the model parameters and the process start wall
/// time, then one record is appended per ingested packet.
pub struct StateLog {
    out: BufWriter<File>,
}

impl StateLog {
    pub fn create(path: &Path, description: &str) -> LinkResult<Self> {
        let open_err = |source| LinkError::LogOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(open_err)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "# {description}").map_err(open_err)?;
        writeln!(out, "# start: {}", chrono::Utc::now().to_rfc3339()).map_err(open_err)?;
        out.flush().map_err(open_err)?;
        Ok(Self { out })
    }

    /// Appends one record. Best-effort once the log is open; an append
    /// fault must not disturb packet processing.
    pub fn record(&mut self, time_ms: u64, loss_state: bool, dropped: bool) {
        let _ = writeln!(
            self.out,
            "time: {time_ms} loss_state: {loss_state} dropped: {dropped}"
        );
    }
}

impl Drop for StateLog {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
