use std::{path::PathBuf, time::Duration};

/// Options for configuring a lookup run.
pub struct Config {
    /// Pause between two lookups that go over the network.
    pub delay: Duration,
    /// Append every result line to this file (optional).
    pub output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1500),
            output_file: None,
        }
    }
}
