//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
///
/// Selections themselves are ephemeral; the only configurable piece of state
/// is where downloads land before the user picks a different folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Folder offered as the output directory on startup
    pub download_location: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_location: dirs::download_dir().unwrap_or_else(|| PathBuf::from("./downloads")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_location_is_not_empty() {
        let settings = AppSettings::default();
        assert!(!settings.download_location.as_os_str().is_empty());
    }
}
