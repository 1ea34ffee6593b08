//! Maintenance domain — the device's download / delete / clear-config actions.

#[cfg(feature = "http")]
pub mod client;

use crate::network::{CLEAR_CONFIG_PATH, DELETE_PATH, DOWNLOAD_PATH};
use serde::{Deserialize, Serialize};

/// A maintenance request the dashboard can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Download,
    DeleteData,
    ClearConfig,
}

impl Action {
    pub fn path(self) -> &'static str {
        match self {
            Action::Download => DOWNLOAD_PATH,
            Action::DeleteData => DELETE_PATH,
            Action::ClearConfig => CLEAR_CONFIG_PATH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Download => "download",
            Action::DeleteData => "delete_data",
            Action::ClearConfig => "clear_config",
        }
    }

    /// Whether the action has a side effect on the device. Those are never retried.
    pub fn is_destructive(self) -> bool {
        !matches!(self, Action::Download)
    }
}

/// Plain-text acknowledgement of a destructive action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub action: Action,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_paths() {
        assert_eq!(Action::Download.path(), "/download");
        assert_eq!(Action::DeleteData.path(), "/delete");
        assert_eq!(Action::ClearConfig.path(), "/clearconfig");
    }

    #[test]
    fn test_only_download_is_safe() {
        assert!(!Action::Download.is_destructive());
        assert!(Action::DeleteData.is_destructive());
        assert!(Action::ClearConfig.is_destructive());
    }
}
