// ⚙️ Console configuration
// Defaults reproduce the established console behavior; the switches exist
// for the handful of behaviors that are parity choices rather than rules.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

pub const DEFAULT_FILE_PATH: &str = "file.json";
pub const DEFAULT_PROMPT: &str = "(hbnb) ";

/// How `all <class>` selects entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassFilter {
    /// Rendered text contains the class name anywhere
    Substring,
    /// Discriminator equals the class name
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Persistence file
    pub file_path: PathBuf,

    /// Prompt shown when reading from a terminal
    pub prompt: String,

    /// Whether input comes from a terminal
    pub interactive: bool,

    pub class_filter: ClassFilter,

    /// Persist after an update attempt even when a later check failed
    pub save_on_failed_update: bool,

    /// Advance updated_at on a successful update
    pub touch_on_update: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            prompt: DEFAULT_PROMPT.to_string(),
            interactive: false,
            class_filter: ClassFilter::Substring,
            save_on_failed_update: true,
            touch_on_update: false,
        }
    }
}

impl ConsoleConfig {
    /// Defaults, with `interactive` taken from whether stdin is a terminal
    pub fn detect() -> Self {
        Self::default().with_interactive(std::io::stdin().is_terminal())
    }

    /// Prompt actually printed: empty in script/pipe mode
    pub fn effective_prompt(&self) -> &str {
        if self.interactive {
            &self.prompt
        } else {
            ""
        }
    }

    /// Builder: persistence path
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Builder: prompt literal
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_class_filter(mut self, filter: ClassFilter) -> Self {
        self.class_filter = filter;
        self
    }

    pub fn with_save_on_failed_update(mut self, enabled: bool) -> Self {
        self.save_on_failed_update = enabled;
        self
    }

    pub fn with_touch_on_update(mut self, enabled: bool) -> Self {
        self.touch_on_update = enabled;
        self
    }
}
