//! Prompt Templates
//!
//! Each node talks to the model through one template. Templates use `{field}`
//! placeholders that are filled from a `PromptContext` in a single pass, so a
//! value that itself contains `{...}` (e.g. a candidate pasting code) is never
//! expanded a second time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// The named fields sent along with a prompt.
pub type PromptContext = BTreeMap<String, String>;

/// Which node a prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromptRole {
    Observer,
    Interviewer,
    Feedback,
}

impl PromptRole {
    pub const ALL: [PromptRole; 3] = [
        PromptRole::Observer,
        PromptRole::Interviewer,
        PromptRole::Feedback,
    ];

    /// The template file stem for this role.
    pub fn key(&self) -> &'static str {
        match self {
            PromptRole::Observer => "observer",
            PromptRole::Interviewer => "interviewer",
            PromptRole::Feedback => "feedback",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Could not read prompts directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not read prompt file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The template set used by a gateway.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<PromptRole, String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplates {
    /// The templates bundled with the crate.
    pub fn builtin() -> Self {
        let templates = HashMap::from([
            (
                PromptRole::Observer,
                include_str!("../prompts/observer.md").to_string(),
            ),
            (
                PromptRole::Interviewer,
                include_str!("../prompts/interviewer.md").to_string(),
            ),
            (
                PromptRole::Feedback,
                include_str!("../prompts/feedback.md").to_string(),
            ),
        ]);
        Self { templates }
    }

    /// Loads `*.md` files from `path` on top of the built-in templates.
    ///
    /// The file stem selects the role (`observer.md`, `interviewer.md`,
    /// `feedback.md`). Roles without a file keep their built-in template.
    pub fn from_dir(path: &Path) -> Result<Self, PromptError> {
        let mut prompts = Self::builtin();
        let entries = std::fs::read_dir(path).map_err(|source| PromptError::ReadDir {
            path: path.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| PromptError::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;
            let file = entry.path();
            if !file.is_file() || file.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(role) = PromptRole::from_key(stem) else {
                warn!(file = %file.display(), "Ignoring prompt file with unknown role");
                continue;
            };
            let content =
                std::fs::read_to_string(&file).map_err(|source| PromptError::ReadFile {
                    path: file.clone(),
                    source,
                })?;
            info!(%role, file = %file.display(), "Loaded prompt override");
            prompts.templates.insert(role, content);
        }

        Ok(prompts)
    }

    pub fn with_template(mut self, role: PromptRole, template: impl Into<String>) -> Self {
        self.templates.insert(role, template.into());
        self
    }

    pub fn get(&self, role: PromptRole) -> &str {
        self.templates.get(&role).map(String::as_str).unwrap_or_default()
    }

    pub fn render(&self, role: PromptRole, context: &PromptContext) -> String {
        render_template(self.get(role), context)
    }
}

/// Replaces every `{key}` whose key is present in `context`.
///
/// Unknown placeholders and stray braces are copied through unchanged.
pub fn render_template(template: &str, context: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            context
                .get(&after[..close])
                .map(|value| (value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
