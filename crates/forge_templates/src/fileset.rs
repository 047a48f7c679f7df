//! The three-file source set every generated application consists of.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// Logical role of a file inside a [`SourceFileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Markup,
    Stylesheet,
    Script,
}

impl FileRole {
    /// All roles, in publishing order.
    pub const ALL: [FileRole; 3] = [FileRole::Markup, FileRole::Stylesheet, FileRole::Script];

    /// File name the role is stored under in a published repository.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Markup => "index.html",
            Self::Stylesheet => "style.css",
            Self::Script => "script.js",
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Full text of a static application's markup, stylesheet and script.
///
/// All three roles are always present; an empty string stands for an absent
/// file. Transformations return a new set and never mutate their input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileSet {
    #[serde(rename = "index.html", default)]
    pub markup: String,
    #[serde(rename = "style.css", default)]
    pub stylesheet: String,
    #[serde(rename = "script.js", default)]
    pub script: String,
}

impl SourceFileSet {
    /// Create a file set from its three parts.
    pub fn new(
        markup: impl Into<String>,
        stylesheet: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            stylesheet: stylesheet.into(),
            script: script.into(),
        }
    }

    /// Get the content for a role.
    pub fn get(&self, role: FileRole) -> &str {
        match role {
            FileRole::Markup => &self.markup,
            FileRole::Stylesheet => &self.stylesheet,
            FileRole::Script => &self.script,
        }
    }

    /// Replace the content for a role.
    pub fn set(&mut self, role: FileRole, content: impl Into<String>) {
        let content = content.into();
        match role {
            FileRole::Markup => self.markup = content,
            FileRole::Stylesheet => self.stylesheet = content,
            FileRole::Script => self.script = content,
        }
    }

    /// Iterate over `(role, content)` pairs in publishing order.
    pub fn iter(&self) -> impl Iterator<Item = (FileRole, &str)> {
        FileRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// True when all three files are empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, content)| content.trim().is_empty())
    }

    /// Read a file set from a directory.
    ///
    /// Returns `Ok(None)` when the directory does not exist or holds none of
    /// the three files. Missing individual files read as empty.
    pub fn load_dir(dir: &Path) -> TemplateResult<Option<Self>> {
        if !dir.exists() {
            return Ok(None);
        }
        if !dir.is_dir() {
            return Err(TemplateError::NotADirectory(dir.to_path_buf()));
        }

        let mut set = Self::default();
        let mut found = 0;
        for role in FileRole::ALL {
            let path = dir.join(role.file_name());
            if path.is_file() {
                set.set(role, fs::read_to_string(&path)?);
                found += 1;
            }
        }

        if found == 0 {
            debug!("No source files found in {:?}", dir);
            return Ok(None);
        }
        Ok(Some(set))
    }

    /// Write all three files into a directory, creating it if needed.
    pub fn write_dir(&self, dir: &Path) -> TemplateResult<()> {
        fs::create_dir_all(dir)?;
        for (role, content) in self.iter() {
            fs::write(dir.join(role.file_name()), content)?;
        }
        debug!("Wrote source files to {:?}", dir);
        Ok(())
    }
}
