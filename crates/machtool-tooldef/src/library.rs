//! JSON tool libraries.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tool::ToolDef;
use crate::{Result, ToolDefError};

/// A named collection of tools.
///
/// Tool names are unique within a library. Any change made through
/// [`ToolLibrary::add`] or [`ToolLibrary::remove`] marks the library dirty
/// until it is saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolLibrary {
    tools: Vec<ToolDef>,
    #[serde(skip)]
    dirty: bool,
}

impl ToolLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a library from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(s)?;
        let mut lib = Self::new();
        for tool in parsed.tools {
            lib.add(tool)?;
        }
        lib.dirty = false;
        Ok(lib)
    }

    /// Serialize the library as indented JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a library file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ToolDefError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lib = Self::from_json_str(&text)?;
        log::info!("loaded {} tools from {}", lib.len(), path.display());
        Ok(lib)
    }

    /// Write the library to a file and clear the dirty flag.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        std::fs::write(path, text).map_err(|source| ToolDefError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.dirty = false;
        log::info!("saved {} tools to {}", self.len(), path.display());
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Add a tool. Fails if the name is taken.
    pub fn add(&mut self, tool: ToolDef) -> Result<()> {
        if self.get(&tool.name).is_some() {
            return Err(ToolDefError::DuplicateName(tool.name));
        }
        self.tools.push(tool);
        self.dirty = true;
        Ok(())
    }

    /// Remove and return the tool called `name`.
    pub fn remove(&mut self, name: &str) -> Result<ToolDef> {
        let index = self
            .tools
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ToolDefError::NotFound(name.to_string()))?;
        self.dirty = true;
        Ok(self.tools.remove(index))
    }

    /// Tool names in library order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Tools grouped by archetype, smallest diameter first.
    pub fn sorted(&self) -> Vec<&ToolDef> {
        let mut tools: Vec<&ToolDef> = self.tools.iter().collect();
        tools.sort_by(|a, b| {
            a.kind
                .type_name()
                .cmp(b.kind.type_name())
                .then(a.sort_key().partial_cmp(&b.sort_key()).unwrap_or(Ordering::Equal))
        });
        tools
    }

    /// Iterate over the tools in library order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDef> {
        self.tools.iter()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if the library has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// True if the library changed since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
