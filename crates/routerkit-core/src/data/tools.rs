//! Tool library
//!
//! Router bits as supplied by the tool library file. Toolpath generation only
//! needs the cut diameter, the rest is carried for reporting.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tool identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(
    /// The unique string identifier for the tool.
    pub String,
);

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A router bit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    /// Cutting diameter
    pub cut_diameter: f64,
    #[serde(default)]
    pub shank_diameter: f64,
    #[serde(default)]
    pub cut_length: f64,
    #[serde(default)]
    pub flutes: u32,
    /// Flute geometry ("upcut", "downcut", "compression", ...)
    #[serde(default)]
    pub flute_type: String,
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub max_rpm: u32,
    pub name: String,
    /// Free-form vendor metadata
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub model: String,
}

impl Tool {
    /// Create a tool with the given id, name and cut diameter
    pub fn new(id: impl Into<String>, name: impl Into<String>, cut_diameter: f64) -> Self {
        Self {
            id: ToolId(id.into()),
            cut_diameter,
            shank_diameter: 0.0,
            cut_length: 0.0,
            flutes: 0,
            flute_type: String::new(),
            shape: String::new(),
            material: String::new(),
            max_rpm: 0,
            name: name.into(),
            meta: HashMap::new(),
            supplier: String::new(),
            model: String::new(),
        }
    }

    pub fn with_cut_length(mut self, cut_length: f64) -> Self {
        self.cut_length = cut_length;
        self
    }

    pub fn with_max_rpm(mut self, max_rpm: u32) -> Self {
        self.max_rpm = max_rpm;
        self
    }

    pub fn radius(&self) -> f64 {
        self.cut_diameter * 0.5
    }

    /// Short description for logs and comments
    pub fn description_short(&self) -> String {
        format!("{} ({}, Ø{})", self.name, self.id, self.cut_diameter)
    }
}

/// Tool library - ordered collection of tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolLibrary {
    tools: Vec<Tool>,
}

impl ToolLibrary {
    /// Create a new empty tool library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool with the same id
    pub fn add_tool(&mut self, tool: Tool) {
        match self.tools.iter_mut().find(|t| t.id == tool.id) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by ID
    pub fn get_tool(&self, id: &str) -> Result<&Tool, LookupError> {
        self.tools
            .iter()
            .find(|t| t.id.0 == id)
            .ok_or_else(|| LookupError::ToolNotFound {
                name: id.to_string(),
            })
    }

    /// Get a tool by its display name
    pub fn get_tool_by_name(&self, name: &str) -> Result<&Tool, LookupError> {
        self.tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| LookupError::ToolNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve a reference that may be either an id or a name
    pub fn resolve(&self, reference: &str) -> Result<&Tool, LookupError> {
        self.get_tool(reference)
            .or_else(|_| self.get_tool_by_name(reference))
    }

    /// Tool names in library order
    pub fn list_tools_by_name(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Search tools by diameter range
    pub fn search_by_diameter(&self, min: f64, max: f64) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|t| t.cut_diameter >= min && t.cut_diameter <= max)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Get the number of tools in the library
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<Tool> for ToolLibrary {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        let mut library = Self::new();
        for tool in iter {
            library.add_tool(tool);
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replaces_same_id() {
        let mut library = ToolLibrary::new();
        library.add_tool(Tool::new("T1", "3/8 compression", 0.375));
        library.add_tool(Tool::new("T1", "1/2 compression", 0.5));
        assert_eq!(library.len(), 1);
        assert_eq!(library.get_tool("T1").unwrap().cut_diameter, 0.5);
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let library: ToolLibrary = vec![
            Tool::new("T1", "Compression 3/8", 0.375),
            Tool::new("T2", "Drill 5mm", 0.197),
        ]
        .into_iter()
        .collect();

        assert_eq!(library.resolve("T2").unwrap().name, "Drill 5mm");
        assert_eq!(library.resolve("Compression 3/8").unwrap().id.0, "T1");
        assert!(matches!(
            library.resolve("T3"),
            Err(LookupError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn test_search_by_diameter() {
        let library: ToolLibrary = vec![
            Tool::new("T1", "a", 0.25),
            Tool::new("T2", "b", 0.5),
            Tool::new("T3", "c", 1.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(library.search_by_diameter(0.3, 1.0).len(), 2);
    }
}
