//! Router library
//!
//! A router has twelve spindle tool-changer slots and a nine-bit gang drill.
//! Slots are labelled "1".."12" and "1".."9" in the library file; an empty
//! string marks an empty slot.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of spindle tool-changer slots
pub const SPINDLE_SLOTS: u8 = 12;
/// Number of gang drill bits
pub const GANG_SLOTS: u8 = 9;

/// One bit of the gang drill and its offset from the spindle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GangSlot {
    #[serde(default)]
    pub tool: String,
    #[serde(rename = "x", default)]
    pub offset_x: f64,
    #[serde(rename = "y", default)]
    pub offset_y: f64,
}

impl GangSlot {
    pub fn new(tool: impl Into<String>, offset_x: f64, offset_y: f64) -> Self {
        Self {
            tool: tool.into(),
            offset_x,
            offset_y,
        }
    }
}

/// A CNC router and its tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Router {
    pub id: String,
    pub name: String,
    #[serde(default)]
    spindle: BTreeMap<u8, String>,
    #[serde(rename = "gangdrill", default)]
    gang: BTreeMap<u8, GangSlot>,
}

impl Router {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            spindle: BTreeMap::new(),
            gang: BTreeMap::new(),
        }
    }

    /// Load a tool into a spindle slot; out-of-range slots are ignored
    pub fn with_spindle_tool(mut self, slot: u8, tool: impl Into<String>) -> Self {
        if (1..=SPINDLE_SLOTS).contains(&slot) {
            self.spindle.insert(slot, tool.into());
        }
        self
    }

    /// Load a bit into a gang drill slot; out-of-range slots are ignored
    pub fn with_gang_slot(mut self, slot: u8, gang: GangSlot) -> Self {
        if (1..=GANG_SLOTS).contains(&slot) {
            self.gang.insert(slot, gang);
        }
        self
    }

    /// Tool id in the given spindle slot
    pub fn spindle_slot(&self, slot: u8) -> Option<&str> {
        if !(1..=SPINDLE_SLOTS).contains(&slot) {
            return None;
        }
        self.spindle
            .get(&slot)
            .map(String::as_str)
            .filter(|tool| !tool.is_empty())
    }

    /// Gang drill bit in the given slot
    pub fn gang_slot(&self, slot: u8) -> Option<&GangSlot> {
        if !(1..=GANG_SLOTS).contains(&slot) {
            return None;
        }
        self.gang.get(&slot).filter(|g| !g.tool.is_empty())
    }

    /// Lowest spindle slot holding the tool
    pub fn spindle_slot_of(&self, tool: &str) -> Option<u8> {
        (1..=SPINDLE_SLOTS).find(|slot| self.spindle_slot(*slot) == Some(tool))
    }

    /// Lowest gang drill slot holding the tool
    pub fn gang_slot_of(&self, tool: &str) -> Option<u8> {
        (1..=GANG_SLOTS).find(|slot| self.gang_slot(*slot).is_some_and(|g| g.tool == tool))
    }
}

/// Router library - ordered collection of routers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterLibrary {
    routers: Vec<Router>,
}

impl RouterLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_router(&mut self, router: Router) {
        match self.routers.iter_mut().find(|r| r.id == router.id) {
            Some(existing) => *existing = router,
            None => self.routers.push(router),
        }
    }

    pub fn get_router_by_id(&self, id: &str) -> Result<&Router, LookupError> {
        self.routers
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| LookupError::RouterNotFound {
                name: id.to_string(),
            })
    }

    pub fn get_router_by_name(&self, name: &str) -> Result<&Router, LookupError> {
        self.routers
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| LookupError::RouterNotFound {
                name: name.to_string(),
            })
    }

    /// Router names in library order
    pub fn list_routers_by_name(&self) -> Vec<&str> {
        self.routers.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

impl FromIterator<Router> for RouterLibrary {
    fn from_iter<I: IntoIterator<Item = Router>>(iter: I) -> Self {
        let mut library = Self::new();
        for router in iter {
            library.add_router(router);
        }
        library
    }
}
