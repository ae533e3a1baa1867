//! Persistent modal parameter state.
//!
//! Each parameter token publishes a new [`TreeState`] built by extending the
//! previous one. States are immutable once created and keep a link to the
//! state they were extended from, so any token can be asked for the full modal
//! context in effect at that token.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Value reported for a parameter that has never been set
pub const DEFAULT_PARAMETER_VALUE: &str = "0";

#[derive(Debug, Default)]
struct StateNode {
    params: BTreeMap<char, String>,
    previous: Option<TreeState>,
}

impl Drop for StateNode {
    // Unlink the chain iteratively; long programs build chains far deeper
    // than the stack would allow for recursive drops.
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(state) = previous {
            match Arc::try_unwrap(state.0) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

/// Immutable snapshot of modal parameter values
#[derive(Debug, Clone, Default)]
pub struct TreeState(Arc<StateNode>);

impl TreeState {
    /// The empty root state
    pub fn new() -> Self {
        Self::default()
    }

    /// New state holding this state's values overridden by `params`
    pub fn extend<I, V>(&self, params: I) -> TreeState
    where
        I: IntoIterator<Item = (char, V)>,
        V: Into<String>,
    {
        let mut map = self.0.params.clone();
        for (key, value) in params {
            map.insert(key, value.into());
        }
        TreeState(Arc::new(StateNode {
            params: map,
            previous: Some(self.clone()),
        }))
    }

    /// Value of a parameter, or `"0"` when it was never set
    pub fn get(&self, key: char) -> &str {
        self.0
            .params
            .get(&key)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PARAMETER_VALUE)
    }

    pub fn is_set(&self, key: char) -> bool {
        self.0.params.contains_key(&key)
    }

    /// The state this one was extended from
    pub fn previous(&self) -> Option<&TreeState> {
        self.0.previous.as_ref()
    }

    /// Number of extensions since the root state
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.previous();
        while let Some(state) = cursor {
            depth += 1;
            cursor = state.previous();
        }
        depth
    }

    /// All set parameters in letter order
    pub fn params(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Whether both handles point at the same published state
    pub fn ptr_eq(&self, other: &TreeState) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TreeState {
    fn eq(&self, other: &Self) -> bool {
        self.0.params == other.0.params
    }
}
