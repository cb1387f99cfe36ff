//! Plugins offered for installation on the plugins step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A plugin available from the hub's remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Hub-assigned identifier (the plugin resource `@id`).
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    /// URL to `POST` to in order to install the plugin.
    pub install_link: Option<String>,
}

impl Plugin {
    #[must_use]
    pub fn is_installable(&self) -> bool {
        self.install_link.is_some()
    }
}

/// The set of plugin ids ticked by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSelection(BTreeSet<String>);

impl PluginSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.0.insert(id.into());
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected plugins out of `available`, in listing order.
    ///
    /// Ids that are not in the listing are ignored.
    #[must_use]
    pub fn pick<'a>(&self, available: &'a [Plugin]) -> Vec<&'a Plugin> {
        available
            .iter()
            .filter(|plugin| self.is_selected(&plugin.id))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PluginSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
