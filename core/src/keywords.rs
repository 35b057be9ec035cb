use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single keyword section: flat key/value pairs for one pipeline stage.
pub type KeywordSection = BTreeMap<String, Value>;

/// Keyword sections from the input file, grouped by the pipeline stage that
/// consumes them (for example the `scf` section feeds the SCF stage).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keywords {
    sections: BTreeMap<String, KeywordSection>,
}

impl Keywords {
    /// Returns the named sub-mapping, or an empty section if the input file
    /// did not carry one. Other sections are left untouched.
    pub fn section(&self, name: &str) -> KeywordSection {
        self.sections.get(name).cloned().unwrap_or_default()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &KeywordSection)> {
        self.sections
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }
}
