//! Universal Action content of a result item

use serde::{Deserialize, Serialize};

/// Content type control for the Universal Action of an item.
///
/// Each key names the content type the host should use for its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFilterItemAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Let the host derive the content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<String>,
}

impl ScriptFilterItemAction {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.url.is_none() && self.file.is_none() && self.auto.is_none()
    }
}

/// The Universal Action items used when actioning a result.
///
/// Overrides `arg` for actioning. The simple forms let the host derive the
/// content type (file, url or text) on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Text(String),
    List(Vec<String>),
    Typed(ScriptFilterItemAction),
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Action::Text(s)
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Action::Text(s.to_string())
    }
}

impl From<Vec<String>> for Action {
    fn from(values: Vec<String>) -> Self {
        Action::List(values)
    }
}

impl From<ScriptFilterItemAction> for Action {
    fn from(action: ScriptFilterItemAction) -> Self {
        Action::Typed(action)
    }
}
