use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Color, ContextError};

/// A request to transition [`SampleState`](crate::SampleState).
///
/// On the wire this is a tagged object, e.g. `{"type":"SET_COUNT","count":5}`
/// or `{"type":"TOGGLE_GOOD"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetCount { count: i64 },
    SetText { text: String },
    SetColor { color: Color },
    ToggleGood,
}

impl Action {
    pub const TAGS: [&'static str; 4] = ["SET_COUNT", "SET_TEXT", "SET_COLOR", "TOGGLE_GOOD"];

    pub fn tag(&self) -> &'static str {
        match self {
            Action::SetCount { .. } => "SET_COUNT",
            Action::SetText { .. } => "SET_TEXT",
            Action::SetColor { .. } => "SET_COLOR",
            Action::ToggleGood => "TOGGLE_GOOD",
        }
    }

    /// Decodes one action from its JSON form.
    ///
    /// A tag outside [`Action::TAGS`] is reported as
    /// [`ContextError::UnhandledAction`]; anything that is not a tagged object,
    /// or carries a payload of the wrong shape, is
    /// [`ContextError::MalformedAction`].
    pub fn from_json(json: &str) -> Result<Self, ContextError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ContextError> {
        let tag = match value.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ContextError::UnhandledAction {
                    tag: other.to_string(),
                });
            }
            None => {
                return Err(ContextError::MalformedAction(serde::de::Error::custom(
                    "action is missing its \"type\" tag",
                )));
            }
        };
        if !Self::TAGS.contains(&tag.as_str()) {
            return Err(ContextError::UnhandledAction { tag });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> String {
        // Plain enum of strings and integers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
