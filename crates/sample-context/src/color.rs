use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ContextError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Red,
    Orange,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Orange, Color::Yellow];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ContextError::UnknownColor(s.to_string()))
    }
}
