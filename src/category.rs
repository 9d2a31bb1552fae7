//! The three claim-evidence channels and their fixed pipeline order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One claim-evidence channel. The analysis pipeline always walks
/// voice → image → text, so the variant order here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Voice,
    Image,
    Text,
}

impl Category {
    /// Pipeline order: listen, then look, then read.
    pub const ALL: [Category; 3] = [Category::Voice, Category::Image, Category::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Voice => "voice",
            Category::Image => "image",
            Category::Text => "text",
        }
    }

    /// Stable slot index for per-category arrays.
    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Voice => 0,
            Category::Image => 1,
            Category::Text => 2,
        }
    }

    /// Binary categories go through the remote store; text travels inline.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Category::Text)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
