//! Rule table value types.

use serde::{Deserialize, Serialize};

/// Supported municipalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    /// Livermore, CA.
    Livermore,
    /// Oakland, CA.
    Oakland,
}

impl City {
    /// Every city the crate knows how to name.
    pub const ALL: [Self; 2] = [Self::Livermore, Self::Oakland];

    /// Lowercase identifier used in requests and data files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Livermore => "livermore",
            Self::Oakland => "oakland",
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown city: {s}"))
    }
}

/// Disposal guidance for one (city, class, subtype) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recommendation {
    /// Bin the item belongs in, e.g. "Recyclable".
    #[serde(rename = "bin")]
    pub bin_category: String,
    /// Cart color, e.g. "blue".
    #[serde(rename = "color")]
    pub color_tag: String,
    /// Display icon.
    #[serde(rename = "emoji")]
    pub icon: String,
    /// Short disposal tip.
    #[serde(rename = "tip")]
    pub tip_text: String,
}

/// One answer of a follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FollowupOption {
    /// Subtype selected by this answer.
    #[serde(rename = "id")]
    pub subtype_id: String,
    /// Answer text shown to the user.
    #[serde(rename = "label")]
    pub label_text: String,
}

/// Clarifying question for a visually ambiguous class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FollowupPrompt {
    /// Question text.
    #[serde(rename = "question")]
    pub question_text: String,
    /// Answers in display order.
    pub options: Vec<FollowupOption>,
}
