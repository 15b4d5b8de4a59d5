//! The eleven TyDi QA languages and their numeric feature ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language of an example's passage, as recorded on each [`Feature`].
///
/// The discriminants match the `language_id` values written by the
/// featurization pipeline; the serialized form is the lowercase name the
/// evaluation script expects.
///
/// [`Feature`]: crate::records::Feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English = 0,
    Arabic = 1,
    Bengali = 2,
    Finnish = 3,
    Indonesian = 4,
    Japanese = 5,
    Kiswahili = 6,
    Korean = 7,
    Russian = 8,
    Telugu = 9,
    Thai = 10,
}

/// A `language_id` outside the known range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language id {id}: expected 0..=10")]
pub struct UnknownLanguageId {
    pub id: i64,
}

impl Language {
    /// Resolves a numeric `language_id` to its language.
    pub fn from_id(id: i64) -> Result<Self, UnknownLanguageId> {
        match id {
            0 => Ok(Self::English),
            1 => Ok(Self::Arabic),
            2 => Ok(Self::Bengali),
            3 => Ok(Self::Finnish),
            4 => Ok(Self::Indonesian),
            5 => Ok(Self::Japanese),
            6 => Ok(Self::Kiswahili),
            7 => Ok(Self::Korean),
            8 => Ok(Self::Russian),
            9 => Ok(Self::Telugu),
            10 => Ok(Self::Thai),
            _ => Err(UnknownLanguageId { id }),
        }
    }

    /// Lowercase name, as it appears in the prediction output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Arabic => "arabic",
            Self::Bengali => "bengali",
            Self::Finnish => "finnish",
            Self::Indonesian => "indonesian",
            Self::Japanese => "japanese",
            Self::Kiswahili => "kiswahili",
            Self::Korean => "korean",
            Self::Russian => "russian",
            Self::Telugu => "telugu",
            Self::Thai => "thai",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
