#![forbid(unsafe_code)]

//! Page languages and their writing direction.
//!
//! The page is bilingual: Hebrew (right-to-left, the default) and English.
//! Exactly one language is active at a time, and everything language-dependent
//! on the page is derived from that single value.

use serde::{Deserialize, Serialize};

/// One of the two page languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    He,
    En,
}

/// Document writing direction (`dir` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    /// Value for the `dir` attribute.
    #[must_use]
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Rtl => "rtl",
            Self::Ltr => "ltr",
        }
    }
}

impl Lang {
    /// Both languages, Hebrew first.
    pub const ALL: [Lang; 2] = [Lang::He, Lang::En];

    /// BCP-47 tag used for the `lang` attribute, storage, and class suffixes.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::He => "he",
            Self::En => "en",
        }
    }

    /// Parse a stored or user-supplied tag. Case and surrounding whitespace
    /// are ignored; anything else is rejected.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("he") {
            Some(Self::He)
        } else if tag.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    /// The language the toggle switches to.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::He => Self::En,
            Self::En => Self::He,
        }
    }

    #[must_use]
    pub const fn direction(self) -> TextDirection {
        match self {
            Self::He => TextDirection::Rtl,
            Self::En => TextDirection::Ltr,
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self.direction(), TextDirection::Rtl)
    }

    /// Label for the toggle control: always names the language it switches to.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self.other() {
            Self::He => "HE",
            Self::En => "EN",
        }
    }
}

impl core::fmt::Display for Lang {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}
