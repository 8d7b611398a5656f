#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every selector, class name, threshold, and the storage key lives in
//! [`PageConfig`]. The defaults describe the portfolio page's markup; a host
//! may override any subset by passing JSON to [`PageConfig::from_json`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed JSON | Syntax error or wrong field type | `FolioError::Config` |
//! | Out-of-range threshold | e.g. `reveal_threshold = 1.5` | `FolioError::InvalidSetting` |
//! | Unknown field | Typo in a key | Ignored (defaults kept) |

use serde::Deserialize;

use crate::dom::{ScrollBehavior, Selector};
use crate::error::{FolioError, Result};
use crate::lang::Lang;

/// Element queries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Sections tracked by the nav highlighter.
    pub sections: Selector,
    /// Links whose `active` class follows the current section.
    pub nav_links: Selector,
    /// In-page anchors with smooth scrolling.
    pub anchors: Selector,
    /// Blocks animated on first intersection.
    pub reveal: Selector,
    pub timeline_items: Selector,
    pub hamburger: Selector,
    /// Panel opened by the hamburger.
    pub nav_panel: Selector,
    pub lang_toggle: Selector,
    pub glitch_text: Selector,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            sections: Selector::tag("section"),
            nav_links: Selector::Descendant {
                ancestor_class: "nav-links".into(),
                tag: "a".into(),
            },
            anchors: Selector::HashAnchors,
            reveal: Selector::AnyClass(vec!["section".into(), "project-card".into()]),
            timeline_items: Selector::class("timeline-item"),
            hamburger: Selector::class("hamburger"),
            nav_panel: Selector::class("nav-links"),
            lang_toggle: Selector::id("lang-toggle"),
            glitch_text: Selector::class("glitch-text"),
        }
    }
}

/// Class and attribute names written by the behaviors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Classes {
    /// Active nav link, open nav panel, revealed block.
    pub active: String,
    /// Pending-reveal marker.
    pub reveal: String,
    /// Focused timeline item.
    pub focus: String,
    /// Hamburger open visual.
    pub menu_toggle: String,
    /// Body class while Hebrew is active.
    pub rtl_mode: String,
    /// Prefix of language-tagged elements: `lang-he`, `lang-en`.
    pub lang_prefix: String,
    /// Attribute holding the glitch effect's display text.
    pub glitch_attr: String,
    /// Prefix of per-language alternates: `data-text-he`, `data-text-en`.
    pub glitch_alt_prefix: String,
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            active: "active".into(),
            reveal: "reveal".into(),
            focus: "active-focus".into(),
            menu_toggle: "toggle".into(),
            rtl_mode: "rtl-mode".into(),
            lang_prefix: "lang-".into(),
            glitch_attr: "data-text".into(),
            glitch_alt_prefix: "data-text-".into(),
        }
    }
}

impl Classes {
    /// Class carried by elements written in `lang`.
    #[must_use]
    pub fn lang_class(&self, lang: Lang) -> String {
        format!("{}{}", self.lang_prefix, lang.tag())
    }

    /// Attribute carrying the glitch alternate text for `lang`.
    #[must_use]
    pub fn glitch_alt_attr(&self, lang: Lang) -> String {
        format!("{}{}", self.glitch_alt_prefix, lang.tag())
    }
}

/// Full page configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub classes: Classes,
    /// `localStorage` key of the language preference.
    pub storage_key: String,
    /// Language used when nothing usable is stored.
    pub default_lang: Lang,
    /// A section is current once `scroll_y >= offset_top - height * fraction`.
    pub nav_threshold_fraction: f64,
    /// Visible-area ratio that reveals a block.
    pub reveal_threshold: f64,
    /// Focus band start, as a fraction of viewport height.
    pub focus_band_start: f64,
    /// Focus band end, as a fraction of viewport height.
    pub focus_band_end: f64,
    /// How in-page anchor clicks scroll to their target.
    pub scroll_behavior: ScrollBehavior,
    /// Widest viewport (px) using the mobile menu layout.
    pub menu_breakpoint_px: u32,
    /// Distance (px) from the top of the page to the open panel.
    pub menu_top_px: u32,
    /// `tracing` level for the web shell's console logger.
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            classes: Classes::default(),
            storage_key: "preferredLang".into(),
            default_lang: Lang::He,
            nav_threshold_fraction: 1.0 / 3.0,
            reveal_threshold: 0.15,
            focus_band_start: 0.25,
            focus_band_end: 0.75,
            scroll_behavior: ScrollBehavior::Smooth,
            menu_breakpoint_px: 768,
            menu_top_px: 70,
            log_level: "info".into(),
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON override. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an optional override; `None` or blank input yields defaults.
    pub fn from_optional_json(json: Option<&str>) -> Result<Self> {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => Self::from_json(json),
            _ => Ok(Self::default()),
        }
    }

    /// Check numeric settings are in range.
    pub fn validate(&self) -> Result<()> {
        fn unit(name: &'static str, value: f64) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(FolioError::InvalidSetting {
                    name,
                    value: value.to_string(),
                })
            }
        }

        unit("nav_threshold_fraction", self.nav_threshold_fraction)?;
        unit("reveal_threshold", self.reveal_threshold)?;
        unit("focus_band_start", self.focus_band_start)?;
        unit("focus_band_end", self.focus_band_end)?;
        if self.focus_band_start >= self.focus_band_end {
            return Err(FolioError::InvalidSetting {
                name: "focus_band_end",
                value: format!("{} <= {}", self.focus_band_end, self.focus_band_start),
            });
        }
        if self.storage_key.is_empty() {
            return Err(FolioError::InvalidSetting {
                name: "storage_key",
                value: String::new(),
            });
        }
        Ok(())
    }
}
