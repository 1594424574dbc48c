//! Appearance catalogs: themes, animated backgrounds, page layouts.
//!
//! Catalog entries carry only an identifier and a premium flag; the visual
//! definitions live in the frontend. Premium entries require an active PRO
//! entitlement to select, and fall back to the defaults on the public page
//! once entitlement lapses (the stored selection is never rewritten).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub premium: bool,
}

pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_BACKGROUND: &str = "none";
pub const DEFAULT_LAYOUT: &str = "list";

pub const THEMES: &[CatalogEntry] = &[
    CatalogEntry { id: "default", premium: false },
    CatalogEntry { id: "ocean", premium: false },
    CatalogEntry { id: "sunset", premium: false },
    CatalogEntry { id: "forest", premium: false },
    CatalogEntry { id: "midnight", premium: true },
    CatalogEntry { id: "platinum", premium: true },
    CatalogEntry { id: "aurora", premium: true },
];

pub const BACKGROUNDS: &[CatalogEntry] = &[
    CatalogEntry { id: "none", premium: false },
    CatalogEntry { id: "dots", premium: false },
    CatalogEntry { id: "particles", premium: true },
    CatalogEntry { id: "waves", premium: true },
    CatalogEntry { id: "matrix", premium: true },
    CatalogEntry { id: "starfield", premium: true },
];

pub const LAYOUTS: &[CatalogEntry] = &[
    CatalogEntry { id: "list", premium: false },
    CatalogEntry { id: "grid", premium: true },
    CatalogEntry { id: "cards", premium: true },
];

pub fn find_entry(catalog: &'static [CatalogEntry], id: &str) -> Option<&'static CatalogEntry> {
    catalog.iter().find(|entry| entry.id == id)
}

/// A user's appearance selection (stored on the user row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Appearance {
    pub theme: String,
    pub background: String,
    pub layout: String,
}

impl Appearance {
    /// Read-time view for the public page: premium selections fall back to
    /// the defaults when `entitled` is false. Unknown identifiers (stale
    /// rows after a catalog change) fall back the same way.
    pub fn for_public_page(&self, entitled: bool) -> Appearance {
        if entitled {
            return self.clone();
        }
        Appearance {
            theme: downgrade(THEMES, &self.theme, DEFAULT_THEME),
            background: downgrade(BACKGROUNDS, &self.background, DEFAULT_BACKGROUND),
            layout: downgrade(LAYOUTS, &self.layout, DEFAULT_LAYOUT),
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance {
            theme: DEFAULT_THEME.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
        }
    }
}

fn downgrade(catalog: &'static [CatalogEntry], id: &str, default_id: &str) -> String {
    match find_entry(catalog, id) {
        Some(entry) if !entry.premium => id.to_string(),
        _ => default_id.to_string(),
    }
}
