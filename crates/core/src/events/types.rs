use serde::{Deserialize, Serialize};

use crate::document::DocumentIdentity;

/// List sections shown on the items screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Recommended,
    HotRanking,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Recommended, Section::HotRanking];

    /// Position of the section on screen.
    pub fn index(self) -> usize {
        match self {
            Section::Recommended => 0,
            Section::HotRanking => 1,
        }
    }
}

/// Events emitted by the items-list store, consumed by views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogEvent {
    /// The section's contents were replaced; views should redraw it.
    SectionReloaded { section: Section, count: usize },
    /// Fetching the section failed; the previous contents are kept.
    LoadFailed { section: Section, message: String },
    /// An item was picked from a section; views should open its detail.
    ItemSelected {
        section: Section,
        identity: DocumentIdentity,
    },
}
