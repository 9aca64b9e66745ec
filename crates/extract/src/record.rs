// ABOUTME: Record models for extracted course data: ItemRecord, ContentRecord and friends.
// ABOUTME: Optional fields are omitted from JSON entirely rather than serialized as placeholders.

use serde::{Deserialize, Serialize};

/// Classification of a discovered item link.
///
/// `Unknown` means "needs manual classification", not "non-assignment":
/// module-item markup does not always carry an icon we can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Assignment,
    Page,
    #[default]
    Unknown,
}

impl ItemKind {
    /// Parse the CSV/JSON string form back into a kind.
    ///
    /// Anything unrecognized maps to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "assignment" => ItemKind::Assignment,
            "page" => ItemKind::Page,
            _ => ItemKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Assignment => "assignment",
            ItemKind::Page => "page",
            ItemKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item discovered on a listing page.
///
/// `due_date` and `points` are opportunistic: a miss leaves them empty.
/// Module items carry a `module_`-prefixed id so they never collide with
/// direct assignment ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    /// Query/fragment-stripped URL; unique within one extraction pass.
    pub url: String,
    pub due_date: String,
    pub points: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

/// Availability window of an assignment, as displayed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl Availability {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }
}

/// A file linked from an assignment description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// Fields extracted from a single item page.
///
/// Every field is best-effort; only `id` and `url` are guaranteed present
/// after [`ContentRecord::merge_listing`]. Absent fields are omitted from
/// the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_possible: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_types: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_rubric: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rubric_summary: Option<String>,
}

impl ContentRecord {
    /// Backfill from the originating listing record.
    ///
    /// Sets `id` and `url`, and fills `title`/`due_date` only where the
    /// item page did not yield them. The listing record itself is never
    /// mutated.
    pub fn merge_listing(mut self, item: &ItemRecord) -> Self {
        self.id = item.id.clone();
        self.url = item.url.clone();
        if self.title.is_none() && !item.title.is_empty() {
            self.title = Some(item.title.clone());
        }
        if self.due_date.is_none() && !item.due_date.is_empty() {
            self.due_date = Some(item.due_date.clone());
        }
        self
    }
}

/// The JSON envelope written as `course_content.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContent {
    pub course_name: String,
    pub assignments: Vec<ContentRecord>,
}
