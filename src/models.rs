use serde::{Deserialize, Serialize};

/// Publication status classified from the detail page's free-form meta text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NovelStatus {
    Ongoing,
    Completed,
    Unknown,
}

// The site spells the status both with "е" and "ё" depending on revision;
// match the union. Completed phrases are checked first: a meta block that
// mentions a finished run alongside an in-progress translation counts as
// completed.
const COMPLETED_PHRASES: [&str; 4] = [
    "выпуск завершен",
    "выпуск завершён",
    "завершен",
    "завершён",
];
const ONGOING_PHRASES: [&str; 3] = ["выпуск продолжается", "продолжается", "переводится"];

impl NovelStatus {
    /// Substring-containment classification of a status blurb. Text matching
    /// neither phrase set is `Unknown`.
    pub fn classify(meta_text: &str) -> Self {
        let text = meta_text.to_lowercase();
        if COMPLETED_PHRASES.iter().any(|phrase| text.contains(phrase)) {
            Self::Completed
        } else if ONGOING_PHRASES.iter().any(|phrase| text.contains(phrase)) {
            Self::Ongoing
        } else {
            Self::Unknown
        }
    }
}

/// One row of a listing or search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelItem {
    pub name: String,
    pub cover: Option<String>,
    pub path: String, // site-relative; the host's natural key
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterItem {
    pub name: String,
    pub path: String,
    pub release_time: Option<String>,
    pub chapter_number: u32, // 1-based position in document order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNovel {
    pub path: String,
    pub name: String,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub genres: String, // comma-joined; empty when the page lists none
    pub summary: Option<String>,
    pub status: NovelStatus,
    pub chapters: Vec<ChapterItem>,
}
