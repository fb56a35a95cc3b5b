pub mod crawler;
pub mod filters;
pub mod models;
pub mod utils;

pub use crawler::{LibreBookCrawler, NovelParser};
pub use filters::{Category, PopularNovelsOptions, Sort};
pub use models::{ChapterItem, NovelItem, NovelStatus, SourceNovel};
pub use utils::prompt_line;
