//! Page parsers and field extractors for the site's versioned markup.
//!
//! The site has shipped several markup revisions over time (renamed classes,
//! table- vs. anchor-based chapter lists, relocated status badges), so every
//! field is read through an ordered fallback chain: the first selector that
//! yields a non-empty value wins, and a missing field is a normal outcome,
//! never an error.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Node, Selector};

use crate::models::{ChapterItem, NovelItem, NovelStatus, SourceNovel};

const PAGE_TITLE_BOILERPLATE: &str = "Электронная книга Другие имена";
/// Containers that have held the table of contents across site revisions.
const TOC_CONTAINERS: [&str; 3] = ["div.chapters-link", "div.table-chapters", "#chapters-list"];
/// Chapter hrefs always point into a volume.
const VOLUME_PATH_MARKER: &str = "/vol";
/// Reader-mode marker the site appends to chapter links.
const TRACKING_PARAM: &str = "?mtr=true";
const NEW_MARKERS: [&str; 2] = ["новое", "new"];

/// How to read a value out of the first element matched by a selector.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Extract {
    /// All text content, trimmed.
    Text,
    /// The element's own first text node, ignoring nested markup.
    OwnText,
    /// A named attribute.
    Attr(&'static str),
}

/// Tries each `(selector, rule)` pair in order; the first non-empty value
/// wins. Returns `None` when the whole chain comes up empty.
pub(crate) fn first_match(scope: ElementRef<'_>, chain: &[(&str, Extract)]) -> Option<String> {
    for &(selector, rule) in chain {
        let selector = Selector::parse(selector).unwrap();
        let Some(element) = scope.select(&selector).next() else {
            continue;
        };
        let value = match rule {
            Extract::Text => element.text().collect::<String>(),
            Extract::OwnText => element
                .children()
                .find_map(|child| match child.value() {
                    Node::Text(text) => {
                        let own = text.trim();
                        (!own.is_empty()).then(|| own.to_string())
                    }
                    _ => None,
                })
                .unwrap_or_default(),
            Extract::Attr(name) => element.value().attr(name).unwrap_or_default().to_string(),
        };
        let value = value.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

pub struct NovelParser;

impl NovelParser {
    /// Extracts one item per repeated listing/search tile. Tiles missing a
    /// name or a path are dropped, not errored.
    pub fn parse_tiles(&self, document: &Html) -> Vec<NovelItem> {
        let tiles = Selector::parse(".tile").unwrap();
        document.select(&tiles).filter_map(Self::parse_tile).collect()
    }

    fn parse_tile(tile: ElementRef<'_>) -> Option<NovelItem> {
        let name = first_match(tile, &[(".desc h3 a", Extract::Text)])?;
        let path = first_match(tile, &[(".desc h3 a", Extract::Attr("href"))])?;
        let cover = first_match(
            tile,
            &[
                (".img img", Extract::Attr("data-original")),
                (".img img", Extract::Attr("src")),
            ],
        );
        Some(NovelItem { name, cover, path })
    }

    /// Assembles a `SourceNovel` from a detail page, including whatever
    /// chapters the page itself carries.
    pub fn parse_novel_page(&self, document: &Html, novel_path: &str) -> SourceNovel {
        let root = document.root_element();
        SourceNovel {
            path: novel_path.to_string(),
            name: Self::extract_name(root),
            cover: first_match(
                root,
                &[
                    (".picture-fotorama img", Extract::Attr("src")),
                    (".subject-cover img", Extract::Attr("src")),
                ],
            ),
            author: first_match(root, &[(".elem_author a", Extract::Text)]),
            genres: Self::extract_genres(document),
            summary: first_match(
                root,
                &[
                    (".leftContent .manga-description", Extract::Text),
                    ("#tab-description", Extract::Text),
                    (".manga-description", Extract::Text),
                ],
            ),
            status: first_match(
                root,
                &[
                    (".manga-status", Extract::Text),
                    (".subject-meta", Extract::Text),
                ],
            )
            .map(|text| NovelStatus::classify(&text))
            .unwrap_or(NovelStatus::Unknown),
            chapters: self.parse_chapter_refs(document),
        }
    }

    fn extract_name(root: ElementRef<'_>) -> String {
        if let Some(name) = first_match(
            root,
            &[
                ("h1.names .name", Extract::Text),
                ("h1.names", Extract::OwnText),
            ],
        ) {
            return name;
        }
        // Oldest layout: a single h1 carrying the title, alternate names
        // after a pipe, and an "electronic book" boilerplate phrase.
        first_match(root, &[("h1", Extract::Text)])
            .map(|raw| clean_page_title(&raw))
            .unwrap_or_default()
    }

    fn extract_genres(document: &Html) -> String {
        let genres = Selector::parse(".elem_genre a").unwrap();
        document
            .select(&genres)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Chapter discovery over a detail or contents page: chapter-table rows
    /// first, then anchors under the known table-of-contents containers.
    /// Chapter numbers are assigned from document order, not from anything
    /// the page claims.
    pub fn parse_chapter_refs(&self, document: &Html) -> Vec<ChapterItem> {
        let mut chapters = Self::chapters_from_rows(document);
        if chapters.is_empty() {
            chapters = Self::chapters_from_anchors(document);
        }
        for (index, chapter) in chapters.iter_mut().enumerate() {
            chapter.chapter_number = index as u32 + 1;
        }
        chapters
    }

    fn chapters_from_rows(document: &Html) -> Vec<ChapterItem> {
        let rows = Selector::parse("div.chapters-link table tr").unwrap();
        document
            .select(&rows)
            .filter_map(Self::parse_chapter_row)
            .collect()
    }

    fn parse_chapter_row(row: ElementRef<'_>) -> Option<ChapterItem> {
        let link_selector = Selector::parse("a").unwrap();
        let link = row.select(&link_selector).next()?;
        let name = strip_new_marker(&link.text().collect::<String>());
        let path = link.value().attr("href")?.replace(TRACKING_PARAM, "");
        if name.is_empty() || path.is_empty() {
            return None;
        }
        Some(ChapterItem {
            name,
            path,
            release_time: Self::extract_release_time(row),
            chapter_number: 0, // assigned after collection
        })
    }

    fn extract_release_time(row: ElementRef<'_>) -> Option<String> {
        let cells = Selector::parse("td").unwrap();
        // The machine-readable attribute beats the rendered cell text.
        let attr_date = row.select(&cells).find_map(|cell| {
            cell.value()
                .attr("data-date")
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        });
        attr_date
            .or_else(|| {
                row.select(&cells)
                    .last()
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
            })
            .filter(|text| !text.is_empty())
            .map(|raw| normalize_release_date(&raw))
    }

    fn chapters_from_anchors(document: &Html) -> Vec<ChapterItem> {
        for container in TOC_CONTAINERS {
            let anchors = Selector::parse(&format!("{container} a")).unwrap();
            let chapters: Vec<ChapterItem> = document
                .select(&anchors)
                .filter_map(Self::parse_chapter_anchor)
                .collect();
            if !chapters.is_empty() {
                return chapters;
            }
        }
        Vec::new()
    }

    fn parse_chapter_anchor(link: ElementRef<'_>) -> Option<ChapterItem> {
        let href = link.value().attr("href")?;
        if !href.contains(VOLUME_PATH_MARKER) {
            return None;
        }
        let name = strip_new_marker(&link.text().collect::<String>());
        if name.is_empty() {
            return None;
        }
        Some(ChapterItem {
            name,
            path: href.replace(TRACKING_PARAM, ""),
            release_time: None,
            chapter_number: 0,
        })
    }
}

fn clean_page_title(raw: &str) -> String {
    raw.replace(PAGE_TITLE_BOILERPLATE, "")
        .split('|')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Drops the trailing "new release" badge text the site appends to fresh
/// chapters. Only a whitespace-separated suffix counts, so names that merely
/// end in "new" survive intact.
fn strip_new_marker(name: &str) -> String {
    let trimmed = name.trim();
    for marker in NEW_MARKERS {
        if let Some(stripped) = trimmed.strip_suffix(marker) {
            if stripped.ends_with(char::is_whitespace) {
                return stripped.trim_end().to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Chapter tables render release dates with two-digit years ("15.03.21");
/// the attribute form usually carries four. Normalize to four digits and
/// pass anything unrecognized through untouched.
fn normalize_release_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%d.%m.%y") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"<html><body>
        <div class="tile">
            <div class="img"><img data-original="/covers/lazy1.jpg" src="/covers/spinner.gif"></div>
            <div class="desc"><h3><a href="/voina_mirov">Война миров</a></h3></div>
        </div>
        <div class="tile">
            <div class="img"><img src="/covers/plain2.jpg"></div>
            <div class="desc"><h3><a href="/master_i_margarita">Мастер и Маргарита</a></h3></div>
        </div>
        <div class="tile">
            <div class="img"><img src="/covers/broken.jpg"></div>
            <div class="desc"><h3>Без ссылки</h3></div>
        </div>
    </body></html>"#;

    const DETAIL_PAGE: &str = r#"<html><body>
        <div class="leftContent">
            <h1 class="names"><span class="name">Война миров</span><span class="eng-name">The War of the Worlds</span></h1>
            <div class="picture-fotorama"><img src="/covers/main.jpg"><img src="/covers/alt.jpg"></div>
            <span class="elem_author"><a href="/person/wells">Герберт Уэллс</a></span>
            <span class="elem_genre"><a href="/genre/fantastika">фантастика</a></span>
            <span class="elem_genre"><a href="/genre/klassika">классика</a></span>
            <div class="manga-description">Марсиане вторгаются в викторианскую Англию.</div>
            <div class="subject-meta"><p>Выпуск завершён</p><p>Перевод: продолжается</p></div>
            <div class="chapters-link"><table>
                <tr><td><a href="/voina_mirov/vol1/1?mtr=true">Книга первая. Глава 1 новое</a></td><td data-date="15.03.21">вчера</td></tr>
                <tr><td><a href="/voina_mirov/vol1/2">Книга первая. Глава 2</a></td><td>14.03.21</td></tr>
                <tr><td>служебная строка без ссылки</td></tr>
            </table></div>
        </div>
    </body></html>"#;

    fn parser() -> NovelParser {
        NovelParser
    }

    #[test]
    fn tiles_without_name_or_path_are_dropped() {
        let document = Html::parse_document(LISTING_PAGE);
        let novels = parser().parse_tiles(&document);

        assert_eq!(novels.len(), 2);
        assert_eq!(novels[0].name, "Война миров");
        assert_eq!(novels[0].path, "/voina_mirov");
        assert_eq!(novels[1].path, "/master_i_margarita");
    }

    #[test]
    fn tile_cover_prefers_lazy_loaded_attribute() {
        let document = Html::parse_document(LISTING_PAGE);
        let novels = parser().parse_tiles(&document);

        assert_eq!(novels[0].cover.as_deref(), Some("/covers/lazy1.jpg"));
        assert_eq!(novels[1].cover.as_deref(), Some("/covers/plain2.jpg"));
    }

    #[test]
    fn detail_page_fields_are_assembled() {
        let document = Html::parse_document(DETAIL_PAGE);
        let novel = parser().parse_novel_page(&document, "/voina_mirov");

        assert_eq!(novel.path, "/voina_mirov");
        assert_eq!(novel.name, "Война миров");
        assert_eq!(novel.cover.as_deref(), Some("/covers/main.jpg"));
        assert_eq!(novel.author.as_deref(), Some("Герберт Уэллс"));
        assert_eq!(novel.genres, "фантастика, классика");
        assert_eq!(
            novel.summary.as_deref(),
            Some("Марсиане вторгаются в викторианскую Англию.")
        );
        assert_eq!(novel.status, NovelStatus::Completed);
    }

    #[test]
    fn name_falls_back_to_own_text_of_names_heading() {
        let html = r#"<html><body>
            <h1 class="names">Мастер и Маргарита<span class="eng-name">The Master and Margarita</span></h1>
        </body></html>"#;
        let document = Html::parse_document(html);
        let novel = parser().parse_novel_page(&document, "/master_i_margarita");

        assert_eq!(novel.name, "Мастер и Маргарита");
    }

    #[test]
    fn name_falls_back_to_cleaned_page_heading() {
        let html = r#"<html><body>
            <h1>Война миров | The War of the Worlds Электронная книга Другие имена</h1>
        </body></html>"#;
        let document = Html::parse_document(html);
        let novel = parser().parse_novel_page(&document, "/voina_mirov");

        assert_eq!(novel.name, "Война миров");
    }

    #[test]
    fn missing_fields_degrade_to_documented_defaults() {
        let document = Html::parse_document("<html><body><p>пусто</p></body></html>");
        let novel = parser().parse_novel_page(&document, "/unknown");

        assert_eq!(novel.name, "");
        assert_eq!(novel.cover, None);
        assert_eq!(novel.author, None);
        assert_eq!(novel.genres, "");
        assert_eq!(novel.summary, None);
        assert_eq!(novel.status, NovelStatus::Unknown);
        assert!(novel.chapters.is_empty());
    }

    #[test]
    fn summary_falls_back_to_tab_panel_then_generic() {
        let tabbed = Html::parse_document(
            r#"<html><body><div id="tab-description">Описание во вкладке.</div></body></html>"#,
        );
        let novel = parser().parse_novel_page(&tabbed, "/x");
        assert_eq!(novel.summary.as_deref(), Some("Описание во вкладке."));

        let generic = Html::parse_document(
            r#"<html><body><div class="manga-description">Общее описание.</div></body></html>"#,
        );
        let novel = parser().parse_novel_page(&generic, "/x");
        assert_eq!(novel.summary.as_deref(), Some("Общее описание."));
    }

    #[test]
    fn status_badge_is_preferred_over_meta_block() {
        let html = r#"<html><body>
            <span class="manga-status">переводится</span>
            <div class="subject-meta">Год выпуска: 1897</div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let novel = parser().parse_novel_page(&document, "/x");

        assert_eq!(novel.status, NovelStatus::Ongoing);
    }

    #[test]
    fn chapter_rows_preserve_document_order_and_numbering() {
        let document = Html::parse_document(DETAIL_PAGE);
        let chapters = parser().parse_chapter_refs(&document);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter_number, 1);
        assert_eq!(chapters[1].chapter_number, 2);
        assert_eq!(chapters[0].name, "Книга первая. Глава 1");
        assert_eq!(chapters[0].path, "/voina_mirov/vol1/1");
        assert_eq!(chapters[1].path, "/voina_mirov/vol1/2");
    }

    #[test]
    fn release_time_prefers_machine_readable_date() {
        let document = Html::parse_document(DETAIL_PAGE);
        let chapters = parser().parse_chapter_refs(&document);

        // data-date attribute over rendered "вчера", two-digit years widened
        assert_eq!(chapters[0].release_time.as_deref(), Some("15.03.2021"));
        assert_eq!(chapters[1].release_time.as_deref(), Some("14.03.2021"));
    }

    #[test]
    fn chapter_anchors_are_filtered_to_volume_links() {
        let html = r#"<html><body>
            <div id="chapters-list">
                <a href="/kniga/vol1/1">Глава 1</a>
                <a href="/kniga/related">Похожие книги</a>
                <a href="/kniga/vol1/2?mtr=true">Глава 2</a>
            </div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let chapters = parser().parse_chapter_refs(&document);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].name, "Глава 1");
        assert_eq!(chapters[1].path, "/kniga/vol1/2");
        assert_eq!(chapters[1].chapter_number, 2);
        assert!(chapters.iter().all(|ch| ch.release_time.is_none()));
    }

    #[test]
    fn fallback_chain_returns_secondary_when_primary_missing() {
        let html = r#"<html><body>
            <div class="subject-cover"><img src="/covers/subject.jpg"></div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let novel = parser().parse_novel_page(&document, "/x");

        assert_eq!(novel.cover.as_deref(), Some("/covers/subject.jpg"));
    }

    #[test]
    fn repeated_parsing_is_byte_identical() {
        let document = Html::parse_document(DETAIL_PAGE);
        let first = serde_json::to_string(&parser().parse_novel_page(&document, "/voina_mirov"))
            .unwrap();
        let second = serde_json::to_string(&parser().parse_novel_page(&document, "/voina_mirov"))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn new_marker_is_only_stripped_as_suffix_word() {
        assert_eq!(strip_new_marker("Глава 1 новое"), "Глава 1");
        assert_eq!(strip_new_marker("Chapter 3 new"), "Chapter 3");
        assert_eq!(strip_new_marker("Renew"), "Renew");
        assert_eq!(strip_new_marker("новое"), "новое");
    }

    #[test]
    fn unrecognized_dates_pass_through() {
        assert_eq!(normalize_release_date("15.03.21"), "15.03.2021");
        assert_eq!(normalize_release_date("15.03.2021"), "15.03.2021");
        assert_eq!(normalize_release_date("вчера"), "вчера");
    }
}
