//! Listing filter options: the site's sort orderings and catalog categories.
//!
//! Both enumerations mirror the picker controls the host renders; invalid or
//! absent query values fall back to the documented defaults.

/// Sort orderings recognized by the `sortType` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Rate,
    Popularity,
    Updated,
    Created,
    Name,
}

impl Sort {
    pub const ALL: [Self; 5] = [
        Self::Rate,
        Self::Popularity,
        Self::Updated,
        Self::Created,
        Self::Name,
    ];

    pub fn query_value(self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Popularity => "popularity",
            Self::Updated => "updated",
            Self::Created => "created",
            Self::Name => "name",
        }
    }

    /// Picker label shown by the host.
    pub fn label(self) -> &'static str {
        match self {
            Self::Rate => "По рейтингу",
            Self::Popularity => "По популярности",
            Self::Updated => "По дате обновления",
            Self::Created => "По дате добавления",
            Self::Name => "По названию",
        }
    }

    /// Maps a query value back to an ordering; unrecognized values fall back
    /// to the rating default.
    pub fn from_query_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|sort| sort.query_value() == value)
            .unwrap_or_default()
    }
}

/// Catalog categories; selecting one switches the listing URL to the
/// `/list/category/<slug>` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Proza,
    KlassicheskaiaLiteratura,
    LightNovel,
    BulvarnaiaProza,
    Children,
    SetevaiaPublikaciia,
    Epos,
    Lirika,
    Publicistika,
    Art,
    NaukaIObrazovanie,
}

impl Category {
    pub const ALL: [Self; 12] = [
        Self::All,
        Self::Proza,
        Self::KlassicheskaiaLiteratura,
        Self::LightNovel,
        Self::BulvarnaiaProza,
        Self::Children,
        Self::SetevaiaPublikaciia,
        Self::Epos,
        Self::Lirika,
        Self::Publicistika,
        Self::Art,
        Self::NaukaIObrazovanie,
    ];

    /// URL path slug; `All` keeps the plain listing path.
    pub fn slug(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Proza => Some("proza"),
            Self::KlassicheskaiaLiteratura => Some("klassicheskaia_literatura"),
            Self::LightNovel => Some("light_novel"),
            Self::BulvarnaiaProza => Some("bulvarnaia_proza"),
            Self::Children => Some("children"),
            Self::SetevaiaPublikaciia => Some("setevaia_publikaciia"),
            Self::Epos => Some("epos"),
            Self::Lirika => Some("lirika"),
            Self::Publicistika => Some("publicistika"),
            Self::Art => Some("art"),
            Self::NaukaIObrazovanie => Some("nauka_i_obrazovanie"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Все",
            Self::Proza => "Проза",
            Self::KlassicheskaiaLiteratura => "Классическая литература",
            Self::LightNovel => "Ранобэ",
            Self::BulvarnaiaProza => "Бульварная проза",
            Self::Children => "Детская",
            Self::SetevaiaPublikaciia => "Сетевая публикация",
            Self::Epos => "Эпос",
            Self::Lirika => "Лирика",
            Self::Publicistika => "Публицистика",
            Self::Art => "Искусство",
            Self::NaukaIObrazovanie => "Наука и образование",
        }
    }

    /// Maps a URL slug back to a category; unknown slugs fall back to `All`.
    pub fn from_slug(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == Some(value))
            .unwrap_or_default()
    }
}

/// Options the host passes to the popular-novels entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularNovelsOptions {
    /// Ignore the sort selection and order by date added instead.
    pub show_latest_novels: bool,
    pub sort: Option<Sort>,
    pub category: Option<Category>,
}
