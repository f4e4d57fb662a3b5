//! Query-parameter builders for the list and search endpoints.
//!
//! Both the dictionary term listing and the search endpoint take the same
//! family of optional filters. The builders render only the parameters a
//! caller set, so URLs stay minimal and cache-friendly.

use pagination::PageRequest;

use super::language::Language;
use super::model::TermStatus;

/// Sort orders understood by the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    /// Most recently created first.
    Newest,
    /// Oldest first.
    Oldest,
    /// Most viewed first.
    Popularity,
    /// Locale-alphabetical by title.
    Alphabetical,
}

impl SearchSort {
    /// Wire value for the `sort` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popularity => "popularity",
            Self::Alphabetical => "alphabetical",
        }
    }
}

/// Filters for `GET terms`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermListQuery {
    /// Restrict to one category.
    pub category_id: Option<i64>,
    /// Restrict to titles starting with this letter.
    pub letter: Option<String>,
    /// Restrict to one moderation stage.
    pub status: Option<TermStatus>,
    /// Page to fetch; `None` leaves paging to the server default.
    pub page: Option<PageRequest>,
}

impl TermListQuery {
    /// Render the query pairs, always leading with `lang`.
    #[must_use]
    pub fn query_pairs(&self, lang: Language) -> Vec<(String, String)> {
        let mut pairs = vec![("lang".to_owned(), lang.wire_code().to_owned())];
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id".to_owned(), category_id.to_string()));
        }
        if let Some(letter) = &self.letter {
            pairs.push(("letter".to_owned(), letter.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_owned(), status.as_str().to_owned()));
        }
        if let Some(page) = self.page {
            pairs.extend(page.query_pairs());
        }
        pairs
    }
}

/// Parameters for `GET search`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text query.
    pub q: String,
    /// Language to search in.
    pub lang: Language,
    /// Restrict to one category.
    pub category_id: Option<i64>,
    /// Restrict to titles starting with this letter.
    pub letter: Option<String>,
    /// Restrict to one moderation stage.
    pub status: Option<TermStatus>,
    /// Requested ordering.
    pub sort: Option<SearchSort>,
    /// Page to fetch.
    pub page: Option<PageRequest>,
}

impl SearchQuery {
    /// A plain query in one language with no further filters.
    #[must_use]
    pub fn new(q: impl Into<String>, lang: Language) -> Self {
        Self {
            q: q.into(),
            lang,
            category_id: None,
            letter: None,
            status: None,
            sort: None,
            page: None,
        }
    }

    /// Restrict the result set to a single hit.
    ///
    /// Used by the lookup orchestrator, which only needs the best match.
    #[must_use]
    pub fn single_best(mut self) -> Self {
        // PageRequest::new(1, 1) is statically valid.
        self.page = PageRequest::new(1, 1).ok();
        self
    }

    /// Render the query pairs, always leading with `q` and `lang`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("q".to_owned(), self.q.clone()),
            ("lang".to_owned(), self.lang.wire_code().to_owned()),
        ];
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id".to_owned(), category_id.to_string()));
        }
        if let Some(letter) = &self.letter {
            pairs.push(("letter".to_owned(), letter.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_owned(), status.as_str().to_owned()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_owned(), sort.as_str().to_owned()));
        }
        if let Some(page) = self.page {
            pairs.extend(page.query_pairs());
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    //! Parameter rendering coverage.

    use super::*;

    #[test]
    fn term_list_renders_page_and_size() {
        let query = TermListQuery {
            page: PageRequest::new(3, 20).ok(),
            ..TermListQuery::default()
        };

        let pairs = query.query_pairs(Language::Ru);
        assert_eq!(
            pairs,
            [
                ("lang".to_owned(), "ru".to_owned()),
                ("page".to_owned(), "3".to_owned()),
                ("size".to_owned(), "20".to_owned()),
            ]
        );
    }

    #[test]
    fn term_list_renders_all_filters() {
        let query = TermListQuery {
            category_id: Some(7),
            letter: Some("Е".to_owned()),
            status: Some(TermStatus::Approved),
            page: None,
        };

        let pairs = query.query_pairs(Language::Kk);
        assert_eq!(
            pairs,
            [
                ("lang".to_owned(), "kz".to_owned()),
                ("category_id".to_owned(), "7".to_owned()),
                ("letter".to_owned(), "Е".to_owned()),
                ("status".to_owned(), "approved".to_owned()),
            ],
            "Kazakh maps to the kz wire code"
        );
    }

    #[test]
    fn search_single_best_caps_the_page_at_one() {
        let pairs = SearchQuery::new("sovereignty", Language::En)
            .single_best()
            .query_pairs();
        assert!(pairs.contains(&("size".to_owned(), "1".to_owned())));
        assert!(pairs.contains(&("page".to_owned(), "1".to_owned())));
    }

    #[test]
    fn search_renders_sort() {
        let mut query = SearchQuery::new("м", Language::Ru);
        query.sort = Some(SearchSort::Popularity);
        assert!(query
            .query_pairs()
            .contains(&("sort".to_owned(), "popularity".to_owned())));
    }
}
