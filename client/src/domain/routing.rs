//! Hash-based location parsing and formatting.
//!
//! Locations look like `#terms/42` or `#search?q=sovereignty&lang=en`: a
//! route path, optionally followed by a percent-encoded query string. The
//! parser is total; anything unrecognised lands on [`Route::Home`].

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Named page views of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page with the lookup box.
    Home,
    /// Term catalog with filters.
    Catalog,
    /// About page.
    About,
    /// API documentation page.
    Api,
    /// Contact page.
    Contact,
    /// Sign-in form.
    Login,
    /// Registration form.
    Register,
    /// Password recovery form.
    ForgotPassword,
    /// Account profile.
    Profile,
    /// Favourites list.
    Favorites,
    /// Term suggestion form.
    Suggest,
    /// Search results page.
    Search,
    /// Admin console.
    Admin,
    /// Single term page (`terms/:id`).
    Terms,
    /// Single category page (`categories/:id`).
    Categories,
}

impl Route {
    /// Path segment used in hash locations.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Catalog => "catalog",
            Self::About => "about",
            Self::Api => "api",
            Self::Contact => "contact",
            Self::Login => "login",
            Self::Register => "register",
            Self::ForgotPassword => "forgot-password",
            Self::Profile => "profile",
            Self::Favorites => "favorites",
            Self::Suggest => "suggest",
            Self::Search => "search",
            Self::Admin => "admin",
            Self::Terms => "terms",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

const NAMED_ROUTES: [Route; 13] = [
    Route::Home,
    Route::Catalog,
    Route::About,
    Route::Api,
    Route::Contact,
    Route::Login,
    Route::Register,
    Route::ForgotPassword,
    Route::Profile,
    Route::Favorites,
    Route::Suggest,
    Route::Search,
    Route::Admin,
];

/// A parsed location: the route plus its parameter map.
///
/// Path parameters (the `:id` of `terms/:id`) and query parameters share the
/// same map, matching how the views consume them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    /// Resolved route.
    pub route: Route,
    /// Percent-decoded parameters.
    pub params: BTreeMap<String, String>,
}

impl RouteState {
    /// Location for a route with no parameters.
    #[must_use]
    pub fn bare(route: Route) -> Self {
        Self {
            route,
            params: BTreeMap::new(),
        }
    }
}

/// Parse a hash location into a [`RouteState`].
///
/// The leading `#` is optional. Unknown paths fall back to [`Route::Home`]
/// with no parameters.
///
/// # Examples
/// ```
/// use sozdik::domain::routing::{parse_hash, Route};
///
/// let state = parse_hash("#terms/42");
/// assert_eq!(state.route, Route::Terms);
/// assert_eq!(state.params.get("id").map(String::as_str), Some("42"));
/// ```
#[must_use]
pub fn parse_hash(location: &str) -> RouteState {
    let hash = location.strip_prefix('#').unwrap_or(location);
    let (path, query) = match hash.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (hash, None),
    };

    let mut params: BTreeMap<String, String> = query
        .map(|raw| {
            form_urlencoded::parse(raw.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    if let Some(id) = entity_id(path, "terms/") {
        params.insert("id".to_owned(), id);
        return RouteState {
            route: Route::Terms,
            params,
        };
    }
    if let Some(id) = entity_id(path, "categories/") {
        params.insert("id".to_owned(), id);
        return RouteState {
            route: Route::Categories,
            params,
        };
    }

    match NAMED_ROUTES.iter().find(|route| route.path() == path) {
        Some(route) => RouteState {
            route: *route,
            params,
        },
        None => RouteState::bare(Route::Home),
    }
}

fn entity_id(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    let id = rest.split('/').next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_owned())
}

/// Render a route and parameters back into a hash location.
///
/// The inverse of [`parse_hash`] for named routes; entity routes take their
/// identifier from the `id` parameter.
#[must_use]
pub fn format_hash(route: Route, params: &BTreeMap<String, String>) -> String {
    let mut path = format!("#{}", route.path());
    let mut query_params = params.clone();

    if matches!(route, Route::Terms | Route::Categories) {
        if let Some(id) = query_params.remove("id") {
            path.push('/');
            path.push_str(&id);
        }
    }

    if query_params.is_empty() {
        return path;
    }
    let query: String = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query_params.iter())
        .finish();
    format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
    //! Parser totality and round-trip coverage.

    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_term_path_parameter() {
        let state = parse_hash("terms/42");
        assert_eq!(state.route, Route::Terms);
        assert_eq!(state.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn parses_category_path_parameter() {
        let state = parse_hash("#categories/7");
        assert_eq!(state.route, Route::Categories);
        assert_eq!(state.params.get("id").map(String::as_str), Some("7"));
    }

    #[rstest]
    #[case::unknown("#nowhere")]
    #[case::empty("")]
    #[case::bare_hash("#")]
    #[case::missing_id("#terms/")]
    fn falls_back_to_home(#[case] location: &str) {
        let state = parse_hash(location);
        assert_eq!(state.route, Route::Home);
        assert!(state.params.is_empty());
    }

    #[test]
    fn decodes_query_parameters() {
        let state = parse_hash("#search?q=%D0%B5%D0%B3%D0%B5%D0%BC%D0%B5%D0%BD%D0%B4%D1%96%D0%BA&lang=kk");
        assert_eq!(state.route, Route::Search);
        assert_eq!(
            state.params.get("q").map(String::as_str),
            Some("егемендік"),
            "query values are percent-decoded"
        );
        assert_eq!(state.params.get("lang").map(String::as_str), Some("kk"));
    }

    #[rstest]
    #[case::home("#home")]
    #[case::forgot("#forgot-password")]
    #[case::admin("#admin")]
    fn named_routes_round_trip(#[case] location: &str) {
        let state = parse_hash(location);
        assert_eq!(format_hash(state.route, &state.params), location);
    }

    #[test]
    fn formats_entity_route_with_id_segment() {
        let mut params = BTreeMap::new();
        params.insert("id".to_owned(), "42".to_owned());
        assert_eq!(format_hash(Route::Terms, &params), "#terms/42");
    }

    #[test]
    fn formats_query_parameters() {
        let mut params = BTreeMap::new();
        params.insert("q".to_owned(), "егемендік".to_owned());
        let hash = format_hash(Route::Search, &params);
        assert!(hash.starts_with("#search?q="));
        assert_eq!(parse_hash(&hash).params.get("q").map(String::as_str), Some("егемендік"));
    }
}
