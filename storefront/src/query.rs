//! Catalog query engine.
//!
//! Each filter is a plain function over borrowed events that preserves input
//! order. [`CatalogQuery`] composes them: search, then category, then price
//! range, then sort. Every stage narrows the output of the previous one.

use crate::catalog::Catalog;
use crate::error::StorefrontError;
use crate::types::{Event, EventId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result count at which the listing offers "Load more"
pub const LOAD_MORE_THRESHOLD: usize = 12;

/// Keeps events whose title, description, venue or category contain `query`,
/// ignoring case. An empty query returns the input unchanged.
pub fn text_search<'a, I>(query: &str, events: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    if query.is_empty() {
        return events.into_iter().collect();
    }
    let needle = query.to_lowercase();
    events
        .into_iter()
        .filter(|event| event.matches_lowercase(&needle))
        .collect()
}

/// Keeps events in the given category (see [`CategoryFilter`])
pub fn by_category<'a, I>(category: &CategoryFilter, events: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| category.matches(event))
        .collect()
}

/// Keeps events priced within `range`, bounds inclusive
pub fn by_price_range<'a, I>(range: PriceRange, events: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| range.contains(event.price))
        .collect()
}

/// Finds the event with exactly this id
pub fn by_id<'a, I>(id: &str, events: I) -> Option<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events.into_iter().find(|event| event.id.as_str() == id)
}

/// Orders events by `criterion`.
///
/// The sort is stable, so events that compare equal keep their input order.
pub fn sort_events<'a, I>(criterion: SortBy, events: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    match criterion {
        SortBy::Date => sorted.sort_by_key(|event| event.starts_at()),
        SortBy::PriceLow => sorted.sort_by_key(|event| event.price),
        SortBy::PriceHigh => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortBy::Popularity => sorted.sort_by(|a, b| b.available_tickets.cmp(&a.available_tickets)),
    }
    sorted
}

// ============================================================================
// Parameters
// ============================================================================

/// Category selection; `"all"` in any case means no filtering
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,
    /// One category, compared case-insensitively
    Only(String),
}

impl CategoryFilter {
    /// Checks whether the event passes this filter
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => event.category.to_lowercase() == name.to_lowercase(),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(name) => f.write_str(name),
        }
    }
}

/// Inclusive price bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest accepted price
    pub min: Money,
    /// Highest accepted price
    pub max: Money,
}

impl PriceRange {
    /// Upper bound of the default slider range, in dollars
    pub const DEFAULT_MAX_DOLLARS: u64 = 1000;

    /// Creates a range from two bounds
    #[must_use]
    pub const fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    /// Creates a range from whole-dollar bounds
    #[must_use]
    pub const fn dollars(min: u64, max: u64) -> Self {
        Self::new(Money::from_dollars(min), Money::from_dollars(max))
    }

    /// Checks whether `price` lies within the bounds. An inverted range
    /// contains nothing.
    #[must_use]
    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::dollars(0, Self::DEFAULT_MAX_DOLLARS)
    }
}

/// Listing order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Chronological by date and time
    #[default]
    Date,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
    /// Most tickets available first
    Popularity,
}

impl SortBy {
    /// The string form used by the sort selector
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Popularity => "popularity",
        }
    }
}

impl FromStr for SortBy {
    type Err = StorefrontError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date" => Ok(Self::Date),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "popularity" => Ok(Self::Popularity),
            other => Err(StorefrontError::UnknownSortCriterion(other.to_string())),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Composed query
// ============================================================================

/// A full listing query: search text, category, price range and sort order.
///
/// `Default` is the cleared-filters state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search
    pub search: String,
    /// Category filter
    pub category: CategoryFilter,
    /// Price bounds
    pub price_range: PriceRange,
    /// Result order
    pub sort: SortBy,
}

impl CatalogQuery {
    /// Creates the cleared-filters query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Sets the category filter
    #[must_use]
    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the price bounds
    #[must_use]
    pub const fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    /// Sets the sort order
    #[must_use]
    pub const fn sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    /// Runs the query against `catalog`
    #[must_use]
    pub fn run<'a>(&self, catalog: &'a Catalog) -> QueryOutcome<'a> {
        let found = text_search(&self.search, catalog.events());
        let found = by_category(&self.category, found);
        let found = by_price_range(self.price_range, found);
        let events = sort_events(self.sort, found);

        tracing::debug!(
            search = %self.search,
            category = %self.category,
            sort = %self.sort,
            matched = events.len(),
            "Catalog query executed"
        );

        QueryOutcome { events }
    }
}

/// Events matched by a [`CatalogQuery`], in display order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryOutcome<'a> {
    events: Vec<&'a Event>,
}

impl<'a> QueryOutcome<'a> {
    /// Matched events
    #[must_use]
    pub fn events(&self) -> &[&'a Event] {
        &self.events
    }

    /// Number of matches
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Nothing matched; the listing shows "no results" with a reset option
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Matched ids in display order
    #[must_use]
    pub fn ids(&self) -> Vec<EventId> {
        self.events.iter().map(|event| event.id.clone()).collect()
    }

    /// Whether the listing should offer "Load more"
    #[must_use]
    pub fn needs_pagination(&self) -> bool {
        self.events.len() >= LOAD_MORE_THRESHOLD
    }
}

impl<'a> IntoIterator for QueryOutcome<'a> {
    type Item = &'a Event;
    type IntoIter = std::vec::IntoIter<&'a Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let catalog = Catalog::seed();
        assert_eq!(
            ids(&text_search("", catalog.events())),
            vec!["1", "2", "3", "4", "5", "6"]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = Catalog::seed();
        // title
        assert_eq!(ids(&text_search("MUSIC", catalog.events())), vec!["1"]);
        // venue
        assert_eq!(ids(&text_search("ballroom", catalog.events())), vec!["3"]);
        // category
        assert_eq!(ids(&text_search("entertain", catalog.events())), vec!["6"]);
        // description: "investors" appears only in the pitch competition
        assert_eq!(ids(&text_search("Investors", catalog.events())), vec!["5"]);
    }

    #[test]
    fn search_does_not_look_at_address_or_organizer() {
        let catalog = Catalog::seed();
        assert!(text_search("Laugh Factory", catalog.events()).is_empty());
        assert!(text_search("Austin", catalog.events()).is_empty());
    }

    #[test]
    fn search_without_match_is_empty() {
        let catalog = Catalog::seed();
        assert!(text_search("zzz", catalog.events()).is_empty());
    }

    #[test]
    fn category_filter() {
        let catalog = Catalog::seed();
        assert_eq!(ids(&by_category(&"Music".into(), catalog.events())), vec!["1"]);
        assert_eq!(ids(&by_category(&"music".into(), catalog.events())), vec!["1"]);
        assert_eq!(by_category(&"ALL".into(), catalog.events()).len(), 6);
        assert!(by_category(&"Sports".into(), catalog.events()).is_empty());
    }

    #[test]
    fn category_filter_is_exact_not_substring() {
        let catalog = Catalog::seed();
        assert!(by_category(&"Art".into(), catalog.events()).is_empty());
    }

    #[test]
    fn price_range_is_inclusive() {
        let catalog = Catalog::seed();
        assert_eq!(
            ids(&by_price_range(PriceRange::dollars(0, 50), catalog.events())),
            vec!["4", "5", "6"]
        );
        assert_eq!(
            ids(&by_price_range(PriceRange::dollars(0, 25), catalog.events())),
            vec!["5"]
        );
        let exact = PriceRange::new(Money::from_cents(4500), Money::from_cents(4500));
        assert_eq!(ids(&by_price_range(exact, catalog.events())), vec!["4"]);
    }

    #[test]
    fn inverted_price_range_matches_nothing() {
        let catalog = Catalog::seed();
        let inverted = PriceRange::dollars(100, 10);
        assert!(by_price_range(inverted, catalog.events()).is_empty());
    }

    #[test]
    fn by_id_lookup() {
        let catalog = Catalog::seed();
        assert_eq!(by_id("3", catalog.events()).map(|e| e.price), Some(Money::from_cents(14_999)));
        assert!(by_id("", catalog.events()).is_none());
        assert!(by_id("99", catalog.events()).is_none());
    }

    #[test]
    fn sort_orders_over_seed() {
        let catalog = Catalog::seed();
        assert_eq!(
            ids(&sort_events(SortBy::Date, catalog.events())),
            vec!["2", "5", "3", "4", "6", "1"]
        );
        assert_eq!(
            ids(&sort_events(SortBy::PriceLow, catalog.events())),
            vec!["5", "6", "4", "1", "3", "2"]
        );
        assert_eq!(
            ids(&sort_events(SortBy::PriceHigh, catalog.events())),
            vec!["2", "3", "1", "4", "6", "5"]
        );
        assert_eq!(
            ids(&sort_events(SortBy::Popularity, catalog.events())),
            vec!["1", "5", "2", "4", "6", "3"]
        );
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut events = Catalog::seed().events().to_vec();
        for event in &mut events {
            event.available_tickets = 10;
        }
        let catalog = Catalog::new(events).unwrap();
        assert_eq!(
            ids(&sort_events(SortBy::Popularity, catalog.events())),
            vec!["1", "2", "3", "4", "5", "6"]
        );
    }

    #[test]
    fn sort_criterion_parsing() {
        assert_eq!("price-low".parse::<SortBy>().unwrap(), SortBy::PriceLow);
        assert_eq!("popularity".parse::<SortBy>().unwrap(), SortBy::Popularity);
        assert_eq!(
            "cheapest".parse::<SortBy>().unwrap_err(),
            StorefrontError::UnknownSortCriterion("cheapest".to_string())
        );
        assert_eq!(serde_json::to_string(&SortBy::PriceHigh).unwrap(), "\"price-high\"");
        assert_eq!(SortBy::default(), SortBy::Date);
    }

    #[test]
    fn composed_query_narrows_then_sorts() {
        let catalog = Catalog::seed();
        let outcome = CatalogQuery::new()
            .search("night")
            .price_range(PriceRange::dollars(0, 100))
            .sort(SortBy::PriceLow)
            .run(&catalog);
        // titles of 4 and 6, "dance the night away" in the description of 1
        assert_eq!(ids(outcome.events()), vec!["6", "4", "1"]);
    }

    #[test]
    fn search_and_category_are_conjunctive() {
        let catalog = Catalog::seed();
        let outcome = CatalogQuery::new()
            .search("innovation")
            .category("Business")
            .run(&catalog);
        assert_eq!(outcome.ids(), vec![EventId::from("5")]);
    }

    #[test]
    fn cleared_query_lists_everything_by_date() {
        let catalog = Catalog::seed();
        let outcome = CatalogQuery::default().run(&catalog);
        assert_eq!(ids(outcome.events()), vec!["2", "5", "3", "4", "6", "1"]);
        assert!(!outcome.is_empty());
        assert!(!outcome.needs_pagination());
    }

    #[test]
    fn unmatched_query_is_empty_not_error() {
        let catalog = Catalog::seed();
        let outcome = CatalogQuery::new().category("Sports").run(&catalog);
        assert!(outcome.is_empty());
        assert_eq!(outcome.len(), 0);
    }
}
