//! Browse flow: the events listing and the home-page search.
//!
//! All actions are synchronous; the reducer re-runs the catalog query and
//! stores the matching ids. No effects are produced.

use crate::catalog::Catalog;
use crate::query::{self, CatalogQuery, CategoryFilter, PriceRange, SortBy};
use crate::types::EventId;
use eventticket_core::{SmallVec, effect::Effect, reducer::Reducer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State of the listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    /// Current filter and sort selection
    pub query: CatalogQuery,
    /// Matching ids in display order
    pub results: Vec<EventId>,
    /// A navigation-bar search is showing in place of the featured events
    pub search_active: bool,
}

impl BrowseState {
    /// Whether the "no results" view should be shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Inputs to the browse flow
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseAction {
    /// Inline search box edited
    SearchChanged(String),
    /// Category selector changed
    CategorySelected(CategoryFilter),
    /// Price slider moved
    PriceRangeChanged(PriceRange),
    /// Sort selector changed
    SortChanged(SortBy),
    /// "Clear filters" pressed
    FiltersCleared,
    /// Search submitted from the navigation bar
    NavbarSearch(String),
}

/// Dependencies of the browse flow
#[derive(Clone, Debug)]
pub struct BrowseEnvironment {
    /// Shared catalog
    pub catalog: Arc<Catalog>,
    /// Price bounds restored by "Clear filters"
    pub default_price_range: PriceRange,
}

impl BrowseEnvironment {
    /// Creates an environment with the default price bounds
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            default_price_range: PriceRange::default(),
        }
    }

    /// Overrides the price bounds used when filters are cleared
    #[must_use]
    pub const fn with_default_price_range(mut self, range: PriceRange) -> Self {
        self.default_price_range = range;
        self
    }

    /// The cleared-filters query for this environment
    #[must_use]
    pub fn cleared_query(&self) -> CatalogQuery {
        CatalogQuery::new().price_range(self.default_price_range)
    }

    /// The listing as first shown: cleared filters, every event by date
    #[must_use]
    pub fn initial_state(&self) -> BrowseState {
        let query = self.cleared_query();
        let results = query.run(&self.catalog).ids();
        BrowseState {
            query,
            results,
            search_active: false,
        }
    }
}

/// Reducer for the browse flow
#[derive(Clone, Debug, Default)]
pub struct BrowseReducer;

impl BrowseReducer {
    /// Creates a new `BrowseReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn refresh(state: &mut BrowseState, catalog: &Catalog) {
        state.results = state.query.run(catalog).ids();
        state.search_active = false;
    }
}

impl Reducer for BrowseReducer {
    type State = BrowseState;
    type Action = BrowseAction;
    type Environment = BrowseEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BrowseAction::SearchChanged(text) => {
                state.query.search = text;
                Self::refresh(state, &env.catalog);
            },
            BrowseAction::CategorySelected(category) => {
                state.query.category = category;
                Self::refresh(state, &env.catalog);
            },
            BrowseAction::PriceRangeChanged(range) => {
                state.query.price_range = range;
                Self::refresh(state, &env.catalog);
            },
            BrowseAction::SortChanged(sort) => {
                state.query.sort = sort;
                Self::refresh(state, &env.catalog);
            },
            BrowseAction::FiltersCleared => {
                state.query = env.cleared_query();
                Self::refresh(state, &env.catalog);
            },
            BrowseAction::NavbarSearch(text) => {
                state.query.search.clear();
                if text.is_empty() {
                    Self::refresh(state, &env.catalog);
                } else {
                    state.results = query::text_search(&text, env.catalog.events())
                        .into_iter()
                        .map(|event| event.id.clone())
                        .collect();
                    state.search_active = true;
                }
                tracing::debug!(search = %text, matched = state.results.len(), "Navbar search");
            },
        }

        SmallVec::new()
    }
}
