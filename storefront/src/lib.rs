//! # EventTicket Storefront
//!
//! Event discovery and a simulated ticket purchase, written as reducers over
//! an immutable, injected event catalog.
//!
//! ## Modules
//!
//! - [`catalog`]: the event list (seed data or a JSON file)
//! - [`query`]: search, category, price and sort over catalog events
//! - [`browse`]: the listing page and navigation-bar search
//! - [`detail`]: a single event with its ticket selector
//! - [`checkout`]: the purchase form and simulated payment
//! - [`account`]: simulated login and sign-up
//! - [`config`]: environment-driven settings
//!
//! ## Example
//!
//! ```
//! use storefront::{Catalog, CatalogQuery, SortBy};
//!
//! let catalog = Catalog::seed();
//! let outcome = CatalogQuery::new()
//!     .category("Music")
//!     .sort(SortBy::PriceLow)
//!     .run(&catalog);
//! assert_eq!(outcome.len(), 1);
//! ```

pub mod account;
pub mod browse;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod detail;
pub mod error;
pub mod query;
pub mod types;

pub use account::{AccountAction, AccountEnvironment, AccountReducer, AccountState, AuthMode};
pub use browse::{BrowseAction, BrowseEnvironment, BrowseReducer, BrowseState};
pub use catalog::{Catalog, CatalogStats};
pub use checkout::{
    CheckoutAction, CheckoutEnvironment, CheckoutPhase, CheckoutReducer, CheckoutState, Receipt,
};
pub use config::StorefrontConfig;
pub use detail::EventDetail;
pub use error::{CatalogError, StorefrontError};
pub use query::{CatalogQuery, CategoryFilter, PriceRange, QueryOutcome, SortBy};
pub use types::{Event, EventId, Money, Notice, NoticeLevel, PaymentMethod};
