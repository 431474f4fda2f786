//! Error types for the storefront.

use crate::types::EventId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid JSON event list
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two events share the same id
    #[error("duplicate event id {0} in catalog")]
    DuplicateId(EventId),
}

/// Errors surfaced by the storefront flows
///
/// The `Display` text is the user-facing description; [`StorefrontError::title`]
/// is the short headline shown with it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorefrontError {
    /// No event with this id exists in the catalog
    #[error("The event you are looking for does not exist.")]
    EventNotFound(EventId),

    /// The event has no tickets left
    #[error("There are no tickets left for this event.")]
    SoldOut(EventId),

    /// A required purchaser or credential field is empty
    #[error("Please fill in all required fields.")]
    MissingRequiredFields,

    /// Credit card details are incomplete
    #[error("Please complete your payment details.")]
    MissingPaymentDetails,

    /// Sign-up without first or last name
    #[error("Please enter your name.")]
    MissingName,

    /// Sign-up password and confirmation differ
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Sort criterion string not recognised
    #[error("Unknown sort criterion: {0}")]
    UnknownSortCriterion(String),
}

impl StorefrontError {
    /// Short headline for the notice shown alongside the message
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "Event Not Found",
            Self::SoldOut(_) => "Sold Out",
            Self::MissingRequiredFields | Self::MissingName => "Missing Information",
            Self::MissingPaymentDetails => "Payment Information Required",
            Self::PasswordMismatch => "Password Mismatch",
            Self::UnknownSortCriterion(_) => "Invalid Sort",
        }
    }
}
