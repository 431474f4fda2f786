//! Domain types for the EventTicket storefront.
//!
//! Value objects shared by the catalog, the query engine and the
//! checkout/account flows.

use crate::error::StorefrontError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque identifier of a catalog event
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates an `EventId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
///
/// Serializes as a decimal dollar amount (`89.99`, `45`), the shape used by
/// catalog files. Deserializing rejects negative amounts and anything finer
/// than a cent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero dollars
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars, saturating on overflow
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two money amounts, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn saturating_multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Takes `percent` percent of this amount, rounding half-up to the cent
    #[must_use]
    pub const fn percent(self, percent: u32) -> Self {
        let scaled = self.0.saturating_mul(percent as u64).saturating_add(50);
        Self(scaled / 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Largest cent amount an `f64` holds exactly (2^53)
const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

impl Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u64(self.0 / 100)
        } else {
            #[allow(clippy::cast_precision_loss)] // catalog prices are far below 2^53 cents
            let dollars = self.0 as f64 / 100.0;
            serializer.serialize_f64(dollars)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DollarVisitor)
    }
}

struct DollarVisitor;

impl serde::de::Visitor<'_> for DollarVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative dollar amount with at most two decimal places")
    }

    fn visit_u64<E: serde::de::Error>(self, dollars: u64) -> Result<Money, E> {
        dollars
            .checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(format!("dollar amount {dollars} is too large")))
    }

    fn visit_i64<E: serde::de::Error>(self, dollars: i64) -> Result<Money, E> {
        match u64::try_from(dollars) {
            Ok(dollars) => self.visit_u64(dollars),
            Err(_) => Err(E::custom(format!("dollar amount {dollars} is negative"))),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above the cast
    fn visit_f64<E: serde::de::Error>(self, dollars: f64) -> Result<Money, E> {
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(E::custom(format!("dollar amount {dollars} is negative or not finite")));
        }
        let scaled = dollars * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return Err(E::custom(format!("dollar amount {dollars} has more than two decimal places")));
        }
        if cents > MAX_EXACT_CENTS {
            return Err(E::custom(format!("dollar amount {dollars} is too large")));
        }
        Ok(Money(cents as u64))
    }
}

// ============================================================================
// Event
// ============================================================================

/// A listed event
///
/// Field names serialize in camelCase (`availableTickets`), matching the
/// catalog file format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier within the catalog
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Long description
    pub description: String,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Local start time (`"18:00"` or `"18:00:00"` in catalog files)
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    /// Venue name
    pub venue: String,
    /// Street address of the venue
    pub address: String,
    /// Price per ticket
    pub price: Money,
    /// Category label (e.g. "Music")
    pub category: String,
    /// Remaining ticket capacity
    pub available_tickets: u32,
    /// Image path
    pub image: String,
    /// Organizer name
    pub organizer: String,
    /// Promoted on the home page
    pub featured: bool,
}

/// `HH:MM` start times, with optional seconds
mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        serializer.collect_str(&time.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(|error| serde::de::Error::custom(format!("invalid time {raw:?}: {error}")))
    }
}

impl Event {
    /// Date and time combined into one orderable timestamp
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Checks whether any tickets remain
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available_tickets == 0
    }

    /// Case-insensitive substring match over the searchable fields
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.venue, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

// ============================================================================
// Payment
// ============================================================================

/// Payment method offered at checkout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit card (requires card details)
    #[default]
    Credit,
    /// Debit card
    Debit,
    /// `PayPal` account
    PayPal,
}

impl PaymentMethod {
    /// Whether card details must be filled in before submitting
    #[must_use]
    pub const fn requires_card_details(self) -> bool {
        matches!(self, Self::Credit)
    }
}

// ============================================================================
// Notices
// ============================================================================

/// Severity of a user-facing notice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Confirmation of a completed step
    Success,
    /// Something the user has to fix
    Error,
}

/// A user-facing message produced by a flow (rendered as a toast by the UI)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Short headline
    pub title: String,
    /// Body text
    pub description: String,
}

impl Notice {
    /// Creates a success notice
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl From<&StorefrontError> for Notice {
    fn from(error: &StorefrontError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: error.title().to_string(),
            description: error.to_string(),
        }
    }
}
