//! Event detail view model.

use crate::catalog::Catalog;
use crate::checkout::CheckoutAction;
use crate::error::StorefrontError;
use crate::types::{Event, Money};

/// Most tickets the detail page offers in one order
pub const DEFAULT_MAX_TICKETS_PER_ORDER: u32 = 10;

/// An event opened on the detail page, with the selected ticket count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDetail<'a> {
    event: &'a Event,
    quantity: u32,
    max_per_order: u32,
}

impl<'a> EventDetail<'a> {
    /// Opens the detail page for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::EventNotFound`] if the id is not in the
    /// catalog; the caller shows the not-found page.
    pub fn load(catalog: &'a Catalog, id: &str, max_per_order: u32) -> Result<Self, StorefrontError> {
        let event = catalog
            .get(id)
            .ok_or_else(|| StorefrontError::EventNotFound(id.into()))?;
        Ok(Self {
            event,
            quantity: 1,
            max_per_order,
        })
    }

    /// The event shown
    #[must_use]
    pub const fn event(&self) -> &'a Event {
        self.event
    }

    /// Currently selected ticket count
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Choices offered by the quantity selector. Empty when sold out.
    #[must_use]
    pub fn quantity_options(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.event.available_tickets.min(self.max_per_order)
    }

    /// Selects a ticket count; values outside [`Self::quantity_options`] are ignored
    pub fn select_quantity(&mut self, quantity: u32) -> bool {
        if self.quantity_options().contains(&quantity) {
            self.quantity = quantity;
            true
        } else {
            false
        }
    }

    /// Price for the selected ticket count, before fees
    #[must_use]
    pub const fn total(&self) -> Money {
        self.event.price.saturating_multiply(self.quantity)
    }

    /// Long date, e.g. "Monday, July 15, 2024"
    #[must_use]
    pub fn formatted_date(&self) -> String {
        self.event.date.format("%A, %B %-d, %Y").to_string()
    }

    /// 12-hour start time, e.g. "6:00 PM"
    #[must_use]
    pub fn formatted_time(&self) -> String {
        self.event.time.format("%-I:%M %p").to_string()
    }

    /// "Book now": the action that opens checkout for this selection
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::SoldOut`] when no tickets remain.
    pub fn book(&self) -> Result<CheckoutAction, StorefrontError> {
        if self.event.is_sold_out() {
            return Err(StorefrontError::SoldOut(self.event.id.clone()));
        }
        Ok(CheckoutAction::Start {
            event_id: self.event.id.clone(),
            quantity: self.quantity,
        })
    }
}
