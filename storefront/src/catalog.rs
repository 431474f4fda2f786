//! The event catalog.
//!
//! A catalog is built once (from the seed data or a JSON file), validated,
//! and then shared read-only, usually as `Arc<Catalog>` inside reducer
//! environments.

use crate::error::CatalogError;
use crate::query;
use crate::types::{Event, EventId, Money};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Immutable collection of events, in listing order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    events: Vec<Event>,
}

/// Summary figures shown under the events listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Number of events in the catalog
    pub total_events: usize,
    /// Number of distinct categories
    pub categories: usize,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two events share an id.
    pub fn new(events: Vec<Event>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(&event.id) {
                return Err(CatalogError::DuplicateId(event.id.clone()));
            }
        }
        Ok(Self { events })
    }

    /// Parses a JSON array of events.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] on malformed input and
    /// [`CatalogError::DuplicateId`] on repeated ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Self::new(events)
    }

    /// Reads and parses a JSON catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Catalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), events = catalog.len(), "Catalog loaded from file");
        Ok(catalog)
    }

    /// All events in listing order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Checks if the catalog has no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Looks up an event by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Event> {
        query::by_id(id, &self.events)
    }

    /// Events flagged for promotion, in listing order
    #[must_use]
    pub fn featured(&self) -> Vec<&Event> {
        self.events.iter().filter(|event| event.featured).collect()
    }

    /// Distinct categories in order of first appearance
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .map(|event| event.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Totals for the stats strip
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_events: self.len(),
            categories: self.categories().len(),
        }
    }

    /// The built-in catalog of six events
    #[must_use]
    pub fn seed() -> Self {
        Self {
            events: seed_events(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

#[allow(clippy::expect_used)] // hardcoded calendar values are always valid
fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> (NaiveDate, NaiveTime) {
    (
        NaiveDate::from_ymd_opt(year, month, day).expect("hardcoded seed date should be valid"),
        NaiveTime::from_hms_opt(hour, minute, 0).expect("hardcoded seed time should be valid"),
    )
}

#[allow(clippy::too_many_lines)] // Seed data is naturally long but simple
fn seed_events() -> Vec<Event> {
    let (date, time) = at(2024, 7, 15, 18, 0);
    let music = Event {
        id: EventId::from("1"),
        title: "Summer Music Festival 2024".to_string(),
        description: "Join us for the ultimate summer music experience featuring top artists from around the world. Dance the night away under the stars with amazing performances, food trucks, and unforgettable memories.".to_string(),
        date,
        time,
        venue: "Central Park Amphitheater".to_string(),
        address: "123 Park Avenue, New York, NY 10001".to_string(),
        price: Money::from_cents(8999),
        category: "Music".to_string(),
        available_tickets: 500,
        image: "/src/assets/music-festival.jpg".to_string(),
        organizer: "MegaEvents Inc.".to_string(),
        featured: true,
    };

    let (date, time) = at(2024, 6, 20, 9, 0);
    let tech = Event {
        id: EventId::from("2"),
        title: "Tech Innovation Conference".to_string(),
        description: "Discover the latest in technology and innovation. Network with industry leaders, attend inspiring keynotes, and explore cutting-edge demos from startups and established companies.".to_string(),
        date,
        time,
        venue: "Convention Center Hall A".to_string(),
        address: "456 Tech Boulevard, San Francisco, CA 94105".to_string(),
        price: Money::from_cents(29_999),
        category: "Technology".to_string(),
        available_tickets: 200,
        image: "/src/assets/tech-conference.jpg".to_string(),
        organizer: "TechForward".to_string(),
        featured: true,
    };

    let (date, time) = at(2024, 6, 28, 19, 30);
    let wine = Event {
        id: EventId::from("3"),
        title: "Food & Wine Tasting Evening".to_string(),
        description: "An elegant evening of gourmet food pairings and wine tastings from renowned chefs and sommeliers. Experience culinary artistry in an intimate setting.".to_string(),
        date,
        time,
        venue: "The Grand Ballroom".to_string(),
        address: "789 Culinary Street, Los Angeles, CA 90210".to_string(),
        price: Money::from_cents(14_999),
        category: "Food & Drink".to_string(),
        available_tickets: 80,
        image: "/src/assets/wine-tasting.jpg".to_string(),
        organizer: "Gourmet Experiences".to_string(),
        featured: false,
    };

    let (date, time) = at(2024, 7, 3, 20, 0);
    let art = Event {
        id: EventId::from("4"),
        title: "Art Gallery Opening Night".to_string(),
        description: "Celebrate contemporary art with local and international artists. Enjoy live performances, interactive installations, and meet the artists behind the masterpieces.".to_string(),
        date,
        time,
        venue: "Modern Art Museum".to_string(),
        address: "321 Gallery Lane, Chicago, IL 60601".to_string(),
        price: Money::from_cents(4500),
        category: "Art & Culture".to_string(),
        available_tickets: 150,
        image: "/src/assets/art-gallery.jpg".to_string(),
        organizer: "Cultural Arts Society".to_string(),
        featured: false,
    };

    let (date, time) = at(2024, 6, 25, 14, 0);
    let pitch = Event {
        id: EventId::from("5"),
        title: "Startup Pitch Competition".to_string(),
        description: "Watch promising startups pitch their innovative ideas to a panel of investors. Network with entrepreneurs, investors, and tech enthusiasts in this dynamic event.".to_string(),
        date,
        time,
        venue: "Innovation Hub Auditorium".to_string(),
        address: "555 Startup Avenue, Austin, TX 78701".to_string(),
        price: Money::from_cents(2500),
        category: "Business".to_string(),
        available_tickets: 300,
        image: "/src/assets/startup-pitch.jpg".to_string(),
        organizer: "Entrepreneur Network".to_string(),
        featured: false,
    };

    let (date, time) = at(2024, 7, 10, 21, 0);
    let comedy = Event {
        id: EventId::from("6"),
        title: "Comedy Night Spectacular".to_string(),
        description: "Get ready for an evening of non-stop laughter with acclaimed comedians. Perfect for a fun night out with friends or a unique date night experience.".to_string(),
        date,
        time,
        venue: "The Comedy Club".to_string(),
        address: "888 Laugh Street, New York, NY 10002".to_string(),
        price: Money::from_cents(3500),
        category: "Entertainment".to_string(),
        available_tickets: 120,
        image: "/src/assets/comedy-night.jpg".to_string(),
        organizer: "Laugh Factory".to_string(),
        featured: false,
    };

    vec![music, tech, wine, art, pitch, comedy]
}
