// Entity Models - one per static JSON resource
//
// Each entity:
// - Deserializes from the field names used in the JSON files
// - Carries a stable `id` unique within its collection
// - Validates itself after decoding (see `Record::validate`)
// - Implements the capability traits the grouping engine needs

pub mod notice;
pub mod activity;
pub mod document;
pub mod photo;
pub mod board;
pub mod credential;

pub use notice::{Notice, Attachment};
pub use activity::{Activity, ActivityStatus, StatusFilter};
pub use document::Document;
pub use photo::Photo;
pub use board::{BoardRoster, BoardMember, CouncilMember};
pub use credential::{Credential, Role};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::temporal::{IsoDate, Year};

// ============================================================================
// RECORD
// ============================================================================

/// A flat entity loaded from a collection resource.
pub trait Record: DeserializeOwned {
    fn id(&self) -> &str;

    /// Checks invariants serde cannot express. Returns the reason on failure.
    fn validate(&self) -> Result<(), String> {
        if self.id().trim().is_empty() {
            return Err("empty id".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// CAPABILITIES (used by crate::grouping)
// ============================================================================

/// Records with a primary date (publication, start, event date).
pub trait Dated {
    fn primary_date(&self) -> &IsoDate;

    fn primary_day(&self) -> NaiveDate {
        self.primary_date().day()
    }
}

/// Records grouped by year alone.
pub trait Yearly {
    fn year(&self) -> Year;
}

/// Free-text fields matched by search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Records spanning an inclusive `[start, end]` day interval.
pub trait Scheduled {
    fn start_day(&self) -> NaiveDate;
    fn end_day(&self) -> NaiveDate;
}

/// Records carrying an activity status.
pub trait HasStatus {
    fn status(&self) -> ActivityStatus;
}

// References work wherever owned records do, so filters can be chained
// over borrowed collections without cloning.

impl<T: Dated + ?Sized> Dated for &T {
    fn primary_date(&self) -> &IsoDate {
        (**self).primary_date()
    }
}

impl<T: Yearly + ?Sized> Yearly for &T {
    fn year(&self) -> Year {
        (**self).year()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }
}

impl<T: Scheduled + ?Sized> Scheduled for &T {
    fn start_day(&self) -> NaiveDate {
        (**self).start_day()
    }

    fn end_day(&self) -> NaiveDate {
        (**self).end_day()
    }
}

impl<T: HasStatus + ?Sized> HasStatus for &T {
    fn status(&self) -> ActivityStatus {
        (**self).status()
    }
}

/// Shared check for required text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("required field '{}' is empty", field))
    } else {
        Ok(())
    }
}
