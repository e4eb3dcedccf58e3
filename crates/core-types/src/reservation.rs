use crate::error::ModelError;
use chrono::NaiveDate;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A booking of a whole day on behalf of a client.
///
/// The `date` is the natural key: at most one reservation exists per day.
#[derive(Debug, Clone)]
pub struct Reservation {
    id: Option<Uuid>,
    client_id: Uuid,
    date: NaiveDate,
}

impl Reservation {
    pub fn new(client_id: Uuid, date: NaiveDate) -> Self {
        Self {
            id: None,
            client_id,
            date,
        }
    }

    /// Returns the same reservation carrying a backend-assigned identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// A copy of this reservation moved to another day, keeping its identifier.
    pub fn rescheduled(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The identifier, or `ModelError::MissingId` for a reservation never persisted.
    pub fn require_id(&self) -> Result<Uuid, ModelError> {
        self.id.ok_or_else(|| ModelError::MissingId(self.to_string()))
    }

    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.client_id == other.client_id && self.date == other.date
    }
}

impl Eq for Reservation {}

impl Hash for Reservation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.client_id.hash(state);
        self.date.hash(state);
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reservation [on {}]", self.date.format("%Y-%m-%d"))
    }
}

/// Parses an operator-supplied `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ModelError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(trimmed.to_string()))
}
