use chrono::NaiveDate;
use core_types::{Client, RepositoryError, Reservation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReservationDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub client_id: String,
    /// ISO-8601 calendar date, so the unique index compares whole days.
    pub date: String,
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_id(raw: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(raw).map_err(RepositoryError::backend)
}

impl ClientDocument {
    pub fn new(id: Uuid, client: &Client) -> Self {
        Self {
            id: id.to_string(),
            first_name: client.first_name().to_string(),
            last_name: client.last_name().to_string(),
        }
    }
}

impl TryFrom<ClientDocument> for Client {
    type Error = RepositoryError;

    fn try_from(document: ClientDocument) -> Result<Self, Self::Error> {
        let id = parse_id(&document.id)?;
        Client::new(&document.first_name, &document.last_name)
            .map(|client| client.with_id(id))
            .map_err(RepositoryError::backend)
    }
}

impl ReservationDocument {
    pub fn new(id: Uuid, reservation: &Reservation) -> Self {
        Self {
            id: id.to_string(),
            client_id: reservation.client_id().to_string(),
            date: format_date(reservation.date()),
        }
    }
}

impl TryFrom<ReservationDocument> for Reservation {
    type Error = RepositoryError;

    fn try_from(document: ReservationDocument) -> Result<Self, Self::Error> {
        let id = parse_id(&document.id)?;
        let client_id = parse_id(&document.client_id)?;
        let date = NaiveDate::parse_from_str(&document.date, DATE_FORMAT)
            .map_err(RepositoryError::backend)?;
        Ok(Reservation::new(client_id, date).with_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_documents_use_camel_case_fields() {
        let id = Uuid::new_v4();
        let client = Client::new("Mario", "Rossi").unwrap();

        let document = mongodb::bson::to_document(&ClientDocument::new(id, &client)).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), id.to_string());
        assert_eq!(document.get_str("firstName").unwrap(), "Mario");
        assert_eq!(document.get_str("lastName").unwrap(), "Rossi");
    }

    #[test]
    fn reservation_documents_store_the_date_as_a_day() {
        let id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let reservation = Reservation::new(client_id, date);

        let document = ReservationDocument::new(id, &reservation);
        assert_eq!(document.date, "2024-03-09");

        let restored = Reservation::try_from(document).unwrap();
        assert_eq!(restored.id(), Some(id));
        assert_eq!(restored.client_id(), client_id);
        assert_eq!(restored.date(), date);
    }

    #[test]
    fn malformed_identifiers_are_backend_errors() {
        let document = ClientDocument {
            id: "not-a-uuid".to_string(),
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
        };

        assert!(matches!(
            Client::try_from(document),
            Err(RepositoryError::Backend(_))
        ));
    }
}
