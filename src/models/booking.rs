//! Bookings and their status taxonomy.
//!
//! The backend is inconsistent about booking shape: the linked service,
//! provider, and customer sometimes arrive as nested objects and sometimes
//! as flattened `serviceTitle`/`providerName`-style fields. Both shapes are
//! accepted here, and the accessor methods pick whichever is populated.

use serde::{Deserialize, Serialize};

use crate::models::review::Review;

/// Booking lifecycle status.
///
/// The backend emits the three known states upper-cased, but the field is
/// free text; anything unrecognized is carried through as [`Other`].
///
/// [`Other`]: BookingStatus::Other
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn parse(raw: &str) -> BookingStatus {
        match raw.trim().to_uppercase().as_str() {
            "CONFIRMED" => BookingStatus::Confirmed,
            "COMPLETED" => BookingStatus::Completed,
            "CANCELLED" | "CANCELED" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(raw.trim().to_string()),
        }
    }

    /// Parse a user-supplied status filter. Accepts the backend's values as
    /// well as the French labels the booking screens display.
    pub fn from_filter(raw: &str) -> BookingStatus {
        match raw.trim().to_lowercase().as_str() {
            "confirmed" | "confirmé" | "confirme" => BookingStatus::Confirmed,
            "completed" | "terminé" | "termine" => BookingStatus::Completed,
            "cancelled" | "canceled" | "annulé" | "annule" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Other(raw) => raw,
        }
    }

    /// Display label, matching the labels customers see in the app.
    pub fn label(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "Confirmé",
            BookingStatus::Completed => "Terminé",
            BookingStatus::Cancelled => "Annulé",
            BookingStatus::Other(raw) => raw,
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Other(String::new())
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(BookingStatus::parse(&raw))
    }
}

/// Nested service reference inside a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Nested user reference (provider or customer) inside a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PartySummary {
    fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, alias = "bookingDate", alias = "scheduledDate")]
    pub date: Option<String>,
    #[serde(default, alias = "startTime")]
    pub time: Option<String>,
    #[serde(default, alias = "price")]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,

    // Nested shape.
    #[serde(default)]
    pub service: Option<ServiceSummary>,
    #[serde(default)]
    pub provider: Option<PartySummary>,
    #[serde(default)]
    pub customer: Option<PartySummary>,

    // Flattened shape.
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default, alias = "serviceName")]
    pub service_title: Option<String>,
    #[serde(default)]
    pub provider_id: Option<i64>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub review: Option<Review>,
}

impl Booking {
    /// Service title, preferring the nested object over the flattened field.
    pub fn service_label(&self) -> Option<String> {
        self.service
            .as_ref()
            .and_then(|s| s.title.clone())
            .or_else(|| self.service_title.clone())
    }

    pub fn provider_label(&self) -> Option<String> {
        self.provider
            .as_ref()
            .and_then(PartySummary::display_name)
            .or_else(|| self.provider_name.clone())
    }

    pub fn customer_label(&self) -> Option<String> {
        self.customer
            .as_ref()
            .and_then(PartySummary::display_name)
            .or_else(|| self.customer_name.clone())
    }
}

/// Filter a booking list the way the list screens do.
pub fn filter_by_status<'a>(bookings: &'a [Booking], status: &BookingStatus) -> Vec<&'a Booking> {
    bookings.iter().filter(|b| &b.status == status).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: i64,
    pub provider_id: i64,
    pub customer_id: i64,
    pub booking_date: String,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub booking_id: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPaymentConfirm {
    pub booking_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive_and_tolerant() {
        assert_eq!(BookingStatus::parse("confirmed"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::parse("CANCELLED"), BookingStatus::Cancelled);
        assert_eq!(
            BookingStatus::parse("awaiting payment"),
            BookingStatus::Other("awaiting payment".to_string())
        );
    }

    #[test]
    fn filter_accepts_french_labels() {
        assert_eq!(BookingStatus::from_filter("Confirmé"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::from_filter("Annulé"), BookingStatus::Cancelled);
        assert_eq!(BookingStatus::from_filter("terminé"), BookingStatus::Completed);
        assert_eq!(BookingStatus::from_filter("cancelled"), BookingStatus::Cancelled);
    }

    #[test]
    fn nested_shape_wins_over_flattened_fields() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":1,"status":"CONFIRMED",
                "service":{"id":10,"title":"Bridal makeup"},
                "serviceTitle":"stale flattened title",
                "provider":{"id":3,"firstName":"Lina","lastName":"K"}}"#,
        )
        .unwrap();
        assert_eq!(booking.service_label().as_deref(), Some("Bridal makeup"));
        assert_eq!(booking.provider_label().as_deref(), Some("Lina K"));
    }

    #[test]
    fn flattened_shape_is_read_when_nothing_is_nested() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":2,"status":"COMPLETED","serviceTitle":"Soirée glam",
                "providerName":"Lina K","customerName":"Amira B","totalPrice":80.0}"#,
        )
        .unwrap();
        assert_eq!(booking.service_label().as_deref(), Some("Soirée glam"));
        assert_eq!(booking.provider_label().as_deref(), Some("Lina K"));
        assert_eq!(booking.customer_label().as_deref(), Some("Amira B"));
        assert_eq!(booking.total_price, Some(80.0));
    }

    #[test]
    fn filter_by_status_keeps_only_matches() {
        let bookings: Vec<Booking> = serde_json::from_str(
            r#"[{"id":1,"status":"CONFIRMED"},
                {"id":2,"status":"CANCELLED"},
                {"id":3,"status":"CONFIRMED"}]"#,
        )
        .unwrap();

        let confirmed = filter_by_status(&bookings, &BookingStatus::from_filter("Confirmé"));
        assert_eq!(confirmed.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 3]);

        let completed = filter_by_status(&bookings, &BookingStatus::from_filter("Terminé"));
        assert!(completed.is_empty());
    }

    #[test]
    fn unknown_status_survives_round_trip() {
        let booking: Booking =
            serde_json::from_str(r#"{"id":9,"status":"EN ATTENTE"}"#).unwrap();
        assert_eq!(booking.status, BookingStatus::Other("EN ATTENTE".to_string()));
        assert_eq!(booking.status.label(), "EN ATTENTE");
    }
}
