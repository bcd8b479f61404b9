use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldParseError;

/// Identifier that may arrive as either a JSON string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                StringOrNumber::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

id_newtype!(EventId);
id_newtype!(AttendeeId);

/// Ticket price exactly as transmitted: the API sends either a number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketPrice {
    Amount(f64),
    Text(String),
}

impl TicketPrice {
    pub fn amount(&self) -> Result<f64, FieldParseError> {
        match self {
            Self::Amount(value) if value.is_finite() => Ok(*value),
            Self::Amount(value) => Err(FieldParseError::Price(value.to_string())),
            Self::Text(raw) => parse_price_text(raw),
        }
    }
}

impl From<f64> for TicketPrice {
    fn from(value: f64) -> Self {
        Self::Amount(value)
    }
}

fn parse_price_text(raw: &str) -> Result<f64, FieldParseError> {
    // Tolerate a leading currency symbol such as "$" or "₹".
    let trimmed = raw
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'));
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FieldParseError::Price(raw.to_string()))
}

/// Parses the date formats the API and the add-event form produce: RFC 3339,
/// a naive date-time, or a plain date (taken as UTC midnight).
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, FieldParseError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| FieldParseError::Date(raw.to_string()))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(StringOrNumber::Integer(value)) => u64::try_from(value).unwrap_or(0),
        Some(StringOrNumber::Float(value)) if value.is_finite() && value >= 0.0 => value as u64,
        Some(StringOrNumber::Text(value)) => value.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "eventName", alias = "name", default)]
    pub name: String,
    #[serde(rename = "eventDate", alias = "date", default)]
    pub date: String,
    #[serde(
        rename = "eventVenue",
        alias = "venue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<TicketPrice>,
    #[serde(alias = "ticketSales", default, deserialize_with = "lenient_count")]
    pub tickets_sold: u64,
    #[serde(rename = "eventIcon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Event {
    pub fn starts_at(&self) -> Result<DateTime<Utc>, FieldParseError> {
        parse_event_date(&self.date)
    }

    pub fn price(&self) -> Result<f64, FieldParseError> {
        match &self.ticket_price {
            Some(price) => price.amount(),
            None => Err(FieldParseError::Price(String::new())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: AttendeeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
}
