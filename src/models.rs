use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::UnknownId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Stored rows may carry an empty or unknown status; those read as pending.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(BookingStatus::Pending)
    }

    pub fn allowed_transitions(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Completed],
            BookingStatus::Completed | BookingStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Button text for the admin action that moves a booking into this
    /// status. Nothing moves a booking back to pending.
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            BookingStatus::Pending => None,
            BookingStatus::Confirmed => Some("Confirm Booking"),
            BookingStatus::Completed => Some("Mark as Completed"),
            BookingStatus::Cancelled => Some("Cancel Booking"),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value.trim())
            .ok_or_else(|| UnknownId {
                kind: "status",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// A validated booking ready to hand to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: String,
    pub property_type: String,
    pub size: String,
    /// Square feet; set only for services priced by area.
    pub area: Option<Decimal>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub frequency: String,
    pub staff_count: u32,
    pub contact: ContactDetails,
    pub special_instructions: Option<String>,
    pub estimated_price: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: String,
    pub service: String,
    pub property_type: String,
    pub property_size: String,
    pub area: Option<String>,
    pub date: String,
    pub time: String,
    pub frequency: String,
    pub staff_count: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub special_instructions: Option<String>,
    pub estimated_price: Option<i64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub status: BookingStatus,
    pub created_at: String,
    #[serde(flatten)]
    pub request: BookingRequest,
}

impl From<BookingRow> for BookingRecord {
    fn from(row: BookingRow) -> Self {
        Self {
            status: BookingStatus::from_stored(&row.status),
            id: row.id,
            created_at: row.created_at,
            request: BookingRequest {
                service_id: row.service,
                property_type: row.property_type,
                size: row.property_size,
                area: row.area.and_then(|area| area.parse().ok()),
                date: row.date,
                time: row.time,
                frequency: row.frequency,
                staff_count: u32::try_from(row.staff_count).unwrap_or(1).max(1),
                contact: ContactDetails {
                    name: row.name,
                    email: row.email,
                    phone: row.phone,
                    address: row.address,
                    city: row.city,
                    postal_code: row.postal_code,
                },
                special_instructions: row.special_instructions,
                estimated_price: row.estimated_price,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_confirmed_or_cancelled() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn confirmed_only_completes() {
        assert_eq!(
            BookingStatus::Confirmed.allowed_transitions(),
            &[BookingStatus::Completed]
        );
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in BookingStatus::ALL {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn every_allowed_transition_has_an_action() {
        for status in BookingStatus::ALL {
            for next in status.allowed_transitions() {
                assert!(next.action_label().is_some(), "{status} -> {next}");
            }
        }
        assert_eq!(BookingStatus::Pending.action_label(), None);
    }

    #[test]
    fn unknown_stored_status_reads_as_pending() {
        assert_eq!(BookingStatus::from_stored(""), BookingStatus::Pending);
        assert_eq!(BookingStatus::from_stored("archived"), BookingStatus::Pending);
        assert_eq!(BookingStatus::from_stored("cancelled"), BookingStatus::Cancelled);
        assert!("archived".parse::<BookingStatus>().is_err());
    }
}
