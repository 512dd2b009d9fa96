use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle state for filtering and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
    Cancelled,
    Unknown,
}

impl BookingStatus {
    /// Parse a status string into a BookingStatus enum value.
    pub fn from_str(s: Option<&str>) -> Self {
        match s {
            Some(status) => {
                let lower = status.to_lowercase();
                if lower.contains("pend") {
                    BookingStatus::Pending
                } else if lower.contains("accept") || lower.contains("confirm") {
                    BookingStatus::Accepted
                } else if lower.contains("decline") || lower.contains("reject") {
                    BookingStatus::Declined
                } else if lower.contains("complete") || lower.contains("done") {
                    BookingStatus::Completed
                } else if lower.contains("cancel") {
                    BookingStatus::Cancelled
                } else {
                    BookingStatus::Unknown
                }
            }
            None => BookingStatus::Unknown,
        }
    }

    /// Value the backend expects in status-update requests.
    pub fn wire_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Unknown => "unknown",
        }
    }

    /// Get the display name for this status.
    pub fn display_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Accepted => "Accepted",
            BookingStatus::Declined => "Declined",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Unknown => "Unknown",
        }
    }

    /// True while the booking still needs action from either side.
    pub fn is_open(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub post_id: i64,
    pub owner_id: i64,
    pub sitter_id: i64,
    /// Raw status string from the backend; use `status()` for matching
    #[serde(default)]
    pub status: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::from_str(self.status.as_deref())
    }

    /// Number of nights covered, never negative.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }

    /// Date range for list views: "Mar 03 - Mar 07"
    pub fn date_range_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%b %d"),
            self.end_date.format("%b %d")
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub post_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_from_str_variations() {
        assert_eq!(
            BookingStatus::from_str(Some("pending")),
            BookingStatus::Pending
        );
        assert_eq!(
            BookingStatus::from_str(Some("CONFIRMED")),
            BookingStatus::Accepted
        );
        assert_eq!(
            BookingStatus::from_str(Some("rejected")),
            BookingStatus::Declined
        );
        assert_eq!(BookingStatus::from_str(Some("odd")), BookingStatus::Unknown);
        assert_eq!(BookingStatus::from_str(None), BookingStatus::Unknown);
    }

    #[test]
    fn test_nights_counts_days_between() {
        let booking = Booking {
            id: 1,
            post_id: 2,
            owner_id: 3,
            sitter_id: 4,
            status: Some("pending".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            note: None,
            created_at: Utc::now(),
        };
        assert_eq!(booking.nights(), 4);
        assert_eq!(booking.date_range_display(), "Mar 03 - Mar 07");
        assert!(booking.status().is_open());
    }
}
