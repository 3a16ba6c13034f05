//! Booking domain entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::VehicleType;
use crate::domain::{DomainError, DomainResult};

/// Payment method chosen by the customer at booking time.
///
/// Payment processing itself is out of scope; the method is recorded
/// for display and reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Qr,
    Netbanking,
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Qr => "qr",
            Self::Netbanking => "netbanking",
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upi" => Some(Self::Upi),
            "qr" => Some(Self::Qr),
            "netbanking" => Some(Self::Netbanking),
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking lifecycle status.
///
/// Transitions move forward only: `upcoming -> active -> completed`, with
/// cancellation allowed from either non-terminal state. Terminal bookings
/// (`completed` / `cancelled`) are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number of billable hours for a time range, rounded up to whole hours.
/// Counted in seconds so any part of a started hour bills the full hour.
pub fn billed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let secs = (end - start).num_seconds();
    (secs + 3599) / 3600
}

/// A reservation of one slot for one time interval by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking ID
    pub id: String,
    /// Booking user
    pub user_id: String,
    /// Parking space
    pub parking_id: String,
    /// Reserved slot
    pub slot_id: String,
    /// Vehicle the booking was made for
    pub vehicle_id: String,
    /// Registration number, denormalized for display
    pub vehicle_number: String,
    /// Vehicle type at booking time
    pub vehicle_type: VehicleType,
    /// Start of the reserved interval
    pub start_time: DateTime<Utc>,
    /// End of the reserved interval
    pub end_time: DateTime<Utc>,
    /// Billable duration in whole hours
    pub duration_hours: i64,
    /// Total price, frozen at creation (duration x slot price per hour)
    pub total_price: f64,
    /// Payment method chosen at creation
    pub payment_method: PaymentMethod,
    /// Lifecycle status
    pub status: BookingStatus,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Create an `upcoming` booking, computing duration and the frozen
    /// total price from the slot's price per hour.
    ///
    /// Fails with `InvalidTimeRange` unless `start_time < end_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        parking_id: impl Into<String>,
        slot_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        vehicle_number: impl Into<String>,
        vehicle_type: VehicleType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        price_per_hour: f64,
        payment_method: PaymentMethod,
    ) -> DomainResult<Self> {
        if end_time <= start_time {
            return Err(DomainError::InvalidTimeRange);
        }
        let duration_hours = billed_hours(start_time, end_time);
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            parking_id: parking_id.into(),
            slot_id: slot_id.into(),
            vehicle_id: vehicle_id.into(),
            vehicle_number: vehicle_number.into(),
            vehicle_type,
            start_time,
            end_time,
            duration_hours,
            total_price: duration_hours as f64 * price_per_hour,
            payment_method,
            status: BookingStatus::Upcoming,
            created_at: Utc::now(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the reserved interval has elapsed at `now`.
    pub fn is_elapsed(&self, now: DateTime<Utc>) -> bool {
        !self.is_terminal() && self.end_time <= now
    }

    fn guard_non_terminal(&self) -> DomainResult<()> {
        if self.is_terminal() {
            return Err(DomainError::AlreadyTerminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    /// Transition to `cancelled`. Allowed from `upcoming` and `active`.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.guard_non_terminal()?;
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// Transition to `completed`. Allowed from `upcoming` and `active`.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.guard_non_terminal()?;
        self.status = BookingStatus::Completed;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking(start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking::new(
            "booking-1",
            "user-1",
            "parking-1",
            "slot-1",
            "vehicle-1",
            "KA-01-1234",
            VehicleType::Car,
            start,
            end,
            10.0,
            PaymentMethod::Card,
        )
        .unwrap()
    }

    #[test]
    fn two_hour_booking_at_ten_per_hour_costs_twenty() {
        let start = Utc::now();
        let b = sample_booking(start, start + Duration::hours(2));
        assert_eq!(b.duration_hours, 2);
        assert_eq!(b.total_price, 20.0);
        assert_eq!(b.status, BookingStatus::Upcoming);
    }

    #[test]
    fn partial_hours_are_billed_as_whole_hours() {
        let start = Utc::now();
        assert_eq!(billed_hours(start, start + Duration::minutes(61)), 2);
        assert_eq!(billed_hours(start, start + Duration::minutes(60)), 1);
        assert_eq!(billed_hours(start, start + Duration::minutes(1)), 1);
    }

    #[test]
    fn seconds_past_the_hour_bill_the_next_hour() {
        let start = Utc::now();
        assert_eq!(
            billed_hours(start, start + Duration::hours(1) + Duration::seconds(30)),
            2
        );
        assert_eq!(billed_hours(start, start + Duration::seconds(30)), 1);
        assert_eq!(billed_hours(start, start + Duration::seconds(3600)), 1);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let start = Utc::now();
        let err = Booking::new(
            "booking-1",
            "user-1",
            "parking-1",
            "slot-1",
            "vehicle-1",
            "KA-01-1234",
            VehicleType::Car,
            start,
            start - Duration::hours(1),
            10.0,
            PaymentMethod::Cash,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeRange));
    }

    #[test]
    fn zero_length_range_is_rejected() {
        let start = Utc::now();
        let err = Booking::new(
            "booking-1",
            "user-1",
            "parking-1",
            "slot-1",
            "vehicle-1",
            "KA-01-1234",
            VehicleType::Car,
            start,
            start,
            10.0,
            PaymentMethod::Cash,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeRange));
    }

    #[test]
    fn cancel_from_upcoming() {
        let start = Utc::now();
        let mut b = sample_booking(start, start + Duration::hours(1));
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn complete_from_active() {
        let start = Utc::now();
        let mut b = sample_booking(start, start + Duration::hours(1));
        b.status = BookingStatus::Active;
        b.complete().unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn terminal_states_reject_transitions() {
        let start = Utc::now();
        let mut b = sample_booking(start, start + Duration::hours(1));
        b.complete().unwrap();

        let err = b.cancel().unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyTerminal {
                status: BookingStatus::Completed,
                ..
            }
        ));
        let err = b.complete().unwrap_err();
        assert!(matches!(err, DomainError::AlreadyTerminal { .. }));
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn price_is_frozen_at_creation() {
        let start = Utc::now();
        let b = sample_booking(start, start + Duration::hours(3));
        // the slot's price may change later; the booking keeps its own
        assert_eq!(b.total_price, 30.0);
    }

    #[test]
    fn elapsed_only_after_end_time_and_while_non_terminal() {
        let start = Utc::now() - Duration::hours(3);
        let mut b = sample_booking(start, start + Duration::hours(2));
        assert!(b.is_elapsed(Utc::now()));
        assert!(!b.is_elapsed(start + Duration::hours(1)));
        b.complete().unwrap();
        assert!(!b.is_elapsed(Utc::now()));
    }
}
