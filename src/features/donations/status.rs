use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::donations::models::Donation;

/// Lifecycle state of a donation, derived from `closed` and `reservedBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DonationStatus {
    Open,
    Reserved,
    Closed,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 3] = [
        DonationStatus::Open,
        DonationStatus::Reserved,
        DonationStatus::Closed,
    ];

    /// A closed donation stays closed whatever its reservation says.
    /// Any stored `reservedBy` string, even an empty one, counts as a reservation.
    pub fn derive(closed: bool, reserved_by: Option<&str>) -> Self {
        if closed {
            return DonationStatus::Closed;
        }
        match reserved_by {
            Some(_) => DonationStatus::Reserved,
            None => DonationStatus::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Open => "Open",
            DonationStatus::Reserved => "Reserved",
            DonationStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DonationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown donation status '{}'", s))
    }
}

pub fn derive_status(donation: &Donation) -> DonationStatus {
    donation.status()
}

/// Keep the donations in `status`, preserving their order
pub fn filter(donations: Vec<Donation>, status: DonationStatus) -> Vec<Donation> {
    donations
        .into_iter()
        .filter(|d| d.status() == status)
        .collect()
}

/// Filter by a tab label such as "open" or "Reserved"
///
/// An unrecognized label leaves the list untouched.
pub fn filter_by_tab(donations: Vec<Donation>, tab: &str) -> Vec<Donation> {
    match tab.parse::<DonationStatus>() {
        Ok(status) => filter(donations, status),
        Err(_) => donations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::donations::models::{MealType, QuantityType};

    fn donation(id: &str, reserved_by: Option<&str>, closed: bool) -> Donation {
        Donation {
            id: id.to_string(),
            donation_name: format!("Meal {}", id),
            description: None,
            meal_type: MealType::Veg,
            quantity: 1,
            quantity_type: QuantityType::Small,
            contact_number: "6471234567".to_string(),
            location: None,
            timestamp: 1700000000,
            reserved_by: reserved_by.map(str::to_string),
            closed,
        }
    }

    #[test]
    fn test_derive_truth_table() {
        assert_eq!(DonationStatus::derive(false, None), DonationStatus::Open);
        assert_eq!(
            DonationStatus::derive(false, Some("uid-1")),
            DonationStatus::Reserved
        );
        assert_eq!(DonationStatus::derive(true, None), DonationStatus::Closed);
        assert_eq!(
            DonationStatus::derive(true, Some("uid-1")),
            DonationStatus::Closed
        );
        assert_eq!(DonationStatus::derive(false, Some("")), DonationStatus::Reserved);
        assert_eq!(DonationStatus::derive(true, Some("")), DonationStatus::Closed);
    }

    #[test]
    fn test_derive_status_of_donation() {
        assert_eq!(
            derive_status(&donation("a", Some("uid-1"), false)),
            DonationStatus::Reserved
        );
    }

    #[test]
    fn test_filter_keeps_order() {
        let donations = vec![
            donation("a", None, false),
            donation("b", Some("uid-1"), false),
            donation("c", None, false),
            donation("d", None, true),
            donation("e", None, false),
        ];

        let open: Vec<String> = filter(donations.clone(), DonationStatus::Open)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(open, vec!["a", "c", "e"]);

        let closed = filter(donations, DonationStatus::Closed);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, "d");
    }

    #[test]
    fn test_filter_partitions_input() {
        let donations = vec![
            donation("a", None, false),
            donation("b", Some("uid-1"), false),
            donation("c", Some("uid-2"), true),
        ];

        let total: usize = DonationStatus::ALL
            .into_iter()
            .map(|status| filter(donations.clone(), status).len())
            .sum();
        assert_eq!(total, donations.len());
    }

    #[test]
    fn test_filter_by_tab() {
        let donations = vec![donation("a", None, false), donation("b", None, true)];

        assert_eq!(filter_by_tab(donations.clone(), "open").len(), 1);
        assert_eq!(filter_by_tab(donations.clone(), "CLOSED")[0].id, "b");
        assert!(filter_by_tab(donations.clone(), "Reserved").is_empty());
        assert_eq!(filter_by_tab(donations.clone(), "All"), donations);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("reserved".parse::<DonationStatus>(), Ok(DonationStatus::Reserved));
        assert_eq!(" Open ".parse::<DonationStatus>(), Ok(DonationStatus::Open));
        assert!("pending".parse::<DonationStatus>().is_err());
        assert_eq!(DonationStatus::Closed.to_string(), "Closed");
    }
}
