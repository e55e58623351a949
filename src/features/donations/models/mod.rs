mod donation;

pub use donation::{Donation, DonationRecord, Location, MealType, QuantityType, RecordError};
