mod donation_service;

pub use donation_service::DonationService;
