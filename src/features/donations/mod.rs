//! Food donations.
//!
//! Donors submit surplus meals, recipients reserve them, and donors close them
//! once picked up. The status shown in each list tab is derived from the
//! stored `closed` flag and `reservedBy` field, never stored itself.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/donations` | Yes | Submit a donation |
//! | GET | `/api/donations?status=` | Yes | List donations, optionally by status tab |
//! | GET | `/api/donations/{id}` | Yes | Donation details |
//! | PATCH | `/api/donations/{id}` | Yes | Partial edit |
//! | DELETE | `/api/donations/{id}` | Yes | Delete (idempotent) |
//! | POST | `/api/donations/{id}/reserve` | Yes | Reserve for the caller |
//! | POST | `/api/donations/{id}/close` | Yes | Mark as picked up |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod status;

pub use services::DonationService;
