//! User profiles.
//!
//! Each account has one profile document at `/users/{uid}`, created on
//! registration and edited by its owner.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/me/profile` | Get the caller's profile |
//! | PATCH | `/api/me/profile` | Update username, phone number, image or gender |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserProfileService;
