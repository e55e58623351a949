//! Accounts and sessions.
//!
//! Credentials are checked by the identity provider; this service only relays
//! sign-up, sign-in and password reset, and verifies bearer ID tokens on
//! protected routes. Signing out is the client discarding its token.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/auth/register` | No | Create account and profile |
//! | POST | `/api/auth/login` | No | Sign in with email and password |
//! | POST | `/api/auth/password-reset` | No | Send a password reset email |
//! | GET | `/api/auth/me` | Yes | Current account |

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::AuthService;
