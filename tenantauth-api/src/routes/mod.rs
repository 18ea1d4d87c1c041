/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Login
/// - `users`: Signup

pub mod auth;
pub mod health;
pub mod users;
