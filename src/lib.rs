pub mod auth;
pub mod bots;
pub mod config;
pub mod impls;
pub mod persistent;

pub use auth::{verify, AuthContext, AuthError, InitDataVerifier};
