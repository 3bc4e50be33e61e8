mod context;
mod error;
mod request;
mod verifier;

pub use context::AuthContext;
pub use error::AuthError;
pub use request::{authenticate, current_user, init_data_header, Rejection, INIT_DATA_HEADER};
pub use verifier::{data_check_string, derive_secret, parse_fields, sign, verify, InitDataVerifier, SecretKey};
