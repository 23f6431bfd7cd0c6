//! Deployment secret generation
//!
//! Produces the secrets a fresh CMS deployment needs. Each value is the
//! base64 encoding of 64 bytes from the operating system's random source.

use data_encoding::BASE64;
use thiserror::Error;

/// Random bytes behind each generated key
pub const KEY_BYTES: usize = 64;

/// Number of keys joined into `APP_KEYS`
pub const APP_KEY_COUNT: usize = 4;

/// Secrets generated alongside `APP_KEYS`, in output order
pub const SECRET_NAMES: [&str; 5] = [
    "API_TOKEN_SALT",
    "ADMIN_JWT_SECRET",
    "TRANSFER_TOKEN_SALT",
    "JWT_SECRET",
    "STRAPI_ADMIN_CLIENT_PREVIEW_SECRET",
];

#[derive(Debug, Error)]
pub enum KeyGenError {
    #[error("Random source unavailable: {0}")]
    Random(getrandom::Error),
}

/// One base64 encoded key
pub fn generate_key() -> Result<String, KeyGenError> {
    let mut bytes = [0u8; KEY_BYTES];
    getrandom::fill(&mut bytes).map_err(KeyGenError::Random)?;
    Ok(BASE64.encode(&bytes))
}

/// All deployment secrets as `(name, value)` pairs, `APP_KEYS` first
pub fn generate_deployment_keys() -> Result<Vec<(&'static str, String)>, KeyGenError> {
    let app_keys = (0..APP_KEY_COUNT)
        .map(|_| generate_key())
        .collect::<Result<Vec<_>, _>>()?
        .join(",");

    let mut keys = vec![("APP_KEYS", app_keys)];
    for name in SECRET_NAMES {
        keys.push((name, generate_key()?));
    }
    Ok(keys)
}

/// `NAME=value` lines, one per secret
pub fn format_env(keys: &[(&str, String)]) -> String {
    keys.iter()
        .map(|(name, value)| format!("{}={}\n", name, value))
        .collect()
}
