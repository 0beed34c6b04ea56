use std::env;

use crate::error::DeliveryError;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub subject_to_vat: bool,
    pub tax_jurisdiction: String,
    pub event_buffer_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, DeliveryError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            subject_to_vat: parse_or_default("SUBJECT_TO_VAT", false)?,
            tax_jurisdiction: env::var("TAX_JURISDICTION").unwrap_or_else(|_| "fr".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, DeliveryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| DeliveryError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
