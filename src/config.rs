use std::env;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 10_000.0;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub nearest_max_distance_meters: f64,
    pub notification_queue_size: usize,
    pub auth_token: Option<String>,
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub account: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let nearest_max_distance_meters: f64 = parse_or_default(
            &lookup,
            "NEAREST_MAX_DISTANCE_METERS",
            DEFAULT_MAX_DISTANCE_METERS,
        )?;
        if !nearest_max_distance_meters.is_finite() || nearest_max_distance_meters <= 0.0 {
            return Err(AppError::Internal(
                "invalid NEAREST_MAX_DISTANCE_METERS: must be a positive number".to_string(),
            ));
        }

        let require_auth: bool = parse_or_default(&lookup, "REQUIRE_AUTH", false)?;
        let auth_token = if require_auth {
            match lookup("AUTH_TOKEN").filter(|token| !token.is_empty()) {
                Some(token) => Some(token),
                None => {
                    return Err(AppError::Internal(
                        "AUTH_TOKEN must be set when REQUIRE_AUTH is enabled".to_string(),
                    ));
                }
            }
        } else {
            None
        };

        let mail = match (lookup("MAIL_ID"), lookup("MAIL_PASSWORD")) {
            (Some(account), Some(password)) => Some(MailConfig {
                account,
                password,
                smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                smtp_port: parse_or_default(&lookup, "SMTP_PORT", 587)?,
            }),
            _ => None,
        };

        Ok(Self {
            http_port: parse_or_default(&lookup, "HTTP_PORT", 3000)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or_default(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            nearest_max_distance_meters,
            notification_queue_size: parse_or_default(&lookup, "NOTIFICATION_QUEUE_SIZE", 1024)?,
            auth_token,
            mail,
        })
    }

    pub fn mail_from(&self) -> String {
        self.mail
            .as_ref()
            .map(|mail| mail.account.clone())
            .unwrap_or_else(|| "noreply@localhost".to_string())
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        None => Ok(default),
    }
}
