//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

use salonbook_auth::{AdminAllowList, PublicSurface};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR '{0}' is not a socket address")]
    InvalidBindAddr(String),

    #[error("{name} must be a boolean, got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// `PLATFORM_ADMINS`: comma-separated admin emails.
    pub admins: AdminAllowList,
    pub surface: PublicSurface,
}

fn parse_flag(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let admins = AdminAllowList::from_csv(&lookup("PLATFORM_ADMINS").unwrap_or_default());
        if admins.is_empty() {
            tracing::info!("PLATFORM_ADMINS not set; no platform administrators");
        }

        let defaults = PublicSurface::default();
        let surface = PublicSurface {
            salon_reads: parse_flag("PUBLIC_SALON_READS", lookup("PUBLIC_SALON_READS"), defaults.salon_reads)?,
            salon_listing: parse_flag("PUBLIC_SALON_LISTING", lookup("PUBLIC_SALON_LISTING"), defaults.salon_listing)?,
            catalog_reads: parse_flag("PUBLIC_CATALOG_READS", lookup("PUBLIC_CATALOG_READS"), defaults.catalog_reads)?,
            catalog_listing: parse_flag(
                "PUBLIC_CATALOG_LISTING",
                lookup("PUBLIC_CATALOG_LISTING"),
                defaults.catalog_listing,
            )?,
            session_listing: parse_flag(
                "PUBLIC_SESSION_LISTING",
                lookup("PUBLIC_SESSION_LISTING"),
                defaults.session_listing,
            )?,
            authenticated_booking_reads: parse_flag(
                "AUTHENTICATED_BOOKING_READS",
                lookup("AUTHENTICATED_BOOKING_READS"),
                defaults.authenticated_booking_reads,
            )?,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            admins,
            surface,
        })
    }
}
