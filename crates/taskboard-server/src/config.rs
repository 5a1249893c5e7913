use std::env;

use anyhow::Context;
use chrono::FixedOffset;

use crate::service::CascadeScope;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub store_utc_offset: FixedOffset,
    pub cascade_scope: CascadeScope,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a port number")?,
            store_utc_offset: parse_utc_offset(
                &env::var("STORE_UTC_OFFSET").unwrap_or_else(|_| "+00:00".to_string()),
            )?,
            cascade_scope: env::var("COMMENT_CASCADE_SCOPE")
                .unwrap_or_else(|_| "first".to_string())
                .parse()?,
        })
    }
}

/// Accepts `+HH:MM`, `-HHMM` and `Z`.
pub fn parse_utc_offset(value: &str) -> anyhow::Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") {
        return Ok(FixedOffset::east_opt(0).context("zero offset")?);
    }

    let (sign, digits) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        anyhow::bail!("STORE_UTC_OFFSET must start with + or -: {value}");
    };
    let digits = digits.replace(':', "");
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("STORE_UTC_OFFSET must look like +HH:MM: {value}");
    }

    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("STORE_UTC_OFFSET out of range: {value}"))
}
