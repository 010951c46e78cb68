//! Service configuration loaded from environment variables.

use std::net::SocketAddr;

use rust_decimal::Decimal;
use thiserror::Error;

use warung_reports::DEFAULT_RECENT_ORDERS;
use warung_stock::DEFAULT_LOW_STOCK_MULTIPLIER;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `WARUNG_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `WARUNG_LOW_STOCK_MULTIPLIER`, must be at least 1.
    pub low_stock_multiplier: Decimal,
    /// `WARUNG_SEED_DEMO`: load the demo menu and stock on startup.
    pub seed_demo: bool,
    /// `WARUNG_RECENT_ORDERS`: orders shown on the dashboard.
    pub recent_orders: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            low_stock_multiplier: DEFAULT_LOW_STOCK_MULTIPLIER,
            seed_demo: false,
            recent_orders: DEFAULT_RECENT_ORDERS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to defaults; set but malformed ones
    /// are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get("WARUNG_BIND_ADDR") {
            Some(v) => v.trim().parse().map_err(|e: std::net::AddrParseError| {
                invalid("WARUNG_BIND_ADDR", &v, e.to_string())
            })?,
            None => defaults.bind_addr,
        };

        let low_stock_multiplier = match get("WARUNG_LOW_STOCK_MULTIPLIER") {
            Some(v) => {
                let m: Decimal = v.trim().parse().map_err(|e: rust_decimal::Error| {
                    invalid("WARUNG_LOW_STOCK_MULTIPLIER", &v, e.to_string())
                })?;
                if m < Decimal::ONE {
                    return Err(invalid("WARUNG_LOW_STOCK_MULTIPLIER", &v, "must be at least 1"));
                }
                m
            }
            None => defaults.low_stock_multiplier,
        };

        let seed_demo = match get("WARUNG_SEED_DEMO") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                invalid("WARUNG_SEED_DEMO", &v, "expected true/false, 1/0 or yes/no")
            })?,
            None => defaults.seed_demo,
        };

        let recent_orders = match get("WARUNG_RECENT_ORDERS") {
            Some(v) => v.trim().parse().map_err(|e: std::num::ParseIntError| {
                invalid("WARUNG_RECENT_ORDERS", &v, e.to_string())
            })?,
            None => defaults.recent_orders,
        };

        Ok(Self {
            bind_addr,
            low_stock_multiplier,
            seed_demo,
            recent_orders,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.low_stock_multiplier, Decimal::new(15, 1));
        assert_eq!(cfg.recent_orders, 5);
    }

    #[test]
    fn reads_overrides() {
        let cfg = from(&[
            ("WARUNG_BIND_ADDR", "127.0.0.1:9000"),
            ("WARUNG_LOW_STOCK_MULTIPLIER", "2"),
            ("WARUNG_SEED_DEMO", "yes"),
            ("WARUNG_RECENT_ORDERS", "10"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.low_stock_multiplier, Decimal::from(2));
        assert!(cfg.seed_demo);
        assert_eq!(cfg.recent_orders, 10);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(from(&[("WARUNG_BIND_ADDR", "localhost")]).is_err());
        assert!(from(&[("WARUNG_LOW_STOCK_MULTIPLIER", "0.5")]).is_err());
        assert!(from(&[("WARUNG_SEED_DEMO", "maybe")]).is_err());

        let err = from(&[("WARUNG_RECENT_ORDERS", "-1")]).unwrap_err();
        assert!(err.to_string().starts_with("WARUNG_RECENT_ORDERS"));
    }
}
