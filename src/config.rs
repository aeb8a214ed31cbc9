//! Environment configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `MONGODB_URI` | `mongodb://localhost:27017/items` |
//! | `ITEMS_COLLECTION` | `items` |
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the environment win.

use std::net::{IpAddr, SocketAddr};

use crate::error::Error;
use crate::store::DEFAULT_COLLECTION;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/items";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub mongodb_uri: String,
    pub collection: String,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let host: IpAddr = match lookup("HOST") {
            Some(host) => host
                .parse()
                .map_err(|_| Error::Config(format!("invalid HOST `{host}`")))?,
            None => DEFAULT_HOST.parse().map_err(|_| Error::Config("invalid default host".into()))?,
        };
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT `{port}`")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_owned()),
            collection: lookup("ITEMS_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.mongodb_uri, DEFAULT_MONGODB_URI);
        assert_eq!(cfg.collection, "items");
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MONGODB_URI", "mongodb://admin:secret@db:27017/shop?authSource=admin"),
            ("ITEMS_COLLECTION", "products"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.mongodb_uri, "mongodb://admin:secret@db:27017/shop?authSource=admin");
        assert_eq!(cfg.collection, "products");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(matches!(config(&[("PORT", "eighty")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("PORT", "70000")]), Err(Error::Config(_))));
    }
}
