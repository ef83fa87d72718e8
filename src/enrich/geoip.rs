//! GeoIP lookup capability using MaxMind GeoLite2/GeoIP2 MMDB
//!
//! Thread-safe, memory-mapped country lookups. The capability is behind a
//! small trait so the enrichment pipeline can be tested with a
//! deterministic fake.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::sync::Arc;

/// Resolves a client IP to a country name.
pub trait GeoLookup: Send + Sync {
    /// English country name for the IP, `None` when the database has no
    /// answer for it.
    fn country(&self, ip: IpAddr) -> Result<Option<String>>;
}

/// [`GeoLookup`] backed by a memory-mapped MaxMind country database.
pub struct GeoIpService {
    reader: Option<Arc<Reader<Mmap>>>,
}

impl GeoIpService {
    /// Open the MMDB at `path`. With `None` every lookup answers `None`
    /// and country classification degrades to `Unknown`.
    pub fn new(path: Option<&str>) -> Result<Self> {
        let reader = match path {
            Some(path) => {
                let reader = unsafe { Reader::open_mmap(path) }
                    .with_context(|| format!("Failed to open GeoIP database at {}", path))?;
                Some(Arc::new(reader))
            }
            None => None,
        };

        Ok(Self { reader })
    }
}

impl GeoLookup for GeoIpService {
    fn country(&self, ip: IpAddr) -> Result<Option<String>> {
        let Some(ref reader) = self.reader else {
            return Ok(None);
        };

        let result = reader
            .lookup(ip)
            .with_context(|| format!("GeoIP lookup failed for {}", ip))?;

        let Some(country) = result
            .decode::<geoip2::Country>()
            .context("GeoIP record did not decode as a country")?
        else {
            return Ok(None);
        };

        Ok(country.country.names.english.map(|s| s.to_string()))
    }
}

// Implement Clone by cloning the Arc
impl Clone for GeoIpService {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: lookups against a real MMDB are covered by the integration
    // tests when a database is available.

    #[test]
    fn test_geoip_service_creation_invalid_path() {
        let result = GeoIpService::new(Some("/nonexistent/path.mmdb"));
        assert!(result.is_err());
    }

    #[test]
    fn test_geoip_service_creation_no_database() {
        let service = GeoIpService::new(None).unwrap();
        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(service.country(ip).unwrap(), None);
    }
}
