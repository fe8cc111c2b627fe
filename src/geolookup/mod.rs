use std::{
    net::{IpAddr, Ipv4Addr},
    path::Path,
};

use async_trait::async_trait;
use maxminddb::{geoip2::City, Reader};

use crate::{
    error::Result,
    models::{Location, Source},
    runner::Locator,
};

/// Offline city-level database in MaxMind format (e.g. db-ip.com "IP to City Lite").
pub struct GeoLookup {
    reader: Reader<Vec<u8>>, // Reader for the mmdb file, loaded once.
}

impl GeoLookup {
    /// Opens the database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path`: Location of the `.mmdb` file.
    ///
    /// # Returns
    ///
    /// A result containing the initialized `GeoLookup` instance.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match Reader::open_readfile(path) {
            Ok(reader) => {
                #[cfg(feature = "log")]
                log::debug!(
                    "Opened {} ({} build {})",
                    path.display(),
                    reader.metadata.database_type,
                    reader.metadata.build_epoch
                );
                Ok(Self { reader })
            }
            Err(e) => anyhow::bail!("Failed to open database {}: {}", path.display(), e),
        }
    }

    /// Looks up geographical data for a given IPv4 address.
    ///
    /// Addresses missing from the database give an empty `Location`.
    pub fn lookup(&self, ip: &Ipv4Addr) -> Location {
        let mut location = Location::default();
        match self.reader.lookup::<City>(IpAddr::V4(*ip)) {
            Ok(lookup) => {
                self.extract_country_data(&lookup, &mut location);
                self.extract_region_data(&lookup, &mut location);
                self.extract_city_data(&lookup, &mut location);
            }
            Err(_e) => {
                #[cfg(feature = "log")]
                log::debug!("{}: {}", ip, _e);
            }
        }
        location
    }

    fn extract_country_data(&self, lookup: &City, location: &mut Location) {
        if let Some(country) = &lookup.country {
            location.country_code = country.iso_code.unwrap_or_default().to_string();
            if let Some(names) = &country.names {
                location.country = english(names);
            }
        }
    }

    /// Only the first, least specific subdivision is kept.
    fn extract_region_data(&self, lookup: &City, location: &mut Location) {
        if let Some(division) = lookup.subdivisions.as_ref().and_then(|s| s.first()) {
            location.region_code = division.iso_code.unwrap_or_default().to_string();
            if let Some(names) = &division.names {
                location.region = english(names);
            }
        }
    }

    fn extract_city_data(&self, lookup: &City, location: &mut Location) {
        if let Some(names) = lookup.city.as_ref().and_then(|city| city.names.as_ref()) {
            location.city = english(names);
        }
    }
}

fn english(names: &std::collections::BTreeMap<&str, &str>) -> String {
    names.get("en").map(ToString::to_string).unwrap_or_default()
}

#[async_trait]
impl Locator for GeoLookup {
    fn source(&self) -> Source {
        Source::Local
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn locate(&self, ip: Ipv4Addr) -> Result<Location> {
        Ok(self.lookup(&ip))
    }
}
