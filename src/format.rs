//! One-line rendering of a located address.
//!
//! Each source supplies a different set of fields, so each has its own layout.

use crate::{
    models::{Location, Source},
    providers::Provider,
};

/// Renders the result line for `address`.
pub fn render(source: Source, location: &Location, address: &str) -> String {
    if is_unknown(source, location) {
        return unknown(address);
    }

    match source {
        Source::Remote(Provider::IpApi) => {
            let mut line = with_codes(location, address);
            if !location.org.is_empty() {
                line.push_str(" - ");
                line.push_str(&location.org);
            }
            line
        }
        Source::Remote(Provider::FreeGeoIp) => with_codes(location, address),
        Source::Remote(Provider::IpInfo) => {
            let mut line = format!("{} - {}", address, location.country);
            if !location.city.trim().is_empty() {
                line.push_str(&format!(", {}, {}", location.region, location.city));
            } else if !location.region.trim().is_empty() {
                line.push_str(&format!(", {}", location.region));
            }
            line
        }
        Source::Remote(Provider::Coding) => format!(
            "{} - {} ({}), {}, {}",
            address, location.country, location.country_code, location.region, location.city
        ),
        Source::Local => {
            let mut line = format!(
                "{} - {} ({})",
                address, location.country, location.country_code
            );
            if !location.region.is_empty() {
                line.push_str(&format!(", {}, {}", location.region, location.city));
            } else if !location.city.is_empty() {
                line.push_str(&format!(", {}", location.city));
            }
            line
        }
    }
}

/// Line printed when no country is known for `address`.
pub fn unknown(address: &str) -> String {
    format!("{} - Unknown (Maybe reserved range?)", address)
}

fn is_unknown(source: Source, location: &Location) -> bool {
    let country = location.country.trim();
    // coding.tools answers "-" for addresses it cannot place
    country.is_empty() || (source == Source::Remote(Provider::Coding) && country == "-")
}

/// Country and region with their codes, as ip-api.com and freegeoip.app report them.
fn with_codes(location: &Location, address: &str) -> String {
    let mut line = format!(
        "{} - {} ({})",
        address, location.country, location.country_code
    );
    if !location.city.trim().is_empty() {
        line.push_str(&format!(
            ", {} ({}), {}",
            location.region, location.region_code, location.city
        ));
    } else if !location.region.trim().is_empty() {
        line.push_str(&format!(
            ", {} ({})",
            location.region, location.region_code
        ));
    }
    line
}
