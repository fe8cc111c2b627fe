use std::{fmt::Display, net::Ipv4Addr};

use crate::providers::Provider;

/// Normalized geographical data for one address.
///
/// Fields a provider does not supply stay empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Location {
    /// Country name.
    pub country: String,
    /// ISO country code.
    pub country_code: String,
    /// Name of the region.
    pub region: String,
    /// Code of the region.
    pub region_code: String,
    /// Name of the city.
    pub city: String,
    /// Organization owning the address.
    pub org: String,
}

/// One input line and, once resolved, the address it points to.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub input: String,
    pub address: Option<Ipv4Addr>,
}

impl LookupRequest {
    pub fn new<S: Into<String>>(input: S) -> Self {
        Self {
            input: input.into(),
            address: None,
        }
    }
}

/// Shows the resolved address, or the input as typed while unresolved.
impl Display for LookupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.address {
            Some(address) => write!(f, "{}", address),
            None => write!(f, "{}", self.input),
        }
    }
}

/// Where locations come from, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote(Provider),
    Local,
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(provider) => write!(f, "{}", provider),
            Self::Local => write!(f, "local database"),
        }
    }
}
