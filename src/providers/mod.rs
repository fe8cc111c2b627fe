mod coding;
mod freegeoip;
mod ipapi;
mod ipinfo;

use std::{fmt::Display, net::Ipv4Addr, str::FromStr, time::Duration};

use async_trait::async_trait;
pub use coding::CodingProvider;
pub use freegeoip::FreeGeoIpProvider;
pub use ipapi::IpApiProvider;
pub use ipinfo::IpInfoProvider;
use serde_json::{Map, Value};

use crate::{
    client::{HttpClient, Query},
    error::{LookupError, Result},
    models::{Location, Source},
    runner::Locator,
};

/// The remote geolocation services that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// ip-api.com
    #[default]
    IpApi,
    /// freegeoip.app
    FreeGeoIp,
    /// ipinfo.io
    IpInfo,
    /// coding.tools
    Coding,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::IpApi,
        Provider::FreeGeoIp,
        Provider::IpInfo,
        Provider::Coding,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IpApi => "ipapi",
            Self::FreeGeoIp => "freegeoip",
            Self::IpInfo => "ipinfo",
            Self::Coding => "coding",
        }
    }

    /// Returns the adapter implementing this provider.
    pub fn adapter(&self) -> Box<dyn ProviderTrait + Send + Sync> {
        match self {
            Self::IpApi => Box::new(IpApiProvider),
            Self::FreeGeoIp => Box::new(FreeGeoIpProvider),
            Self::IpInfo => Box::new(IpInfoProvider),
            Self::Coding => Box::new(CodingProvider),
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.name() == s)
            .ok_or_else(|| format!("unknown provider: {}", s))
    }
}

/// JSON keys a provider uses for each `Location` field; `None` when it has no such field.
#[derive(Debug, Default)]
pub struct FieldMap {
    pub country: Option<&'static str>,
    pub country_code: Option<&'static str>,
    pub region: Option<&'static str>,
    pub region_code: Option<&'static str>,
    pub city: Option<&'static str>,
    pub org: Option<&'static str>,
}

impl FieldMap {
    /// Builds a `Location` from a decoded response object.
    ///
    /// Missing keys and `null` values become empty strings.
    pub fn apply(&self, object: &Map<String, Value>) -> Location {
        let field = |key: Option<&'static str>| -> String {
            match key.and_then(|key| object.get(key)) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            }
        };

        Location {
            country: field(self.country),
            country_code: field(self.country_code),
            region: field(self.region),
            region_code: field(self.region_code),
            city: field(self.city),
            org: field(self.org),
        }
    }
}

/// A remote geolocation API: how to ask it and how to read its answer.
pub trait ProviderTrait {
    /// The single request locating `ip`.
    fn query(&self, ip: &Ipv4Addr) -> Query;

    /// Key mapping of the provider's response.
    fn fields(&self) -> &'static FieldMap;

    /// Decodes a response body.
    fn parse(&self, body: &[u8]) -> Result<Location> {
        let value: Value = serde_json::from_slice(body)?;
        match value.as_object() {
            Some(object) => Ok(self.fields().apply(object)),
            None => Err(LookupError::MalformedResponse(
                "expected a JSON object".to_string(),
            )),
        }
    }
}

/// Locates addresses through one remote provider.
pub struct RemoteLocator {
    provider: Provider,
    adapter: Box<dyn ProviderTrait + Send + Sync>,
    client: HttpClient,
}

impl RemoteLocator {
    pub fn new(provider: Provider, timeout: Duration) -> Self {
        Self {
            provider,
            adapter: provider.adapter(),
            client: HttpClient::new(timeout),
        }
    }
}

#[async_trait]
impl Locator for RemoteLocator {
    fn source(&self) -> Source {
        Source::Remote(self.provider)
    }

    async fn locate(&self, ip: Ipv4Addr) -> Result<Location> {
        let query = self.adapter.query(&ip);
        #[cfg(feature = "log")]
        log::debug!("{}: querying {}", ip, query.url());

        let body = self.client.send(&query).await?;
        self.adapter.parse(&body)
    }
}
