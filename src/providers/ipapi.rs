use std::net::Ipv4Addr;

use super::{FieldMap, ProviderTrait};
use crate::client::Query;

static FIELDS: FieldMap = FieldMap {
    country: Some("country"),
    country_code: Some("countryCode"),
    region: Some("regionName"),
    region_code: Some("region"),
    city: Some("city"),
    org: Some("org"),
};

/// A provider for ip-api.com, the only one reporting the owning organization.
pub struct IpApiProvider;

impl ProviderTrait for IpApiProvider {
    fn query(&self, ip: &Ipv4Addr) -> Query {
        Query::Get(format!("http://ip-api.com/json/{}", ip))
    }

    fn fields(&self) -> &'static FieldMap {
        &FIELDS
    }
}
