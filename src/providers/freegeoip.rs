use std::net::Ipv4Addr;

use super::{FieldMap, ProviderTrait};
use crate::client::Query;

static FIELDS: FieldMap = FieldMap {
    country: Some("country_name"),
    country_code: Some("country_code"),
    region: Some("region_name"),
    region_code: Some("region_code"),
    city: Some("city"),
    org: None,
};

/// A provider for freegeoip.app.
pub struct FreeGeoIpProvider;

impl ProviderTrait for FreeGeoIpProvider {
    fn query(&self, ip: &Ipv4Addr) -> Query {
        Query::Get(format!("https://freegeoip.app/json/{}", ip))
    }

    fn fields(&self) -> &'static FieldMap {
        &FIELDS
    }
}
