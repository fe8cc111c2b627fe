use std::net::Ipv4Addr;

use super::{FieldMap, ProviderTrait};
use crate::client::Query;

static FIELDS: FieldMap = FieldMap {
    country: Some("country"),
    country_code: None,
    region: Some("region"),
    region_code: None,
    city: Some("city"),
    org: None,
};

/// A provider for ipinfo.io.
pub struct IpInfoProvider;

impl ProviderTrait for IpInfoProvider {
    fn query(&self, ip: &Ipv4Addr) -> Query {
        Query::Get(format!("http://ipinfo.io/{}/json", ip))
    }

    fn fields(&self) -> &'static FieldMap {
        &FIELDS
    }
}
