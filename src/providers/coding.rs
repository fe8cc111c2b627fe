use std::net::Ipv4Addr;

use super::{FieldMap, ProviderTrait};
use crate::client::Query;

static FIELDS: FieldMap = FieldMap {
    country: Some("country_name"),
    country_code: Some("country_code"),
    region: Some("region_name"),
    region_code: None,
    city: Some("city_name"),
    org: None,
};

/// A provider for coding.tools, queried with a form POST.
pub struct CodingProvider;

impl ProviderTrait for CodingProvider {
    fn query(&self, ip: &Ipv4Addr) -> Query {
        Query::PostForm {
            url: "https://coding.tools/my-ip-address".to_string(),
            key: "queryIp",
            value: ip.to_string(),
        }
    }

    fn fields(&self) -> &'static FieldMap {
        &FIELDS
    }
}
