use std::{
    net::{IpAddr, Ipv4Addr},
    time::{Duration, Instant},
};

use trust_dns_resolver::{
    config::{LookupIpStrategy, ResolverConfig, ResolverOpts},
    system_conf::read_system_conf,
    TokioAsyncResolver,
};

use crate::error::{LookupError, Result};

/// Turns user input into the IPv4 address to locate.
pub struct Resolver {
    inner: TokioAsyncResolver,
    timeout: Duration,
}

impl Resolver {
    /// Creates a resolver from the system configuration, bounding every query by `timeout`.
    ///
    /// Falls back to the library default upstreams when the system configuration
    /// cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match read_system_conf() {
            Ok(conf) => conf,
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("Failed to read system resolver configuration, using defaults: {}", _e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
            timeout,
        }
    }

    /// Resolves `host` to an IPv4 address.
    ///
    /// IPv4 literals, including the short `inet_aton` forms such as `127.1`, are
    /// returned as is. IPv6 literals have no IPv4 form and fail.
    pub async fn resolve(&self, host: &str) -> Result<Ipv4Addr> {
        let host = host.trim();
        match host.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => return Ok(ip),
            Ok(IpAddr::V6(_)) => return Err(LookupError::Resolution(host.to_string())),
            Err(_) => {
                if let Some(ip) = parse_inet_aton(host) {
                    return Ok(ip);
                }
            }
        }
        if !is_valid_hostname(host) {
            return Err(LookupError::Resolution(host.to_string()));
        }

        let start_time = Instant::now();
        let lookup = tokio::time::timeout(self.timeout, self.inner.lookup_ip(host))
            .await
            .map_err(|_| LookupError::Resolution(host.to_string()))?
            .map_err(|_e| {
                #[cfg(feature = "log")]
                log::debug!("{}: {}", host, _e);
                LookupError::Resolution(host.to_string())
            })?;

        let ip = lookup
            .iter()
            .find_map(|addr| match addr {
                IpAddr::V4(ip) => Some(ip),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| LookupError::Resolution(host.to_string()))?;

        #[cfg(feature = "log")]
        log::debug!("{}: resolved to {} in {:?}", host, ip, start_time.elapsed());
        #[cfg(not(feature = "log"))]
        let _ = start_time;
        Ok(ip)
    }
}

/// Parses an IPv4 address written the way `inet_aton` accepts it.
///
/// One to four dot-separated parts, each decimal, octal (leading `0`) or hex
/// (`0x`). The last part fills all remaining bytes, so `1.2.3` is `1.2.0.3`.
fn parse_inet_aton(host: &str) -> Option<Ipv4Addr> {
    let parts = host
        .split('.')
        .map(parse_inet_part)
        .collect::<Option<Vec<u32>>>()?;
    if parts.len() > 4 {
        return None;
    }
    let (last, leading) = parts.split_last()?;
    if leading.iter().any(|&part| part > 0xff) {
        return None;
    }
    if leading.is_empty() {
        return Some(Ipv4Addr::from(*last));
    }

    let bits = 8 * (4 - leading.len() as u32);
    if *last >> bits != 0 {
        return None;
    }
    let prefix = leading.iter().fold(0u32, |acc, &part| (acc << 8) | part);
    Some(Ipv4Addr::from((prefix << bits) | last))
}

fn parse_inet_part(part: &str) -> Option<u32> {
    let (digits, radix) = match part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None if part.len() > 1 && part.starts_with('0') => (&part[1..], 8),
        None => (part, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Checks the RFC 1123 shape of a host name, tolerating underscores and a trailing dot.
fn is_valid_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_shape() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("example.com."));
        assert!(is_valid_hostname("_dmarc.example-site.org"));
        assert!(is_valid_hostname("localhost"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("bad host"));
        assert!(!is_valid_hostname("-leading.example.com"));
        assert!(!is_valid_hostname("double..dot"));
        assert!(!is_valid_hostname(&"a".repeat(64)));
    }

    #[tokio::test]
    async fn ipv4_literal_needs_no_query() {
        let resolver = Resolver::new(Duration::from_secs(1));
        let ip = resolver.resolve(" 8.8.4.4 ").await.unwrap();
        assert_eq!(ip, Ipv4Addr::new(8, 8, 4, 4));
    }

    #[test]
    fn inet_aton_forms() {
        let cases = [
            ("127.1", Ipv4Addr::new(127, 0, 0, 1)),
            ("1.2.3", Ipv4Addr::new(1, 2, 0, 3)),
            ("10.65535", Ipv4Addr::new(10, 0, 255, 255)),
            ("3232235777", Ipv4Addr::new(192, 168, 1, 1)),
            ("0x7f.1", Ipv4Addr::new(127, 0, 0, 1)),
            ("010.0.0.1", Ipv4Addr::new(8, 0, 0, 1)),
            ("0.0.0.0", Ipv4Addr::UNSPECIFIED),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_inet_aton(input), Some(expected), "{}", input);
        }
    }

    #[test]
    fn inet_aton_rejects_out_of_range_and_junk() {
        for input in [
            "1.2.3.256",
            "1.256.3",
            "1.2.65536",
            "4294967296",
            "1.2.3.4.5",
            "1..2",
            "1.2.",
            "+1.2.3.4",
            "08.1.1.1",
            "0x",
            "example.com",
            "",
        ] {
            assert_eq!(parse_inet_aton(input), None, "{}", input);
        }
    }

    #[tokio::test]
    async fn short_ipv4_literal_needs_no_query() {
        let resolver = Resolver::new(Duration::from_secs(1));
        assert_eq!(
            resolver.resolve("1.2.3").await.unwrap(),
            Ipv4Addr::new(1, 2, 0, 3)
        );
        assert_eq!(
            resolver.resolve(" 127.1 ").await.unwrap(),
            Ipv4Addr::LOCALHOST
        );
    }

    #[tokio::test]
    async fn ipv6_literal_is_rejected() {
        let resolver = Resolver::new(Duration::from_secs(1));
        let err = resolver.resolve("2001:db8::1").await.unwrap_err();
        assert_eq!(err, LookupError::Resolution("2001:db8::1".to_string()));
    }

    #[tokio::test]
    async fn malformed_host_is_rejected() {
        let resolver = Resolver::new(Duration::from_secs(1));
        let err = resolver.resolve("not a host!").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid IP or hostname: not a host!");
    }
}
