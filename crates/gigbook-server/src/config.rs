use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
    5000,
);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind: parse_bind(env::var("GIGBOOK_BIND").ok().as_deref()),
        }
    }
}

fn parse_bind(raw: Option<&str>) -> SocketAddr {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => DEFAULT_BIND,
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %v, default = %DEFAULT_BIND, "GIGBOOK_BIND is not a socket address, using default");
            DEFAULT_BIND
        }),
    }
}
