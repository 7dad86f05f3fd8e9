//! Network identity of cluster peers.
//!
//! An [`Endpoint`] is the only thing the placement code knows about a peer:
//! its address and port. Two endpoints are the same peer iff they compare
//! equal.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Port assumed when an endpoint is written as a bare IP address.
pub const DEFAULT_STORAGE_PORT: u16 = 7000;

/// Address and port of a peer node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(SocketAddr);

impl Endpoint {
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    /// Endpoint on the default storage port.
    pub fn from_ip(ip: IpAddr) -> Self {
        Self(SocketAddr::new(ip, DEFAULT_STORAGE_PORT))
    }

    #[inline]
    pub fn addr(&self) -> SocketAddr {
        self.0
    }

    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.0.ip()
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.0.port()
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Parses `ip:port`, `[v6]:port`, or a bare IP (default storage port).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(Self(addr));
        }
        s.parse::<IpAddr>()
            .map(Self::from_ip)
            .map_err(|_| Error::InvalidEndpoint(s.to_string()))
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self.0)
    }
}
