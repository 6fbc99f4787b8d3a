//! Endpoint descriptors: how a node can be reached.
//!
//! Each endpoint is a transport plus an address. The binary form is a type
//! byte followed by a fixed-layout payload; the string form is
//! `<scheme>/<address>`.
//!
//! | variant      | type | payload                        | string                   |
//! |--------------|------|--------------------------------|--------------------------|
//! | `Overlay`    | 0x01 | fingerprint (37 bytes)         | `zt/<fingerprint>`       |
//! | `Ethernet`   | 0x02 | MAC (6 bytes)                  | `eth/aa:bb:cc:dd:ee:ff`  |
//! | `WifiDirect` | 0x03 | MAC (6 bytes)                  | `wifi/aa:bb:cc:dd:ee:ff` |
//! | `Bluetooth`  | 0x04 | MAC (6 bytes)                  | `bt/aa:bb:cc:dd:ee:ff`   |
//! | `IpUdp`      | 0x05 | family, address, port          | `udp/10.0.0.1:9993`      |
//! | `IpTcp`      | 0x06 | family, address, port          | `tcp/[::1]:443`          |
//! | `IpHttp`     | 0x07 | family, address, port          | `http/10.0.0.1:80`       |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use locator_core::{Error, Result};
use locator_identity::Fingerprint;

use crate::wire::{WireReader, WireWriter};

const TYPE_OVERLAY: u8 = 0x01;
const TYPE_ETHERNET: u8 = 0x02;
const TYPE_WIFI_DIRECT: u8 = 0x03;
const TYPE_BLUETOOTH: u8 = 0x04;
const TYPE_IP_UDP: u8 = 0x05;
const TYPE_IP_TCP: u8 = 0x06;
const TYPE_IP_HTTP: u8 = 0x07;

const FAMILY_V4: u8 = 4;
const FAMILY_V6: u8 = 6;

/// 48-bit hardware address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const LEN: usize = 6;

    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut out = [0u8; 6];
        let mut parts = s.split(':');
        for byte in out.iter_mut() {
            let part = parts
                .next()
                .filter(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| Error::invalid(format!("malformed MAC address: {:?}", s)))?;
            *byte = u8::from_str_radix(part, 16)
                .map_err(|_| Error::invalid(format!("malformed MAC address: {:?}", s)))?;
        }
        if parts.next().is_some() {
            return Err(Error::invalid(format!("malformed MAC address: {:?}", s)));
        }
        Ok(Self(out))
    }
}

/// A transport plus address at which a node can be reached.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Reachable through another overlay node (relay).
    Overlay(Fingerprint),
    Ethernet(MacAddress),
    WifiDirect(MacAddress),
    Bluetooth(MacAddress),
    IpUdp(SocketAddr),
    IpTcp(SocketAddr),
    IpHttp(SocketAddr),
}

impl Endpoint {
    fn type_byte(&self) -> u8 {
        match self {
            Endpoint::Overlay(_) => TYPE_OVERLAY,
            Endpoint::Ethernet(_) => TYPE_ETHERNET,
            Endpoint::WifiDirect(_) => TYPE_WIFI_DIRECT,
            Endpoint::Bluetooth(_) => TYPE_BLUETOOTH,
            Endpoint::IpUdp(_) => TYPE_IP_UDP,
            Endpoint::IpTcp(_) => TYPE_IP_TCP,
            Endpoint::IpHttp(_) => TYPE_IP_HTTP,
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Endpoint::Overlay(_) => "zt",
            Endpoint::Ethernet(_) => "eth",
            Endpoint::WifiDirect(_) => "wifi",
            Endpoint::Bluetooth(_) => "bt",
            Endpoint::IpUdp(_) => "udp",
            Endpoint::IpTcp(_) => "tcp",
            Endpoint::IpHttp(_) => "http",
        }
    }

    /// Socket address of IP endpoints.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            Endpoint::IpUdp(addr) | Endpoint::IpTcp(addr) | Endpoint::IpHttp(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Rejects endpoints the binary form cannot carry unchanged.
    ///
    /// IPv6 flow info and scope id are not part of the encoding.
    pub fn check_encodable(&self) -> Result<()> {
        if let Some(SocketAddr::V6(addr)) = self.socket_addr() {
            if addr.scope_id() != 0 || addr.flowinfo() != 0 {
                return Err(Error::invalid(format!(
                    "endpoint {} carries an IPv6 scope id or flow info",
                    self
                )));
            }
        }
        Ok(())
    }

    /// Writes the binary form.
    pub fn marshal(&self, w: &mut WireWriter<'_>) -> Result<()> {
        self.check_encodable()?;
        w.put_u8(self.type_byte())?;
        match self {
            Endpoint::Overlay(fp) => w.put_bytes(&fp.to_bytes()),
            Endpoint::Ethernet(mac) | Endpoint::WifiDirect(mac) | Endpoint::Bluetooth(mac) => {
                w.put_bytes(&mac.octets())
            }
            Endpoint::IpUdp(addr) | Endpoint::IpTcp(addr) | Endpoint::IpHttp(addr) => {
                match addr.ip() {
                    IpAddr::V4(ip) => {
                        w.put_u8(FAMILY_V4)?;
                        w.put_bytes(&ip.octets())?;
                    }
                    IpAddr::V6(ip) => {
                        w.put_u8(FAMILY_V6)?;
                        w.put_bytes(&ip.octets())?;
                    }
                }
                w.put_u16(addr.port())
            }
        }
    }

    /// Reads one endpoint from its binary form.
    pub fn unmarshal(r: &mut WireReader<'_>) -> Result<Self> {
        let kind = r.get_u8()?;
        match kind {
            TYPE_OVERLAY => Ok(Endpoint::Overlay(Fingerprint::from_bytes(
                r.take(Fingerprint::LEN)?,
            )?)),
            TYPE_ETHERNET => Ok(Endpoint::Ethernet(MacAddress(r.take_array()?))),
            TYPE_WIFI_DIRECT => Ok(Endpoint::WifiDirect(MacAddress(r.take_array()?))),
            TYPE_BLUETOOTH => Ok(Endpoint::Bluetooth(MacAddress(r.take_array()?))),
            TYPE_IP_UDP => Ok(Endpoint::IpUdp(unmarshal_socket_addr(r)?)),
            TYPE_IP_TCP => Ok(Endpoint::IpTcp(unmarshal_socket_addr(r)?)),
            TYPE_IP_HTTP => Ok(Endpoint::IpHttp(unmarshal_socket_addr(r)?)),
            other => Err(Error::invalid(format!("unknown endpoint type 0x{:02x}", other))),
        }
    }
}

fn unmarshal_socket_addr(r: &mut WireReader<'_>) -> Result<SocketAddr> {
    let ip = match r.get_u8()? {
        FAMILY_V4 => IpAddr::V4(Ipv4Addr::from(r.take_array::<4>()?)),
        FAMILY_V6 => IpAddr::V6(Ipv6Addr::from(r.take_array::<16>()?)),
        other => {
            return Err(Error::invalid(format!("unknown address family {}", other)));
        }
    };
    let port = r.get_u16()?;
    Ok(SocketAddr::new(ip, port))
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Overlay(fp) => write!(f, "{}/{}", self.scheme(), fp),
            Endpoint::Ethernet(mac) | Endpoint::WifiDirect(mac) | Endpoint::Bluetooth(mac) => {
                write!(f, "{}/{}", self.scheme(), mac)
            }
            Endpoint::IpUdp(addr) | Endpoint::IpTcp(addr) | Endpoint::IpHttp(addr) => {
                write!(f, "{}/{}", self.scheme(), addr)
            }
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = s
            .split_once('/')
            .ok_or_else(|| Error::invalid(format!("endpoint missing scheme: {:?}", s)))?;
        let socket = || {
            rest.parse::<SocketAddr>()
                .map_err(|e| Error::invalid(format!("endpoint address {:?}: {}", rest, e)))
        };
        let endpoint = match scheme {
            "zt" => Endpoint::Overlay(rest.parse()?),
            "eth" => Endpoint::Ethernet(rest.parse()?),
            "wifi" => Endpoint::WifiDirect(rest.parse()?),
            "bt" => Endpoint::Bluetooth(rest.parse()?),
            "udp" => Endpoint::IpUdp(socket()?),
            "tcp" => Endpoint::IpTcp(socket()?),
            "http" => Endpoint::IpHttp(socket()?),
            other => {
                return Err(Error::invalid(format!(
                    "unknown endpoint scheme {:?}",
                    other
                )))
            }
        };
        endpoint.check_encodable()?;
        Ok(endpoint)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
