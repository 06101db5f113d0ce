//! Local network interface enumeration via `getifaddrs`

use crate::core::LocalAddress;
use crate::error::{BootstrapError, BootstrapResult};
use crate::traits::InterfaceSource;

/// Reads the addresses bound to this host's interfaces
#[derive(Debug, Default)]
pub struct RealInterfaceSource;

impl RealInterfaceSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl InterfaceSource for RealInterfaceSource {
    fn local_addresses(&self) -> BootstrapResult<Vec<LocalAddress>> {
        use std::net::{IpAddr, SocketAddrV4, SocketAddrV6};

        let interfaces = nix::ifaddrs::getifaddrs().map_err(|err| BootstrapError::InterfaceEnumeration {
            message: err.to_string(),
        })?;

        // Link-layer and other non-IP entries carry no usable address
        Ok(interfaces
            .filter_map(|entry| {
                let storage = entry.address?;
                let ip = if let Some(v4) = storage.as_sockaddr_in() {
                    IpAddr::V4(*SocketAddrV4::from(*v4).ip())
                } else if let Some(v6) = storage.as_sockaddr_in6() {
                    IpAddr::V6(*SocketAddrV6::from(*v6).ip())
                } else {
                    return None;
                };
                Some(LocalAddress::new(entry.interface_name, ip))
            })
            .collect())
    }
}

#[cfg(not(unix))]
impl InterfaceSource for RealInterfaceSource {
    fn local_addresses(&self) -> BootstrapResult<Vec<LocalAddress>> {
        Err(BootstrapError::InterfaceEnumeration {
            message: "interface enumeration is only supported on unix".to_string(),
        })
    }
}
