//! Test fixtures and data for bootstrapper tests

use std::net::IpAddr;
use std::path::Path;

use bootstrapper::{Algorithm, InvocationConfig, LocalAddress};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const DIRECTORY: &'static str = "/opt/cluster";
    pub const PEERS: [&'static str; 3] = ["10.0.0.1", "10.0.0.2", "10.0.0.3"];
    pub const PEERS_FLAG: &'static str = "--ips=10.0.0.1,10.0.0.2,10.0.0.3";
    pub const FOREIGN_IP: &'static str = "192.168.7.7";

    pub fn peers() -> Vec<String> {
        Self::PEERS.iter().map(|p| p.to_string()).collect()
    }

    /// Validated config under the default directory
    pub fn config(algorithm: Algorithm, failures: Option<u32>) -> InvocationConfig {
        Self::config_in(Path::new(Self::DIRECTORY), algorithm, failures)
    }

    pub fn config_in(directory: &Path, algorithm: Algorithm, failures: Option<u32>) -> InvocationConfig {
        InvocationConfig::new(directory, algorithm, Self::peers(), failures).expect("valid fixture config")
    }

    /// Loopback plus one address on eth0, like a typical cluster host
    pub fn host_addresses(ip: &str) -> Vec<LocalAddress> {
        let ip: IpAddr = ip.parse().expect("valid fixture ip");
        vec![
            LocalAddress::new("lo", "127.0.0.1".parse().unwrap()),
            LocalAddress::new("eth0", ip),
        ]
    }
}
