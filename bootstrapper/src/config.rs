//! Invocation arguments and their validation
//!
//! Flags are read from the command line first and fall back to `BOOTSTRAP_*`
//! environment variables, which may themselves come from a `.env` file.
//! Nothing here touches the disk or the network: an [`InvocationConfig`] can
//! only be obtained by passing validation, so everything downstream runs on
//! checked input.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, BootstrapResult};

/// Provision, identify and launch a consensus cluster node
#[derive(Parser, Debug, Clone)]
#[command(name = "bootstrapper")]
#[command(about = "Provisions a consensus engine and launches this machine's cluster node")]
pub struct Args {
    /// Directory holding the source checkouts (created if missing)
    #[arg(long, env = "BOOTSTRAP_DIRECTORY")]
    pub directory: PathBuf,

    /// Consensus algorithm to provision and launch
    #[arg(long, value_enum, env = "BOOTSTRAP_ALGORITHM")]
    pub algorithm: Algorithm,

    /// Cluster member addresses separated by commas; order defines node names
    #[arg(long, env = "BOOTSTRAP_IPS")]
    pub ips: String,

    /// Failures the cluster must tolerate (required for rabia and paxos)
    #[arg(long, env = "BOOTSTRAP_FAILURES")]
    pub failures: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "BOOTSTRAP_LOG_LEVEL")]
    pub log_level: String,

    /// What to do when several local addresses appear in the peer list
    #[arg(long, value_enum, default_value_t = IdentityPolicy::LastMatch)]
    pub identity_policy: IdentityPolicy,

    /// Resolve the node and print the launch plan without running anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Validate the parsed flags into an invocation config
    pub fn into_config(self) -> BootstrapResult<InvocationConfig> {
        let peers = parse_peers(&self.ips)?;
        Ok(InvocationConfig::new(self.directory, self.algorithm, peers, self.failures)?
            .with_identity_policy(self.identity_policy)
            .with_dry_run(self.dry_run))
    }
}

/// Supported consensus algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Bench,
    Raft,
    Rabia,
    Paxos,
    Pineapple,
    PineappleMemory,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bench,
        Algorithm::Raft,
        Algorithm::Rabia,
        Algorithm::Paxos,
        Algorithm::Pineapple,
        Algorithm::PineappleMemory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bench => "bench",
            Algorithm::Raft => "raft",
            Algorithm::Rabia => "rabia",
            Algorithm::Paxos => "paxos",
            Algorithm::Pineapple => "pineapple",
            Algorithm::PineappleMemory => "pineapple-memory",
        }
    }

    /// Quorum algorithms need an explicit failure tolerance
    pub fn requires_failures(&self) -> bool {
        matches!(self, Algorithm::Rabia | Algorithm::Paxos)
    }

    /// The benchmark harness has no node identity and no launch phase
    pub fn is_bench(&self) -> bool {
        matches!(self, Algorithm::Bench)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for a host that owns more than one listed peer address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    /// Take the last match in interface enumeration order
    #[default]
    LastMatch,
    /// Refuse to pick and fail the run
    Reject,
}

/// Validated invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationConfig {
    directory: PathBuf,
    algorithm: Algorithm,
    peers: Vec<String>,
    failure_tolerance: Option<u32>,
    identity_policy: IdentityPolicy,
    dry_run: bool,
}

impl InvocationConfig {
    /// Validate the core invocation fields
    pub fn new(
        directory: impl Into<PathBuf>,
        algorithm: Algorithm,
        peers: Vec<String>,
        failure_tolerance: Option<u32>,
    ) -> BootstrapResult<Self> {
        validate_peers(&peers)?;

        if algorithm.requires_failures() {
            let failures = failure_tolerance.ok_or_else(|| BootstrapError::MissingFailures {
                algorithm: algorithm.to_string(),
            })?;
            if usize::try_from(failures).map_or(true, |failures| failures >= peers.len()) {
                return Err(BootstrapError::FailuresOutOfBounds {
                    failures,
                    peers: peers.len(),
                });
            }
        }

        Ok(Self {
            directory: directory.into(),
            algorithm,
            peers,
            failure_tolerance,
            identity_policy: IdentityPolicy::default(),
            dry_run: false,
        })
    }

    pub fn with_identity_policy(mut self, identity_policy: IdentityPolicy) -> Self {
        self.identity_policy = identity_policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn failure_tolerance(&self) -> Option<u32> {
        self.failure_tolerance
    }

    pub fn identity_policy(&self) -> IdentityPolicy {
        self.identity_policy
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Split a comma-separated peer list, trimming each entry and keeping order
pub fn parse_peers(raw: &str) -> BootstrapResult<Vec<String>> {
    if raw.trim().is_empty() {
        return Err(BootstrapError::EmptyPeerList);
    }
    let peers: Vec<String> = raw.split(',').map(|peer| peer.trim().to_string()).collect();
    validate_peers(&peers)?;
    Ok(peers)
}

fn validate_peers(peers: &[String]) -> BootstrapResult<()> {
    if peers.is_empty() {
        return Err(BootstrapError::EmptyPeerList);
    }

    let mut seen = HashSet::with_capacity(peers.len());
    for (index, peer) in peers.iter().enumerate() {
        if peer.is_empty() {
            return Err(BootstrapError::EmptyPeer { position: index + 1 });
        }
        if !seen.insert(peer.as_str()) {
            return Err(BootstrapError::DuplicatePeer { address: peer.clone() });
        }
    }
    Ok(())
}
