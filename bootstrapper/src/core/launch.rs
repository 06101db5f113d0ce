//! Launch plan construction for the consensus engine
//!
//! All engines run inside the same etcd host process. Raft is configured
//! through `--initial-cluster`; every other engine reads the peer list and
//! its mode flag from the environment instead.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::command::CommandSpec;
use super::identity::{node_name, NodeIdentity};
use super::repositories::{self, ETCD};
use crate::config::{Algorithm, InvocationConfig};

pub const CLIENT_PORT: u16 = 2379;
pub const PEER_PORT: u16 = 12380;
pub const CLUSTER_TOKEN: &str = "etcd-cluster-1";
pub const ENGINE_LOG_LEVEL: &str = "panic";
pub const QUOTA_BACKEND_BYTES: u64 = 10_000_000_000;
pub const SNAPSHOT_COUNT: u64 = 0;
pub const MAX_REQUEST_BYTES: u64 = 104_857_600;

pub const ENV_NODES: &str = "NODES";
pub const ENV_FAILURES: &str = "FAILURES";
pub const ENV_RS_RABIA: &str = "RS_RABIA";
pub const ENV_RS_PAXOS: &str = "RS_PAXOS";
pub const ENV_PINEAPPLE: &str = "PINEAPPLE";
pub const ENV_PINEAPPLE_MEMORY: &str = "PINEAPPLE_MEMORY";

/// Work done right before the engine starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PreambleStep {
    /// Delete a directory tree if it exists
    RemoveDir { path: PathBuf },
    /// Run a command to completion; non-zero aborts the launch
    Run(CommandSpec),
}

/// Fully resolved engine startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub preamble: Vec<PreambleStep>,
    pub command: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub working_directory: PathBuf,
}

impl LaunchPlan {
    /// The engine invocation as a runnable command
    pub fn engine_command(&self) -> CommandSpec {
        let mut parts = self.command.iter();
        let program = parts.next().cloned().unwrap_or_default();
        CommandSpec::new(program, self.working_directory.clone())
            .args(parts.cloned())
            .envs(&self.environment)
    }

    /// Value of `--initial-cluster`, only present for raft
    pub fn initial_cluster(&self) -> Option<&str> {
        self.command
            .iter()
            .position(|arg| arg == "--initial-cluster")
            .and_then(|index| self.command.get(index + 1))
            .map(String::as_str)
    }
}

/// Mode flags, exactly one set for the matching engine and none for raft
pub fn mode_flags(algorithm: Algorithm) -> [(&'static str, bool); 4] {
    [
        (ENV_RS_RABIA, algorithm == Algorithm::Rabia),
        (ENV_RS_PAXOS, algorithm == Algorithm::Paxos),
        (ENV_PINEAPPLE, algorithm == Algorithm::Pineapple),
        (ENV_PINEAPPLE_MEMORY, algorithm == Algorithm::PineappleMemory),
    ]
}

/// Environment handed to the engine and its preamble
pub fn launch_environment(config: &InvocationConfig) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(ENV_NODES.to_string(), config.peers().join(","));
    for (name, enabled) in mode_flags(config.algorithm()) {
        env.insert(name.to_string(), enabled.to_string());
    }
    env.insert(
        ENV_FAILURES.to_string(),
        config.failure_tolerance().unwrap_or(0).to_string(),
    );
    env
}

/// Host part of a URL, bracketing IPv6 literals
pub fn url_host(address: &str) -> String {
    if address.contains(':') {
        format!("[{address}]")
    } else {
        address.to_string()
    }
}

/// `node-<i>=http://<peer>:12380` for every peer, in list order
pub fn initial_cluster(peers: &[String]) -> String {
    peers
        .iter()
        .enumerate()
        .map(|(index, peer)| format!("{}=http://{}:{}", node_name(index + 1), url_host(peer), PEER_PORT))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the launch plan for this node
pub fn build(config: &InvocationConfig, identity: &NodeIdentity) -> LaunchPlan {
    let directory = config.directory();
    let working_directory = ETCD.path(directory);
    let environment = launch_environment(config);
    let name = identity.name();
    let host = url_host(&identity.address);

    let preamble = vec![
        PreambleStep::RemoveDir {
            path: working_directory.join(format!("{name}.etcd")),
        },
        PreambleStep::Run(repositories::engine_build_step(directory).envs(&environment)),
    ];

    let mut command = vec![
        working_directory.join("bin").join("etcd").to_string_lossy().into_owned(),
        "--log-level".to_string(),
        ENGINE_LOG_LEVEL.to_string(),
        "--name".to_string(),
        name,
        "--initial-cluster-token".to_string(),
        CLUSTER_TOKEN.to_string(),
        "--listen-client-urls".to_string(),
        format!("http://{host}:{CLIENT_PORT},http://127.0.0.1:{CLIENT_PORT}"),
        "--advertise-client-urls".to_string(),
        format!("http://{host}:{CLIENT_PORT}"),
        "--initial-advertise-peer-urls".to_string(),
        format!("http://{host}:{PEER_PORT}"),
        "--listen-peer-urls".to_string(),
        format!("http://{host}:{PEER_PORT}"),
        "--quota-backend-bytes".to_string(),
        QUOTA_BACKEND_BYTES.to_string(),
        "--snapshot-count".to_string(),
        SNAPSHOT_COUNT.to_string(),
        "--max-request-bytes".to_string(),
        MAX_REQUEST_BYTES.to_string(),
    ];

    if config.algorithm() == Algorithm::Raft {
        command.push("--initial-cluster".to_string());
        command.push(initial_cluster(config.peers()));
    }

    command.push("--initial-cluster-state".to_string());
    command.push("new".to_string());

    LaunchPlan {
        preamble,
        command,
        environment,
        working_directory,
    }
}
