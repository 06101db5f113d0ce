//! Source checkouts and the steps that fetch and build them

use std::path::{Path, PathBuf};

use super::command::CommandSpec;
use crate::config::Algorithm;

/// A named git checkout living directly under the bootstrap directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkout {
    pub name: &'static str,
    pub url: &'static str,
}

impl Checkout {
    pub fn path(&self, directory: &Path) -> PathBuf {
        directory.join(self.name)
    }
}

pub const RAFT: Checkout = Checkout {
    name: "Raft",
    url: "https://github.com/Exerosis/Raft.git",
};

pub const PINEAPPLE: Checkout = Checkout {
    name: "PineappleGo",
    url: "https://github.com/Exerosis/PineappleGo.git",
};

/// Hosts every engine: the other engine checkouts are linked into its build
pub const ETCD: Checkout = Checkout {
    name: "ETCD",
    url: "https://github.com/Exerosis/ETCD.git",
};

pub const RABIA: Checkout = Checkout {
    name: "RabiaGo",
    url: "https://github.com/Exerosis/RabiaGo.git",
};

pub const RS_PAXOS: Checkout = Checkout {
    name: "RS-Paxos",
    url: "https://github.com/Bompedy/RS-Paxos.git",
};

/// Benchmark harness used by `bench`
pub const YCSB: Checkout = Checkout {
    name: "go-ycsb",
    url: "https://github.com/Exerosis/go-ycsb.git",
};

const ENGINE_CHECKOUTS: [Checkout; 5] = [RAFT, PINEAPPLE, ETCD, RABIA, RS_PAXOS];
const BENCH_CHECKOUTS: [Checkout; 1] = [YCSB];

/// Checkouts that must be present before running `algorithm`
pub fn checkouts_for(algorithm: Algorithm) -> &'static [Checkout] {
    if algorithm.is_bench() {
        &BENCH_CHECKOUTS
    } else {
        &ENGINE_CHECKOUTS
    }
}

/// Clone when absent, pull when present; either way the checkout ends up trusted
pub fn fetch_steps(directory: &Path, checkout: &Checkout, exists: bool) -> Vec<CommandSpec> {
    if exists {
        vec![trust_step(directory, checkout), pull_step(directory, checkout)]
    } else {
        vec![clone_step(directory, checkout), trust_step(directory, checkout)]
    }
}

pub fn clone_step(directory: &Path, checkout: &Checkout) -> CommandSpec {
    CommandSpec::new("git", directory)
        .arg("clone")
        .arg(checkout.url)
        .arg(checkout.name)
}

pub fn pull_step(directory: &Path, checkout: &Checkout) -> CommandSpec {
    CommandSpec::new("git", checkout.path(directory)).arg("pull")
}

/// Mark a checkout as a safe directory so git operates on it regardless of owner
pub fn trust_step(directory: &Path, checkout: &Checkout) -> CommandSpec {
    CommandSpec::new("git", directory).args([
        "config".to_string(),
        "--global".to_string(),
        "--add".to_string(),
        "safe.directory".to_string(),
        checkout.path(directory).to_string_lossy().into_owned(),
    ])
}

pub fn harness_build_step(directory: &Path) -> CommandSpec {
    CommandSpec::new("make", YCSB.path(directory))
}

pub fn engine_build_step(directory: &Path) -> CommandSpec {
    CommandSpec::new("make", ETCD.path(directory)).arg("build")
}
