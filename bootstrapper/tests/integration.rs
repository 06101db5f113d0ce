//! Integration tests running the bootstrap sequence against a real directory
//!
//! Subprocesses are simulated: `git clone` creates the checkout directory the
//! way git would, every other command succeeds without doing anything.

mod common;

use bootstrapper::services::RealFileSystem;
use bootstrapper::{Algorithm, Bootstrapper, CommandSpec, MockInterfaceSource, MockProcessRunner, Outcome};
use common::{CommandLog, TestFixtures, TestHelpers};

/// Runner that materialises cloned checkouts on disk
fn simulated_git(log: CommandLog) -> MockProcessRunner {
    let mut runner = MockProcessRunner::new();
    runner.expect_run().returning(move |command: &CommandSpec| {
        log.lock().unwrap().push(command.clone());
        if command.program == "git" && command.args.first().map(String::as_str) == Some("clone") {
            let name = command.args.last().expect("clone names its target");
            std::fs::create_dir_all(command.cwd.join(name))?;
        }
        Ok(0)
    });
    runner
}

fn interfaces_at(ip: &str) -> MockInterfaceSource {
    let addresses = TestFixtures::host_addresses(ip);
    let mut interfaces = MockInterfaceSource::new();
    interfaces
        .expect_local_addresses()
        .returning(move || Ok(addresses.clone()));
    interfaces
}

fn count_starting_with(log: &CommandLog, prefix: &str) -> usize {
    TestHelpers::rendered(log)
        .iter()
        .filter(|cmd| cmd.starts_with(prefix))
        .count()
}

#[tokio::test]
async fn test_first_run_creates_directory_and_clones() {
    let root = tempfile::tempdir().unwrap();
    let directory = root.path().join("nested").join("cluster");
    let log = TestHelpers::new_log();

    let bootstrapper = Bootstrapper::new(simulated_git(log.clone()), interfaces_at("10.0.0.1"), RealFileSystem::new());
    let outcome = bootstrapper
        .run(&TestFixtures::config_in(&directory, Algorithm::Raft, None))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Exited(0));
    assert!(directory.is_dir());
    for name in ["Raft", "PineappleGo", "ETCD", "RabiaGo", "RS-Paxos"] {
        assert!(directory.join(name).is_dir(), "{name} should be checked out");
    }
    assert_eq!(count_starting_with(&log, "git clone"), 5);
    assert_eq!(count_starting_with(&log, "git pull"), 0);
    // Fresh clones are trusted too, each right after its clone
    assert_eq!(count_starting_with(&log, "git config --global --add safe.directory"), 5);
    let rendered = TestHelpers::rendered(&log);
    let etcd_clone = rendered.iter().position(|cmd| cmd.ends_with(" ETCD")).unwrap();
    assert_eq!(
        rendered[etcd_clone + 1],
        format!("git config --global --add safe.directory {}", directory.join("ETCD").display())
    );
}

#[tokio::test]
async fn test_rerun_pulls_existing_checkouts() {
    let root = tempfile::tempdir().unwrap();
    let directory = root.path().to_path_buf();

    let first = TestHelpers::new_log();
    Bootstrapper::new(simulated_git(first.clone()), interfaces_at("10.0.0.2"), RealFileSystem::new())
        .run(&TestFixtures::config_in(&directory, Algorithm::Rabia, Some(1)))
        .await
        .unwrap();

    let second = TestHelpers::new_log();
    Bootstrapper::new(simulated_git(second.clone()), interfaces_at("10.0.0.2"), RealFileSystem::new())
        .run(&TestFixtures::config_in(&directory, Algorithm::Rabia, Some(1)))
        .await
        .unwrap();

    assert_eq!(count_starting_with(&second, "git clone"), 0);
    assert_eq!(count_starting_with(&second, "git pull"), 5);
    assert_eq!(count_starting_with(&second, "git config --global --add safe.directory"), 5);

    let pulled: Vec<_> = TestHelpers::commands(&second)
        .into_iter()
        .filter(|cmd| cmd.args == ["pull"])
        .map(|cmd| cmd.cwd)
        .collect();
    assert!(pulled.contains(&directory.join("ETCD")));
}

#[tokio::test]
async fn test_stale_node_data_is_removed_before_launch() {
    let root = tempfile::tempdir().unwrap();
    let directory = root.path().to_path_buf();
    let stale = directory.join("ETCD").join("node-3.etcd").join("member");
    std::fs::create_dir_all(&stale).unwrap();
    let other_node = directory.join("ETCD").join("node-1.etcd");
    std::fs::create_dir_all(&other_node).unwrap();

    let log = TestHelpers::new_log();
    Bootstrapper::new(simulated_git(log.clone()), interfaces_at("10.0.0.3"), RealFileSystem::new())
        .run(&TestFixtures::config_in(&directory, Algorithm::PineappleMemory, None))
        .await
        .unwrap();

    assert!(!directory.join("ETCD").join("node-3.etcd").exists());
    assert!(other_node.exists(), "only this node's data directory is reset");

    let engine = TestHelpers::engine_command(&log);
    assert_eq!(engine.cwd, directory.join("ETCD"));
    assert_eq!(engine.env["PINEAPPLE_MEMORY"], "true");
}

#[tokio::test]
async fn test_bench_builds_in_harness_checkout() {
    let root = tempfile::tempdir().unwrap();
    let directory = root.path().join("bench");
    let log = TestHelpers::new_log();

    let mut interfaces = MockInterfaceSource::new();
    interfaces.expect_local_addresses().never();
    let bootstrapper = Bootstrapper::new(simulated_git(log.clone()), interfaces, RealFileSystem::new());

    let outcome = bootstrapper
        .run(&TestFixtures::config_in(&directory, Algorithm::Bench, None))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Provisioned);

    let commands = TestHelpers::commands(&log);
    let build = commands.last().unwrap();
    assert_eq!(build.program, "make");
    assert_eq!(build.cwd, directory.join("go-ycsb"));
    assert!(directory.join("go-ycsb").is_dir());
}
