//! Test helpers and builder patterns for bootstrapper tests

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bootstrapper::{Bootstrapper, CommandSpec, MockFileSystem, MockInterfaceSource, MockProcessRunner};

use super::fixtures::TestFixtures;

/// Shared log of every command handed to the runner
pub type CommandLog = Arc<Mutex<Vec<CommandSpec>>>;

/// Builder for bootstrappers wired to mocks with sensible defaults
pub struct BootstrapperBuilder {
    runner: MockProcessRunner,
    interfaces: MockInterfaceSource,
    file_system: MockFileSystem,
}

impl BootstrapperBuilder {
    pub fn new() -> Self {
        Self {
            runner: MockProcessRunner::new(),
            interfaces: MockInterfaceSource::new(),
            file_system: MockFileSystem::new(),
        }
    }

    /// Runner that records commands and answers with `exit(command)`
    pub fn with_recording_runner<E>(mut self, log: CommandLog, exit: E) -> Self
    where
        E: Fn(&CommandSpec) -> i32 + Send + 'static,
    {
        self.runner.expect_run().returning(move |command| {
            log.lock().unwrap().push(command.clone());
            Ok(exit(command))
        });
        self
    }

    /// Host whose eth0 carries `ip`
    pub fn with_host_ip(mut self, ip: &str) -> Self {
        let addresses = TestFixtures::host_addresses(ip);
        self.interfaces
            .expect_local_addresses()
            .returning(move || Ok(addresses.clone()));
        self
    }

    pub fn with_interfaces<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockInterfaceSource),
    {
        setup(&mut self.interfaces);
        self
    }

    pub fn with_file_system<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockFileSystem),
    {
        setup(&mut self.file_system);
        self
    }

    /// File system where every checkout already exists and all writes succeed
    pub fn with_existing_checkouts(self, removed: Arc<Mutex<Vec<PathBuf>>>) -> Self {
        self.with_file_system(move |fs| {
            fs.expect_exists().returning(|_| Ok(true));
            fs.expect_create_dir_all().returning(|_| Ok(()));
            fs.expect_remove_dir_all().returning(move |path| {
                removed.lock().unwrap().push(path.to_path_buf());
                Ok(())
            });
        })
    }

    pub fn build(self) -> Bootstrapper<MockProcessRunner, MockInterfaceSource, MockFileSystem> {
        Bootstrapper::new(self.runner, self.interfaces, self.file_system)
    }
}

/// Common assertions and lookups
pub struct TestHelpers;

impl TestHelpers {
    pub fn new_log() -> CommandLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn is_engine(command: &CommandSpec) -> bool {
        command.program.ends_with("bin/etcd")
    }

    pub fn commands(log: &CommandLog) -> Vec<CommandSpec> {
        log.lock().unwrap().clone()
    }

    pub fn rendered(log: &CommandLog) -> Vec<String> {
        Self::commands(log).iter().map(ToString::to_string).collect()
    }

    /// The single engine invocation recorded in `log`
    pub fn engine_command(log: &CommandLog) -> CommandSpec {
        let engines: Vec<_> = Self::commands(log).into_iter().filter(Self::is_engine).collect();
        assert_eq!(engines.len(), 1, "expected exactly one engine launch");
        engines.into_iter().next().unwrap()
    }
}
