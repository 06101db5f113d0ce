//! Main bootstrap sequence
//!
//! Runs strictly in order: directory setup, provisioning, identity
//! resolution, launch plan construction and the blocking engine launch.
//! Every step waits for the previous one; the first failure ends the run.

use serde::Serialize;

use crate::config::InvocationConfig;
use crate::core::{identity, launch, repositories, CommandSpec, LaunchPlan, NodeIdentity, PreambleStep};
use crate::error::{BootstrapError, BootstrapResult};
use crate::traits::{FileSystem, InterfaceSource, ProcessRunner};
use shared::{logging, process_debug, process_info, ProcessId};

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Bench harness fetched and built; nothing launched
    Provisioned,
    /// The engine ran and exited with this code
    Exited(i32),
    /// Nothing executed; the plan is returned instead
    DryRun(DryRunReport),
}

/// What a run would do, as printed by `--dry-run`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    pub node: Option<NodeIdentity>,
    pub provisioning: Vec<CommandSpec>,
    pub launch: Option<LaunchPlan>,
}

impl DryRunReport {
    /// Pretty JSON as printed by `--dry-run`
    pub fn to_json(&self) -> BootstrapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Exit status for the bootstrapper given the engine's exit code
pub fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Coordinates provisioning and launch through injected collaborators
pub struct Bootstrapper<R, I, F>
where
    R: ProcessRunner,
    I: InterfaceSource,
    F: FileSystem,
{
    runner: R,
    interfaces: I,
    file_system: F,
}

impl<R, I, F> Bootstrapper<R, I, F>
where
    R: ProcessRunner,
    I: InterfaceSource,
    F: FileSystem,
{
    /// Create new bootstrapper with injected dependencies
    pub fn new(runner: R, interfaces: I, file_system: F) -> Self {
        Self {
            runner,
            interfaces,
            file_system,
        }
    }

    /// Execute the whole sequence for a validated invocation
    pub async fn run(&self, config: &InvocationConfig) -> BootstrapResult<Outcome> {
        if config.dry_run() {
            return self.dry_run(config).await.map(Outcome::DryRun);
        }

        logging::log_startup(
            ProcessId::current(),
            &format!("{} bootstrap in {}", config.algorithm(), config.directory().display()),
        );

        self.file_system.create_dir_all(config.directory()).await?;
        self.provision(config).await?;

        if config.algorithm().is_bench() {
            logging::log_success(ProcessId::current(), "Benchmark harness built");
            return Ok(Outcome::Provisioned);
        }

        let identity = self.resolve_identity(config)?;
        let plan = launch::build(config, &identity);
        let code = self.launch(&plan, &identity).await?;
        Ok(Outcome::Exited(code))
    }

    /// Fetch every checkout the algorithm needs, building the harness for bench
    pub async fn provision(&self, config: &InvocationConfig) -> BootstrapResult<()> {
        let steps = self.provisioning_steps(config).await?;
        for (index, step) in steps.iter().enumerate() {
            logging::log_progress(
                ProcessId::current(),
                &format!("Provisioning {}/{}", index + 1, steps.len()),
                &step.to_string(),
            );
            self.run_step(step).await?;
        }
        Ok(())
    }

    /// Steps provisioning would run, given what is already on disk
    pub async fn provisioning_steps(&self, config: &InvocationConfig) -> BootstrapResult<Vec<CommandSpec>> {
        let directory = config.directory();
        let mut steps = Vec::new();

        for checkout in repositories::checkouts_for(config.algorithm()) {
            let exists = self.file_system.exists(&checkout.path(directory)).await?;
            process_debug!(
                ProcessId::current(),
                "📦 {} is {}",
                checkout.name,
                if exists { "present, pulling" } else { "absent, cloning" }
            );
            steps.extend(repositories::fetch_steps(directory, checkout, exists));
        }

        if config.algorithm().is_bench() {
            steps.push(repositories::harness_build_step(directory));
        }
        Ok(steps)
    }

    /// Work out which peer this machine is
    pub fn resolve_identity(&self, config: &InvocationConfig) -> BootstrapResult<NodeIdentity> {
        let local = self.interfaces.local_addresses()?;
        process_debug!(ProcessId::current(), "🌐 {} local addresses", local.len());

        let identity = identity::resolve(config.peers(), &local, config.identity_policy())?;
        process_info!(
            identity.process_id(),
            "🏷️ Host: {}, IP: {}, Algorithm: {}",
            identity.name(),
            identity.address,
            config.algorithm()
        );
        Ok(identity)
    }

    /// Run the preamble, then the engine until it exits
    pub async fn launch(&self, plan: &LaunchPlan, identity: &NodeIdentity) -> BootstrapResult<i32> {
        for step in &plan.preamble {
            match step {
                PreambleStep::RemoveDir { path } => self.file_system.remove_dir_all(path).await?,
                PreambleStep::Run(command) => self.run_step(command).await?,
            }
        }

        let engine = plan.engine_command();
        logging::log_startup(&identity.process_id(), &format!("engine {}", engine.program));
        let code = self.runner.run(&engine).await?;
        logging::log_shutdown(&identity.process_id(), &format!("engine exited with status {code}"));
        Ok(code)
    }

    async fn dry_run(&self, config: &InvocationConfig) -> BootstrapResult<DryRunReport> {
        let provisioning = self.provisioning_steps(config).await?;
        if config.algorithm().is_bench() {
            return Ok(DryRunReport {
                node: None,
                provisioning,
                launch: None,
            });
        }

        let identity = self.resolve_identity(config)?;
        let plan = launch::build(config, &identity);
        Ok(DryRunReport {
            node: Some(identity),
            provisioning,
            launch: Some(plan),
        })
    }

    async fn run_step(&self, command: &CommandSpec) -> BootstrapResult<()> {
        match self.runner.run(command).await? {
            0 => Ok(()),
            code => Err(BootstrapError::StepFailed {
                step: command.to_string(),
                code,
            }),
        }
    }
}
