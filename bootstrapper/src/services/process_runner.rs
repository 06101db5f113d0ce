//! Real process runner implementation
//!
//! Spawns each command with the inherited environment plus its own
//! variables, relays merged output and blocks until the child exits.
//! While waiting, SIGINT and SIGTERM are passed on to the child instead of
//! killing the bootstrapper out from under it.

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

use super::output::spawn_output_forwarders;
use crate::core::CommandSpec;
use crate::error::{BootstrapError, BootstrapResult};
use crate::traits::ProcessRunner;
use shared::{process_debug, ProcessId};

/// Exit code reported when the platform gives neither a code nor a signal
const UNKNOWN_EXIT_CODE: i32 = 1;

/// Real process runner backed by tokio
#[derive(Debug, Default)]
pub struct RealProcessRunner;

impl RealProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProcessRunner for RealProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> BootstrapResult<i32> {
        process_debug!(ProcessId::current(), "▶️ {} (in {})", spec, spec.cwd.display());

        let mut child = Self::command(spec).spawn().map_err(|source| BootstrapError::SpawnFailed {
            program: spec.program.clone(),
            source,
        })?;

        let forwarders = spawn_output_forwarders(&mut child);
        let status = wait_forwarding_signals(&mut child).await?;
        for forwarder in forwarders {
            let _ = forwarder.await;
        }

        let code = exit_code(status);
        process_debug!(ProcessId::current(), "⏹️ {} exited with {}", spec.program, code);
        Ok(code)
    }
}

#[cfg(unix)]
async fn wait_forwarding_signals(child: &mut Child) -> std::io::Result<ExitStatus> {
    use nix::sys::signal::Signal;
    use tokio::signal::unix::{signal, SignalKind};

    let pid = child.id();
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            status = child.wait() => return status,
            _ = interrupt.recv() => forward_signal(pid, Signal::SIGINT),
            _ = terminate.recv() => forward_signal(pid, Signal::SIGTERM),
        }
    }
}

#[cfg(not(unix))]
async fn wait_forwarding_signals(child: &mut Child) -> std::io::Result<ExitStatus> {
    child.wait().await
}

#[cfg(unix)]
fn forward_signal(pid: Option<u32>, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    use shared::process_warn;

    let Some(pid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    process_debug!(ProcessId::current(), "📨 Forwarding {} to child {}", signal, pid);
    if let Err(err) = kill(Pid::from_raw(pid), signal) {
        process_warn!(ProcessId::current(), "⚠️ Could not forward {} to {}: {}", signal, pid, err);
    }
}

/// Exit code, or `128 + signal` for a child killed by a signal
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    UNKNOWN_EXIT_CODE
}
