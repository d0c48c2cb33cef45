//! In-memory runner for tests
//!
//! Records every invocation and answers from a caller-supplied closure, so
//! tests can count compile steps and assert that nothing was spawned.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use super::{Invocation, RunLimits, RunOutcome, RunStatus, Runner};

type Responder = dyn Fn(&Invocation, Option<&str>) -> Result<RunOutcome> + Send + Sync;

pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<(Invocation, Option<String>)>>,
    respond: Box<Responder>,
}

impl ScriptedRunner {
    pub(crate) fn new(
        respond: impl Fn(&Invocation, Option<&str>) -> Result<RunOutcome> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Runner that echoes stdin back on stdout and succeeds at everything
    pub(crate) fn echo() -> Self {
        Self::new(|_, stdin| Ok(exited(0, stdin.unwrap_or_default(), "")))
    }

    pub(crate) fn calls(&self) -> Vec<(Invocation, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn shell_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(inv, _)| matches!(inv, Invocation::Shell { .. }))
            .count()
    }

    pub(crate) fn spawn_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(inv, _)| matches!(inv, Invocation::Spawn(_)))
            .count()
    }
}

pub(crate) fn exited(code: i32, stdout: &str, stderr: &str) -> RunOutcome {
    RunOutcome {
        status: RunStatus::Exited(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        elapsed_ms: 1,
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        _limits: &RunLimits,
        stdin: Option<&str>,
    ) -> Result<RunOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((invocation.clone(), stdin.map(str::to_string)));
        (self.respond)(invocation, stdin)
    }
}
