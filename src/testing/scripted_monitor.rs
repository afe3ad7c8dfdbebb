use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::{CadMonitor, CallStatus, ConfigValues, Error, Result, Termination};

enum Step {
    Snapshot(HashMap<String, CallStatus>),
    Fail(Error),
}

/// A [`CadMonitor`] serving scripted poll results.
///
/// Each call to [`active_and_unassigned_calls`](CadMonitor::active_and_unassigned_calls)
/// consumes the next scripted step: a snapshot becomes the current set of
/// calls, a failure is returned once. With the script exhausted the current
/// snapshot is served again. Every other query reads the current snapshot.
///
/// Configuration keys: `username`, `password` (both required), `debug`.
/// Unknown keys are ignored.
///
/// All queries need a session opened by [`login`](CadMonitor::login) and fail
/// with [`Error::LoggedOut`] otherwise.
#[derive(Default)]
pub struct ScriptedMonitor {
    username: Option<String>,
    password: Option<String>,
    session: Option<Uuid>,
    debug: bool,
    termination: Termination,
    script: VecDeque<Step>,
    current: HashMap<String, CallStatus>,
    cleared: HashMap<String, HashMap<String, String>>,
    last_key: Option<Vec<u8>>,
    polls: usize,
    keep_alives: usize,
}

impl ScriptedMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    /// Record a call as cleared on `date`.
    pub fn with_cleared(mut self, date: &str, id: &str, descriptor: &str) -> Self {
        self.cleared
            .entry(date.to_string())
            .or_default()
            .insert(id.to_string(), descriptor.to_string());
        self
    }

    /// Queue the set of calls served by the next poll.
    pub fn push_snapshot(&mut self, calls: impl IntoIterator<Item = CallStatus>) {
        let snapshot = calls.into_iter().map(|c| (c.id.clone(), c)).collect();
        self.script.push_back(Step::Snapshot(snapshot));
    }

    /// Queue an error returned by the next poll.
    pub fn push_failure(&mut self, error: Error) {
        self.script.push_back(Step::Fail(error));
    }

    /// Drop the session as a backend would on timeout.
    pub fn expire_session(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Option<Uuid> {
        self.session
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Number of polls served, failures included.
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn keep_alives(&self) -> usize {
        self.keep_alives
    }

    /// Correlation key of the last [`status`](CadMonitor::status) lookup.
    pub fn last_key(&self) -> Option<&[u8]> {
        self.last_key.as_deref()
    }

    fn ensure_session(&self) -> Result<Uuid> {
        self.session.ok_or(Error::LoggedOut)
    }
}

#[async_trait]
impl CadMonitor for ScriptedMonitor {
    fn configure_from_values(&mut self, values: &HashMap<String, String>) -> Result<()> {
        let values = ConfigValues::new(values);
        self.username = Some(values.required("username")?.to_string());
        self.password = Some(values.required("password")?.to_string());
        self.debug = values.flag("debug")?;
        Ok(())
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let (Some(expected_user), Some(expected_pass)) = (&self.username, &self.password) else {
            return Err(Error::Authentication("no credentials configured".into()));
        };
        if expected_user != username || expected_pass != password {
            self.session = None;
            return Err(Error::Authentication("invalid username or password".into()));
        }
        let session = Uuid::new_v4();
        if self.debug {
            debug!(%session, user = username, "Scripted CAD session opened");
        }
        self.session = Some(session);
        Ok(())
    }

    async fn active_calls(&mut self) -> Result<Vec<String>> {
        self.ensure_session()?;
        let mut calls: Vec<String> = self
            .current
            .values()
            .map(|c| c.url.clone().unwrap_or_else(|| c.id.clone()))
            .collect();
        calls.sort_unstable();
        Ok(calls)
    }

    async fn active_and_unassigned_calls(&mut self) -> Result<HashMap<String, CallStatus>> {
        self.ensure_session()?;
        self.polls += 1;
        match self.script.pop_front() {
            Some(Step::Snapshot(snapshot)) => self.current = snapshot,
            Some(Step::Fail(error)) => return Err(error),
            None => {}
        }
        Ok(self.current.clone())
    }

    async fn status(&mut self, key: &[u8], id: &str) -> Result<CallStatus> {
        self.ensure_session()?;
        self.last_key = Some(key.to_vec());
        self.current
            .get(id)
            .cloned()
            .ok_or_else(|| Error::CallNotFound(id.into()))
    }

    async fn status_from_url(&mut self, url: &str) -> Result<CallStatus> {
        self.ensure_session()?;
        self.current
            .values()
            .find(|c| c.url.as_deref() == Some(url))
            .cloned()
            .ok_or_else(|| Error::CallNotFound(url.into()))
    }

    async fn cleared_calls(&mut self, date: &str) -> Result<HashMap<String, String>> {
        self.ensure_session()?;
        Ok(self.cleared.get(date).cloned().unwrap_or_default())
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    async fn keep_alive(&mut self) -> Result<()> {
        self.ensure_session()?;
        self.keep_alives += 1;
        Ok(())
    }

    fn termination(&self) -> &Termination {
        &self.termination
    }
}
