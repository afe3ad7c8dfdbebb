//! Minimal backend shared by the integration tests.

use std::collections::HashMap;

use cad_monitor::{CadMonitor, CallStatus, ConfigValues, Error, Result, Termination, async_trait};

/// In-memory backend tagged with the constructor that created it.
#[derive(Default)]
pub struct StubCad {
    pub tag: String,
    pub endpoint: Option<String>,
    pub logged_in: bool,
    pub calls: Vec<CallStatus>,
    pub polls: usize,
    termination: Termination,
}

impl StubCad {
    pub fn tagged(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CadMonitor for StubCad {
    fn configure_from_values(&mut self, values: &HashMap<String, String>) -> Result<()> {
        let values = ConfigValues::new(values);
        values.ensure_known(&["endpoint"])?;
        self.endpoint = Some(values.required("endpoint")?.to_string());
        Ok(())
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.logged_in = !username.is_empty() && password == "secret";
        if self.logged_in {
            Ok(())
        } else {
            Err(Error::Authentication("rejected".into()))
        }
    }

    async fn active_calls(&mut self) -> Result<Vec<String>> {
        Ok(self.calls.iter().map(|c| c.id.clone()).collect())
    }

    async fn active_and_unassigned_calls(&mut self) -> Result<HashMap<String, CallStatus>> {
        if !self.logged_in {
            return Err(Error::LoggedOut);
        }
        self.polls += 1;
        Ok(self
            .calls
            .iter()
            .map(|c| (c.id.clone(), c.clone()))
            .collect())
    }

    async fn status(&mut self, _key: &[u8], id: &str) -> Result<CallStatus> {
        self.calls
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::CallNotFound(id.into()))
    }

    async fn status_from_url(&mut self, url: &str) -> Result<CallStatus> {
        self.calls
            .iter()
            .find(|c| c.url.as_deref() == Some(url))
            .cloned()
            .ok_or_else(|| Error::CallNotFound(url.into()))
    }

    async fn cleared_calls(&mut self, _date: &str) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    fn set_debug(&mut self, _debug: bool) {}

    async fn keep_alive(&mut self) -> Result<()> {
        if self.logged_in { Ok(()) } else { Err(Error::LoggedOut) }
    }

    fn termination(&self) -> &Termination {
        &self.termination
    }
}
