use std::collections::BTreeMap;

/// State of a single dispatched call as reported by a CAD backend.
///
/// Only `id` is mandatory. Everything else is filled in as far as the backend
/// knows it; vendor specific values go to `attributes`.
///
/// Two statuses compare equal when every field matches, which is what the
/// polling loop uses to decide whether a call was updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallStatus {
    pub id: String,
    pub url: Option<String>,
    pub incident: Option<String>,
    pub call_type: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub units: Vec<String>,
    pub narratives: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl CallStatus {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_incident(mut self, incident: impl Into<String>) -> Self {
        self.incident = Some(incident.into());
        self
    }

    pub fn with_call_type(mut self, call_type: impl Into<String>) -> Self {
        self.call_type = Some(call_type.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Append an assigned unit.
    pub fn add_unit(mut self, unit: impl Into<String>) -> Self {
        self.units.push(unit.into());
        self
    }

    pub fn add_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narratives.push(narrative.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// A call with no unit attached yet.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.units.is_empty()
    }
}
