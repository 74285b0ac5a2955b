use serde::{Deserialize, Serialize};

/// An 8-K filing as produced by a filing source or the simulator.
///
/// Accepts `id`, `filingId` or both on input; `id` wins when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FilingWire")]
pub struct Filing {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilingWire {
    id: Option<String>,
    filing_id: Option<String>,
    #[serde(default)]
    content: String,
    company: Option<String>,
    date: Option<String>,
    event_type: Option<String>,
    event_description: Option<String>,
    url: Option<String>,
    timestamp: Option<String>,
}

impl TryFrom<FilingWire> for Filing {
    type Error = String;

    fn try_from(wire: FilingWire) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.filing_id)
            .ok_or_else(|| "missing field `id`".to_string())?;
        Ok(Self {
            id,
            content: wire.content,
            company: wire.company,
            date: wire.date,
            event_type: wire.event_type,
            event_description: wire.event_description,
            url: wire.url,
            timestamp: wire.timestamp,
        })
    }
}

impl Filing {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            company: None,
            date: None,
            event_type: None,
            event_description: None,
            url: None,
            timestamp: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Build the broadcast payload for this filing
    pub fn summarized(&self, summary: impl Into<String>) -> FilingSummary {
        FilingSummary {
            filing_id: self.id.clone(),
            summary: summary.into(),
            company: self.company.clone(),
            date: self.date.clone(),
            event_type: self.event_type.clone(),
        }
    }
}

/// Payload fanned out to WebSocket clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingSummary {
    pub filing_id: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}
