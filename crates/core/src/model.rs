use serde::{Deserialize, Serialize};

/// Backend that produced a reply (serialized as lowercase strings).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Local,
    Remote,
}

impl From<ReplySource> for String {
    fn from(val: ReplySource) -> Self {
        val.as_str().into()
    }
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match &self {
            ReplySource::Local => "local",
            ReplySource::Remote => "remote",
        }
    }
}

impl std::fmt::Display for ReplySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reply to a single message, tagged with the backend that produced it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Reply {
    pub reply: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn local(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            source: ReplySource::Local,
        }
    }

    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            source: ReplySource::Remote,
        }
    }
}
