use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Identifier of a task, assigned by the repository on creation.
///
/// The core never inspects its contents; stores are free to pick any scheme.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap a store-issued identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_roundtrip() {
        let parsed: TaskId = "0190f1d2-aaaa".parse().unwrap_or_else(|err| match err {});
        assert_eq!(parsed.as_str(), "0190f1d2-aaaa");
        assert_eq!(parsed.to_string(), "0190f1d2-aaaa");
    }

    #[test]
    fn task_id_serializes_as_plain_string() {
        let id = TaskId::new("abc");
        let json = serde_json::to_string(&id).unwrap_or_else(|err| panic!("must serialize: {err}"));
        assert_eq!(json, "\"abc\"");
    }
}
