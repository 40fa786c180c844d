use serde::{Deserialize, Serialize};

/// A channel together with the number of documents it holds.
///
/// Derived at query time; nothing about a channel is stored besides its
/// documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    pub document_count: u64,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, document_count: u64) -> Self {
        Self {
            name: name.into(),
            document_count,
        }
    }
}

impl std::fmt::Display for ChannelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} documents)", self.name, self.document_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_count() {
        let info = ChannelInfo::new("myapp", 3);
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"name":"myapp","document_count":3}"#);
    }

    #[test]
    fn display() {
        assert_eq!(ChannelInfo::new("a", 2).to_string(), "a (2 documents)");
    }
}
