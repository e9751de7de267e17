use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const UNTITLED: &str = "Untitled";
pub const NO_CONTENT: &str = "No Content Available";

/// Opaque, stable poem identifier.
///
/// Accepts both plain strings and Mongo extended JSON (`{"$oid": "..."}`) on input,
/// always serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PoemId(String);

impl PoemId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PoemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for PoemId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Number(u64),
            ObjectId {
                #[serde(rename = "$oid")]
                oid: String,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Plain(s) => PoemId(s),
            Repr::Number(n) => PoemId(n.to_string()),
            Repr::ObjectId { oid } => PoemId(oid),
        })
    }
}

/// A poem (ghazal) document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poem {
    #[serde(rename = "_id", alias = "id")]
    pub id: PoemId,
    #[serde(rename = "poetryTitle", alias = "title", default = "default_title")]
    pub title: String,
    #[serde(rename = "poetryContent", alias = "body", default = "default_body")]
    pub body: String,
}

fn default_title() -> String {
    UNTITLED.to_string()
}

fn default_body() -> String {
    NO_CONTENT.to_string()
}

impl Poem {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<PoemId>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Text the offline indexer embeds for this poem: `title + " " + body`.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Output projection of a poem search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoemMatch {
    #[serde(rename = "poetryTitle")]
    pub title: String,
    #[serde(rename = "poetryContent")]
    pub content: String,
}

impl From<Poem> for PoemMatch {
    fn from(poem: Poem) -> Self {
        Self {
            title: poem.title,
            content: poem.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poem_from_mongo_export() {
        let poem: Poem = serde_json::from_value(json!({
            "_id": {"$oid": "65f1c2a9e4b0a1b2c3d4e5f6"},
            "poetName": "Faiz",
            "poetryTitle": "Judaai",
            "poetryContent": "hijr ki raat"
        }))
        .unwrap();
        assert_eq!(poem.id.as_str(), "65f1c2a9e4b0a1b2c3d4e5f6");
        assert_eq!(poem.title, "Judaai");
        assert_eq!(poem.body, "hijr ki raat");
    }

    #[test]
    fn test_poem_missing_fields_get_placeholders() {
        let poem: Poem = serde_json::from_value(json!({"_id": "p1"})).unwrap();
        assert_eq!(poem.title, UNTITLED);
        assert_eq!(poem.body, NO_CONTENT);
    }

    #[test]
    fn test_poem_match_wire_names() {
        let m = PoemMatch::from(Poem::new("p1", "Judaai", "hijr"));
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, json!({"poetryTitle": "Judaai", "poetryContent": "hijr"}));
    }

    #[test]
    fn test_embedding_text() {
        let poem = Poem::new("p1", "Judaai", "hijr ki raat");
        assert_eq!(poem.embedding_text(), "Judaai hijr ki raat");
    }
}
