use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use validator::Validate;

/// One dashboard tile's query, as sent by the extension.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QueryDescriptor {
    pub title: String,
    /// Free-form note attached to the tile; often empty.
    #[serde(default)]
    pub note_text: Option<String>,
    #[serde(rename = "queryBody")]
    pub query_body: QueryBody,
    /// Result rows, passed to the model verbatim.
    #[serde(rename = "queryData")]
    pub query_data: Value,
}

impl QueryDescriptor {
    /// The note, if present and not blank.
    pub fn note(&self) -> Option<&str> {
        self.note_text
            .as_deref()
            .filter(|note| !note.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryBody {
    pub fields: QueryFields,
}

/// Looker sends the field list as an array; older callers send one string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QueryFields {
    List(Vec<String>),
    Text(String),
}

impl fmt::Display for QueryFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFields::List(fields) => f.write_str(&fields.join(", ")),
            QueryFields::Text(fields) => f.write_str(fields),
        }
    }
}
