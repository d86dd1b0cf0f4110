use serde::{Deserialize, Serialize};

/// One rich embed as Discord's message API expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embed {
    #[serde(rename = "type")]
    pub kind: String,
    pub author: EmbedAuthor,
    pub color: u32,
    pub title: String,
    pub description: String,
    pub url: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}
