//! Portable rich text blocks
//!
//! A post body is an ordered list of blocks tagged by `_type`. Known tags
//! decode into typed variants. Anything else, including a known tag whose
//! payload does not decode, is kept as [`Block::Unknown`] with its raw JSON so
//! one bad block never fails the whole body.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::post::null_as_default;

/// One top-level block of a post body
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    Unknown(UnknownNode),
}

impl Block {
    /// Decode a block from its JSON value, falling back to `Unknown`
    pub fn from_value(raw: Value) -> Self {
        let type_name = type_name_of(&raw);
        let decoded = match type_name.as_str() {
            "block" => Some(TextBlock::deserialize(&raw).map(Block::Text)),
            "image" => Some(ImageBlock::deserialize(&raw).map(Block::Image)),
            _ => None,
        };

        match decoded {
            Some(Ok(block)) => block,
            Some(Err(e)) => {
                tracing::debug!("Keeping undecodable {:?} block as unknown: {}", type_name, e);
                Block::Unknown(UnknownNode { type_name, raw })
            }
            None => Block::Unknown(UnknownNode { type_name, raw }),
        }
    }

    /// The list this block belongs to, if it is a list item
    pub fn list_item(&self) -> Option<(&ListKind, u32)> {
        match self {
            Block::Text(text) => text.list_item.as_ref().map(|kind| (kind, text.level())),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Block::from_value)
    }
}

/// A node whose type this application does not render natively
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownNode {
    pub type_name: String,
    pub raw: Value,
}

impl UnknownNode {
    /// Serialized form shown in the visible fallback
    pub fn debug_json(&self) -> String {
        serde_json::to_string(&self.raw).unwrap_or_else(|_| format!("{{\"_type\":{:?}}}", self.type_name))
    }
}

fn type_name_of(raw: &Value) -> String {
    raw.get("_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A text block: paragraph, heading, quote or list item
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default, rename = "_key")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: BlockStyle,
    #[serde(default)]
    pub list_item: Option<ListKind>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Inline>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    /// Nesting level of a list item (1-based)
    pub fn level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }

    /// The text spans of this block, skipping inline objects
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.children.iter().filter_map(|child| match child {
            Inline::Span(span) => Some(span),
            Inline::Unknown(_) => None,
        })
    }

    /// Resolve a mark key against this block's annotation definitions
    pub fn resolve_mark(&self, key: &str) -> Mark {
        Mark::resolve(key, &self.mark_defs)
    }
}

/// Structural style of a text block
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum BlockStyle {
    #[default]
    Normal,
    Heading(u8),
    Blockquote,
    Other(String),
}

impl From<String> for BlockStyle {
    fn from(style: String) -> Self {
        match style.as_str() {
            "normal" => BlockStyle::Normal,
            "h1" => BlockStyle::Heading(1),
            "h2" => BlockStyle::Heading(2),
            "h3" => BlockStyle::Heading(3),
            "h4" => BlockStyle::Heading(4),
            "h5" => BlockStyle::Heading(5),
            "h6" => BlockStyle::Heading(6),
            "blockquote" => BlockStyle::Blockquote,
            _ => BlockStyle::Other(style),
        }
    }
}

/// List type of a list item block
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ListKind {
    Bullet,
    Number,
    Other(String),
}

impl From<String> for ListKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "bullet" => ListKind::Bullet,
            "number" => ListKind::Number,
            _ => ListKind::Other(kind),
        }
    }
}

/// A child of a text block
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Span(Span),
    Unknown(UnknownNode),
}

impl<'de> Deserialize<'de> for Inline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let type_name = type_name_of(&raw);
        if type_name == "span" {
            if let Ok(span) = Span::deserialize(&raw) {
                return Ok(Inline::Span(span));
            }
        }
        Ok(Inline::Unknown(UnknownNode { type_name, raw }))
    }
}

/// A run of text with the marks applied to it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Span {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

/// Annotation definition referenced from span marks by `_key`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A resolved inline mark
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Underline,
    StrikeThrough,
    Link { href: String },
    Unknown(String),
}

impl Mark {
    /// Resolve a span mark: annotation keys first, then decorator names
    pub fn resolve(key: &str, defs: &[MarkDef]) -> Mark {
        if let Some(def) = defs.iter().find(|def| def.key == key) {
            return match (def.kind.as_str(), def.fields.get("href").and_then(Value::as_str)) {
                ("link", Some(href)) => Mark::Link {
                    href: href.to_string(),
                },
                _ => Mark::Unknown(def.kind.clone()),
            };
        }

        match key {
            "strong" => Mark::Strong,
            "em" => Mark::Emphasis,
            "code" => Mark::Code,
            "underline" => Mark::Underline,
            "strike-through" => Mark::StrikeThrough,
            other => Mark::Unknown(other.to_string()),
        }
    }
}

/// An image block
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub asset: Option<AssetReference>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageBlock {
    /// The asset reference, if the block carries one
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset
            .as_ref()
            .and_then(|asset| asset.reference.as_deref())
            .filter(|r| !r.is_empty())
    }

    /// Alt text, if present and non-blank
    pub fn alt_text(&self) -> Option<&str> {
        self.alt.as_deref().map(str::trim).filter(|alt| !alt.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetReference {
    #[serde(default, rename = "_ref")]
    pub reference: Option<String>,
}
