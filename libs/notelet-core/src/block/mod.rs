use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::NoteletError;

/// Closed enumeration of block flavours. The wire names are the
/// camelCase strings the editor sends; anything else is rejected at
/// the deserialization boundary instead of silently no-op'ing later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    Todo,
    Code,
    Image,
    Video,
    Pdf,
    Divider,
    Quote,
    Callout,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::Todo => "todo",
            Self::Code => "code",
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Divider => "divider",
            Self::Quote => "quote",
            Self::Callout => "callout",
        }
    }

    /// Media flavours carry an externally stored file in `content`.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Pdf)
    }
}

impl FromStr for BlockKind {
    type Err = NoteletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(JsonValue::String(s.into()))
            .map_err(|_| NoteletError::Validation(format!("unknown block kind: {s}")))
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload collaborator payload, stored verbatim and treated as opaque.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    pub key: String,
    pub mime_type: String,
    pub name: String,
    pub size: i64,
}

/// Block payload: serialized rich-text markup, or a file descriptor
/// for media flavours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    Media(FileRef),
    Text(String),
}

impl Default for BlockContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A single typed content unit belonging to exactly one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub page_id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: BlockContent,
    pub props: JsonValue,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update carrier: only the fields present overwrite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.kind.is_none() && self.props.is_none() && self.order.is_none()
    }

    /// Merge into a block, leaving absent fields untouched.
    pub fn apply(&self, block: &mut Block) {
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        if let Some(kind) = self.kind {
            block.kind = kind;
        }
        if let Some(props) = &self.props {
            block.props = props.clone();
        }
        if let Some(order) = self.order {
            block.order = order;
        }
    }

    /// Full snapshot of a block's mutable payload, the shape a
    /// debounced save carries at timer-fire time.
    pub fn snapshot(block: &Block) -> Self {
        Self {
            content: Some(block.content.clone()),
            kind: Some(block.kind),
            props: Some(block.props.clone()),
            order: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Pages exist here only as the foreign-key and ownership boundary
/// for blocks; the page tree itself is an external collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub owner_id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub icon: Option<String>,
    pub cover: Cover,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn kind_wire_names() {
        assert_eq!(serde_json::to_value(BlockKind::BulletList).unwrap(), json!("bulletList"));
        assert_eq!(BlockKind::from_str("orderedList").unwrap(), BlockKind::OrderedList);
        assert_eq!(BlockKind::Callout.as_str(), "callout");
        assert!(BlockKind::from_str("table").is_err());
    }

    #[test]
    fn media_kinds() {
        assert!(BlockKind::Image.is_media());
        assert!(BlockKind::Pdf.is_media());
        assert!(!BlockKind::Quote.is_media());
    }

    #[test]
    fn content_is_text_or_file() {
        let text: BlockContent = serde_json::from_value(json!("<p>hello</p>")).unwrap();
        assert_eq!(text, BlockContent::Text("<p>hello</p>".into()));

        let media: BlockContent = serde_json::from_value(json!({
            "url": "https://cdn.example.com/a.png",
            "key": "uploads/a.png",
            "mimeType": "image/png",
            "name": "a.png",
            "size": 1234,
        }))
        .unwrap();
        match media {
            BlockContent::Media(file) => {
                assert_eq!(file.mime_type, "image/png");
                assert_eq!(file.size, 1234);
            }
            _ => panic!("expected media payload"),
        }
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut block = Block {
            id: "b1".into(),
            page_id: "p1".into(),
            kind: BlockKind::Paragraph,
            content: BlockContent::Text("hello".into()),
            props: json!({ "checked": false }),
            order: 1024.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let patch: BlockPatch = serde_json::from_value(json!({ "props": { "checked": true } })).unwrap();
        assert!(!patch.is_empty());
        patch.apply(&mut block);

        assert_eq!(block.content, BlockContent::Text("hello".into()));
        assert_eq!(block.kind, BlockKind::Paragraph);
        assert_eq!(block.props, json!({ "checked": true }));
        assert_eq!(block.order, 1024.0);
    }

    #[test]
    fn empty_patch() {
        let patch: BlockPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
    }
}
