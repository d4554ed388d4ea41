//! Merging remote `block_updated` events into local state.
//!
//! Last-writer-wins at block granularity, with two suppression rules:
//! tombstoned ids are gone and stay gone, and a block the user is
//! actively editing is never stomped mid-keystroke. There is no
//! operational-transform merge -- if both sides edit concurrently, the
//! focused side's next save overwrites the remote change. Session-local
//! focus is the only arbitration signal.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{
    block::{Block, BlockContent, BlockKind},
    buffer::TombstoneSet,
};

/// Payload of an incoming `block_updated` broadcast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUpdate {
    pub block_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<JsonValue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Remote fields were merged into the local block.
    Applied,
    /// The block id is tombstoned locally; the update was dropped.
    SuppressedTombstone,
    /// The local editing surface holds focus on this block; the update
    /// was dropped and the local state will win on the next save.
    SuppressedFocus,
    /// No such block in local state; concurrent deletion, no-op.
    Missing,
}

/// Decide whether a remote update may overwrite local state, and merge
/// it field-by-field if so. A remote apply never arms a save timer:
/// the sender already owns persistence of its own edit.
pub fn reconcile(
    blocks: &mut [Block],
    tombstones: &mut TombstoneSet,
    focused: Option<&str>,
    update: &RemoteUpdate,
) -> ReconcileOutcome {
    if tombstones.contains(&update.block_id) {
        return ReconcileOutcome::SuppressedTombstone;
    }

    if focused == Some(update.block_id.as_str()) {
        return ReconcileOutcome::SuppressedFocus;
    }

    let Some(block) = blocks.iter_mut().find(|block| block.id == update.block_id) else {
        return ReconcileOutcome::Missing;
    };

    if let Some(content) = &update.content {
        block.content = content.clone();
    }
    if let Some(kind) = update.kind {
        block.kind = kind;
    }
    if let Some(props) = &update.props {
        block.props = props.clone();
    }

    ReconcileOutcome::Applied
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn paragraph(id: &str, text: &str) -> Block {
        Block {
            id: id.into(),
            page_id: "p1".into(),
            kind: BlockKind::Paragraph,
            content: BlockContent::Text(text.into()),
            props: json!({}),
            order: 1024.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn remote(id: &str, text: &str) -> RemoteUpdate {
        RemoteUpdate {
            block_id: id.into(),
            content: Some(BlockContent::Text(text.into())),
            kind: None,
            props: None,
        }
    }

    #[tokio::test]
    async fn applies_to_unfocused_blocks() {
        let mut blocks = vec![paragraph("b1", "old")];
        let mut tombstones = TombstoneSet::default();

        let outcome = reconcile(&mut blocks, &mut tombstones, None, &remote("b1", "new"));

        assert_eq!(outcome, ReconcileOutcome::Applied);
        assert_eq!(blocks[0].content, BlockContent::Text("new".into()));
        // untouched fields keep their values
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
    }

    #[tokio::test]
    async fn focus_suppresses_remote_update() {
        let mut blocks = vec![paragraph("b1", "mine")];
        let mut tombstones = TombstoneSet::default();

        let outcome = reconcile(&mut blocks, &mut tombstones, Some("b1"), &remote("b1", "theirs"));

        assert_eq!(outcome, ReconcileOutcome::SuppressedFocus);
        assert_eq!(blocks[0].content, BlockContent::Text("mine".into()));
    }

    #[tokio::test]
    async fn released_focus_does_not_resurrect_suppressed_value() {
        let mut blocks = vec![paragraph("b1", "mine")];
        let mut tombstones = TombstoneSet::default();

        reconcile(&mut blocks, &mut tombstones, Some("b1"), &remote("b1", "theirs"));

        // focus released; the suppressed remote value is gone for good,
        // local wins per the last-writer-wins model
        assert_eq!(blocks[0].content, BlockContent::Text("mine".into()));

        let outcome = reconcile(&mut blocks, &mut tombstones, None, &remote("b1", "later"));
        assert_eq!(outcome, ReconcileOutcome::Applied);
        assert_eq!(blocks[0].content, BlockContent::Text("later".into()));
    }

    #[tokio::test]
    async fn tombstoned_and_missing_ids_are_noops() {
        let mut blocks = vec![paragraph("b1", "text")];
        let mut tombstones = TombstoneSet::default();
        tombstones.insert("b1");

        assert_eq!(
            reconcile(&mut blocks, &mut tombstones, None, &remote("b1", "x")),
            ReconcileOutcome::SuppressedTombstone
        );
        assert_eq!(blocks[0].content, BlockContent::Text("text".into()));

        assert_eq!(
            reconcile(&mut blocks, &mut tombstones, None, &remote("gone", "x")),
            ReconcileOutcome::Missing
        );
    }

    #[test]
    fn wire_shape() {
        let update: RemoteUpdate = serde_json::from_value(json!({
            "blockId": "b1",
            "content": "abc",
            "type": "todo",
            "props": { "checked": true },
        }))
        .unwrap();
        assert_eq!(update.kind, Some(BlockKind::Todo));
        assert_eq!(update.content, Some(BlockContent::Text("abc".into())));
    }
}
