use std::sync::Arc;

use notelet_core::{BlockContent, BlockKind, BlockPatch, EditBuffer};
use serde_json::json;

use super::*;

async fn memory_storage() -> NoteletStorage {
    NoteletStorage::new("sqlite::memory:")
        .await
        .expect("in-memory storage")
}

#[tokio::test]
async fn block_round_trip_preserves_untouched_fields() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Notes", None).await?;

    let block = storage
        .blocks()
        .create(
            "u1",
            &page.id,
            BlockKind::Todo,
            BlockContent::Text("buy milk".into()),
            1024.0,
            json!({ "checked": false }),
        )
        .await?;

    // update only props; content and kind must survive
    let patch = BlockPatch {
        props: Some(json!({ "checked": true })),
        ..Default::default()
    };
    storage.blocks().update("u1", &block.id, patch).await?;

    let listed = storage.blocks().list("u1", &page.id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, BlockContent::Text("buy milk".into()));
    assert_eq!(listed[0].kind, BlockKind::Todo);
    assert_eq!(listed[0].props, json!({ "checked": true }));
    assert_eq!(listed[0].order, 1024.0);

    Ok(())
}

#[tokio::test]
async fn list_is_sorted_by_order_key() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Notes", None).await?;

    for order in [2048.0, 1024.0, 1536.0] {
        storage
            .blocks()
            .create(
                "u1",
                &page.id,
                BlockKind::Paragraph,
                BlockContent::Text(format!("{order}")),
                order,
                json!({}),
            )
            .await?;
    }

    let orders: Vec<f64> = storage
        .blocks()
        .list("u1", &page.id)
        .await?
        .iter()
        .map(|block| block.order)
        .collect();
    assert_eq!(orders, vec![1024.0, 1536.0, 2048.0]);

    Ok(())
}

#[tokio::test]
async fn ownership_is_rechecked_on_every_call() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("alice", "Private", None).await?;
    let block = storage
        .blocks()
        .create(
            "alice",
            &page.id,
            BlockKind::Paragraph,
            BlockContent::default(),
            1024.0,
            json!({}),
        )
        .await?;

    assert!(matches!(
        storage.blocks().list("mallory", &page.id).await,
        Err(NoteletStorageError::PageNotFound(_))
    ));
    assert!(matches!(
        storage
            .blocks()
            .update("mallory", &block.id, BlockPatch::default())
            .await,
        Err(NoteletStorageError::BlockNotFound(_))
    ));
    assert!(matches!(
        storage.blocks().delete("mallory", &block.id).await,
        Err(NoteletStorageError::BlockNotFound(_))
    ));

    // the owner deleting the page invalidates later block mutations
    storage.pages().delete("alice", &page.id).await?;
    assert!(matches!(
        storage
            .blocks()
            .update("alice", &block.id, BlockPatch::default())
            .await,
        Err(NoteletStorageError::BlockNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn second_delete_reports_not_found() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Notes", None).await?;
    let block = storage
        .blocks()
        .create(
            "u1",
            &page.id,
            BlockKind::Divider,
            BlockContent::default(),
            1024.0,
            json!({}),
        )
        .await?;

    storage.blocks().delete("u1", &block.id).await?;
    assert!(matches!(
        storage.blocks().delete("u1", &block.id).await,
        Err(NoteletStorageError::BlockNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn page_delete_cascades_through_descendants() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let root = storage.pages().create("u1", "Root", None).await?;
    let child = storage.pages().create("u1", "Child", Some(&root.id)).await?;
    let grandchild = storage.pages().create("u1", "Grandchild", Some(&child.id)).await?;

    for page_id in [&root.id, &child.id, &grandchild.id] {
        storage
            .blocks()
            .create(
                "u1",
                page_id,
                BlockKind::Paragraph,
                BlockContent::Text("body".into()),
                1024.0,
                json!({}),
            )
            .await?;
    }

    storage.pages().delete("u1", &root.id).await?;

    for page_id in [&root.id, &child.id, &grandchild.id] {
        assert!(matches!(
            storage.blocks().list("u1", page_id).await,
            Err(NoteletStorageError::PageNotFound(_))
        ));
        assert!(matches!(
            storage.pages().get("u1", page_id).await,
            Err(NoteletStorageError::PageNotFound(_))
        ));
    }

    Ok(())
}

#[tokio::test]
async fn reorder_rewrites_order_keys_only() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Notes", None).await?;

    let mut ids = Vec::new();
    for i in 0..5 {
        let block = storage
            .blocks()
            .create(
                "u1",
                &page.id,
                BlockKind::Paragraph,
                BlockContent::Text(format!("text{i}")),
                (i + 1) as f64 * 1024.0,
                json!({ "n": i }),
            )
            .await?;
        ids.push(block.id);
    }

    // move the last block to the front
    let sequence = vec![
        ids[4].clone(),
        ids[0].clone(),
        ids[1].clone(),
        ids[2].clone(),
        ids[3].clone(),
    ];
    let reordered = storage.blocks().reorder("u1", &page.id, &sequence).await?;

    let orders: Vec<f64> = reordered.iter().map(|block| block.order).collect();
    assert_eq!(orders, vec![1024.0, 2048.0, 3072.0, 4096.0, 5120.0]);
    assert_eq!(reordered[0].id, ids[4]);
    assert_eq!(reordered[0].content, BlockContent::Text("text4".into()));
    assert_eq!(reordered[0].props, json!({ "n": 4 }));

    Ok(())
}

#[tokio::test]
async fn partial_reorder_renumbers_unlisted_blocks_too() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Notes", None).await?;

    let mut ids = Vec::new();
    for i in 0..3 {
        let block = storage
            .blocks()
            .create(
                "u1",
                &page.id,
                BlockKind::Paragraph,
                BlockContent::Text(format!("text{i}")),
                (i + 1) as f64 * 1024.0,
                json!({}),
            )
            .await?;
        ids.push(block.id);
    }

    // only the moved block is named; an unknown id is skipped
    let sequence = vec![ids[2].clone(), "no-such-block".to_owned()];
    let reordered = storage.blocks().reorder("u1", &page.id, &sequence).await?;

    // unlisted blocks follow at the tail in their prior relative order,
    // with fresh keys, so nothing ties with the new sequence
    let listed_ids: Vec<&str> = reordered.iter().map(|block| block.id.as_str()).collect();
    assert_eq!(listed_ids, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
    let orders: Vec<f64> = reordered.iter().map(|block| block.order).collect();
    assert_eq!(orders, vec![1024.0, 2048.0, 3072.0]);

    Ok(())
}

#[tokio::test]
async fn media_content_survives_storage() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Media", None).await?;

    let payload = json!({
        "url": "https://cdn.example.com/clip.mp4",
        "key": "uploads/clip.mp4",
        "mimeType": "video/mp4",
        "name": "clip.mp4",
        "size": 1048576,
    });
    let content: BlockContent = serde_json::from_value(payload)?;

    let block = storage
        .blocks()
        .create("u1", &page.id, BlockKind::Video, content.clone(), 1024.0, json!({}))
        .await?;

    let listed = storage.blocks().list("u1", &page.id).await?;
    assert_eq!(listed[0].id, block.id);
    assert_eq!(listed[0].content, content);

    Ok(())
}

// the client edit buffer drives the real store through the same trait
// the mock tests use
#[tokio::test]
async fn edit_buffer_over_sqlite_storage() -> anyhow::Result<()> {
    let storage = memory_storage().await;
    let page = storage.pages().create("u1", "Shared", None).await?;

    let buffer = EditBuffer::new(Arc::new(storage.blocks().clone()), "u1", page.id.clone());
    buffer.load().await?;

    let first = buffer.insert_after(None, BlockKind::Paragraph).await?;
    assert_eq!(first.order, 1024.0);
    let second = buffer.insert_after(Some(&first.id), BlockKind::Heading).await?;
    assert_eq!(second.order, 2048.0);

    buffer
        .update_block(
            &first.id,
            BlockPatch {
                content: Some(BlockContent::Text("hello".into())),
                ..Default::default()
            },
        )
        .await;
    buffer.flush(&first.id).await;

    let persisted = storage.blocks().list("u1", &page.id).await?;
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].content, BlockContent::Text("hello".into()));

    buffer.delete_block(&second.id).await;
    assert_eq!(storage.blocks().list("u1", &page.id).await?.len(), 1);

    Ok(())
}
