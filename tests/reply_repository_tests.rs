use canned_replies::RepliesError;
use canned_replies::replies::{self, PLUGIN_NAME, ReplyRepositoryHandle, STORE_NAME, SeedReply};
use canned_replies::store::{MemoryPluginStore, PluginStore};
use serde_json::json;
use std::sync::Arc;

fn seed() -> SeedReply {
    SeedReply {
        title: "Seed title".to_string(),
        content: "Seed body".to_string(),
    }
}

async fn repository() -> (ReplyRepositoryHandle, Arc<MemoryPluginStore>) {
    let store = Arc::new(MemoryPluginStore::new());
    let handle = replies::spawn(store.clone(), seed())
        .await
        .expect("failed to spawn reply repository");
    (handle, store)
}

#[tokio::test]
async fn add_then_get_returns_matching_record_with_fresh_id() {
    let (repo, _store) = repository().await;

    let first = repo.add("T1".into(), "C1".into()).await.unwrap();
    let second = repo.add("T2".into(), "C2".into()).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.usages, None);

    let fetched = repo.get(first.id.clone()).await.unwrap().expect("reply");
    assert_eq!(fetched.title, "T1");
    assert_eq!(fetched.content, "C1");
    assert_eq!(fetched, first);
}

#[tokio::test]
async fn remove_then_get_is_not_found() {
    let (repo, _store) = repository().await;

    let keep = repo.add("keep".into(), "k".into()).await.unwrap();
    let gone = repo.add("gone".into(), "g".into()).await.unwrap();

    let removed = repo.remove(gone.id.clone()).await.unwrap();
    assert_eq!(removed, Some(gone.clone()));
    assert!(repo.get(gone.id.clone()).await.unwrap().is_none());
    assert!(repo.get(keep.id).await.unwrap().is_some());

    // Removing again is not an error.
    assert_eq!(repo.remove(gone.id).await.unwrap(), None);
}

#[tokio::test]
async fn edit_keeps_id_but_resets_usages() {
    let (repo, store) = repository().await;

    let reply = repo.add("old".into(), "old body".into()).await.unwrap();
    repo.record_use(reply.id.clone()).await.unwrap();
    repo.record_use(reply.id.clone()).await.unwrap();

    let edited = repo
        .edit(reply.id.clone(), "new".into(), "new body".into())
        .await
        .unwrap();
    assert_eq!(edited.id, reply.id);
    assert_eq!(edited.title, "new");
    assert_eq!(edited.content, "new body");
    assert_eq!(edited.usages, None);

    let stored = store
        .get(PLUGIN_NAME, STORE_NAME)
        .await
        .unwrap()
        .expect("stored replies");
    assert_eq!(
        stored[reply.id.as_str()],
        json!({"id": reply.id, "title": "new", "content": "new body"})
    );
}

#[tokio::test]
async fn edit_of_unknown_id_inserts_it() {
    let (repo, _store) = repository().await;

    let edited = repo
        .edit("missing".into(), "T".into(), "C".into())
        .await
        .unwrap();
    assert_eq!(edited.id, "missing");
    assert_eq!(repo.get("missing".into()).await.unwrap(), Some(edited));
}

#[tokio::test]
async fn record_use_counts_every_call() {
    let (repo, store) = repository().await;

    let reply = repo.add("T".into(), "C".into()).await.unwrap();
    for n in 1..=5u64 {
        let updated = repo.record_use(reply.id.clone()).await.unwrap();
        assert_eq!(updated.usages, Some(n));
    }

    let stored = store.get(PLUGIN_NAME, STORE_NAME).await.unwrap().unwrap();
    assert_eq!(stored[reply.id.as_str()]["usages"], json!(5));
}

#[tokio::test]
async fn record_use_of_unknown_id_is_not_found_and_writes_nothing() {
    let (repo, store) = repository().await;

    let err = repo.record_use("nope".into()).await.unwrap_err();
    assert!(matches!(err, RepliesError::ReplyNotFound(id) if id == "nope"));
    assert!(store.get(PLUGIN_NAME, STORE_NAME).await.unwrap().is_none());
}

#[tokio::test]
async fn all_is_sorted_by_title() {
    let (repo, _store) = repository().await;

    for title in ["banana", "Cherry", "apple", "", "banana"] {
        repo.add(title.into(), "body".into()).await.unwrap();
    }

    let titles: Vec<String> = repo
        .all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["", "Cherry", "apple", "banana", "banana"]);
    assert!(titles.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn empty_store_is_seeded_exactly_once() {
    let (repo, store) = repository().await;

    let first = repo.all().await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].title, "Seed title");
    assert_eq!(first[0].content, "Seed body");

    let second = repo.all().await.unwrap();
    assert_eq!(second, first);

    let stored = store.get(PLUGIN_NAME, STORE_NAME).await.unwrap().unwrap();
    assert_eq!(stored.as_object().map(serde_json::Map::len), Some(1));
}

#[tokio::test]
async fn get_on_empty_store_seeds_as_a_side_effect() {
    let (repo, _store) = repository().await;

    assert!(repo.get("anything".into()).await.unwrap().is_none());
    assert_eq!(repo.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_adds_are_not_lost() {
    let (repo, store) = repository().await;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.add(format!("t{i:02}"), "c".into()).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stored = store.get(PLUGIN_NAME, STORE_NAME).await.unwrap().unwrap();
    assert_eq!(stored.as_object().map(serde_json::Map::len), Some(20));
}

#[tokio::test]
async fn reads_records_written_by_other_tools() {
    let store = Arc::new(MemoryPluginStore::new());
    store
        .set(
            PLUGIN_NAME,
            STORE_NAME,
            json!({
                "b": {"id": "b", "title": "Zed", "content": "z", "usages": 3},
                "a": {"id": "a", "content": "untitled"},
                "n": {"id": "n", "title": null, "content": "null title"}
            }),
        )
        .await
        .unwrap();
    let repo = replies::spawn(store.clone(), seed()).await.unwrap();

    let all = repo.all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "");
    assert_eq!(all[1].title, "");
    assert_eq!(all[2].id, "b");
    assert_eq!(all[2].usages, Some(3));

    let untitled = repo.get("n".into()).await.unwrap().expect("reply");
    assert_eq!(untitled.title, "");
    assert_eq!(untitled.content, "null title");

    // Writes keep working and normalize the null title.
    let used = repo.record_use("n".into()).await.unwrap();
    assert_eq!(used.usages, Some(1));
    let stored = store.get(PLUGIN_NAME, STORE_NAME).await.unwrap().unwrap();
    assert_eq!(stored["n"]["title"], json!(""));
}
