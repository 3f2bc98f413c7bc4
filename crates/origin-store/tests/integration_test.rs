use origin_store::{
    ChangeKind, RecordClient, StorageActor, StorageClient, StorageError, StorageScope,
    StoredRecord, TabId,
};
use serde::{Deserialize, Serialize};

// --- Test Record ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Banner {
    headline: String,
    shown_count: u32,
}

impl StoredRecord for Banner {
    const KEY: &'static str = "banner";
    const SCOPE: StorageScope = StorageScope::Durable;
}

struct BannerClient {
    storage: StorageClient,
}

impl RecordClient<Banner> for BannerClient {
    type Error = StorageError;

    fn storage(&self) -> &StorageClient {
        &self.storage
    }

    fn map_error(e: StorageError) -> Self::Error {
        e
    }
}

// --- Tests ---

#[tokio::test]
async fn test_store_full_lifecycle_across_tabs() {
    let (actor, origin) = StorageActor::new(StorageScope::Durable, 10);
    let handle = tokio::spawn(actor.run());

    let tab_one = BannerClient {
        storage: origin.for_tab(TabId(1)),
    };
    let tab_two = BannerClient {
        storage: origin.for_tab(TabId(2)),
    };
    let mut tab_two_events = tab_two.storage.subscribe();

    // 1. Tab one writes
    let banner = Banner {
        headline: "Free delivery".into(),
        shown_count: 1,
    };
    tab_one.save(&banner).await.unwrap();

    // 2. Tab two is notified and re-reads
    let event = tab_two_events.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Set);
    assert_eq!(event.source, TabId(1));
    assert!(event.touches(Banner::KEY));
    assert_eq!(tab_two.load().await.unwrap(), Some(banner.clone()));

    // 3. Persisted layout is the camelCase JSON
    let raw = origin.get(Banner::KEY).await.unwrap().unwrap();
    assert_eq!(raw, r#"{"headline":"Free delivery","shownCount":1}"#);

    // 4. Last write wins
    let newer = Banner {
        shown_count: 2,
        ..banner
    };
    tab_two.save(&newer).await.unwrap();
    assert_eq!(tab_one.load().await.unwrap(), Some(newer));

    // 5. Delete
    assert!(tab_one.delete().await.unwrap());
    assert_eq!(tab_two.load().await.unwrap(), None);
    assert!(!tab_two.delete().await.unwrap());

    drop(tab_one);
    drop(tab_two);
    drop(origin);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_malformed_record_is_a_read_error() {
    let (actor, storage) = StorageActor::new(StorageScope::Durable, 4);
    tokio::spawn(actor.run());

    storage.set(Banner::KEY, "{\"headline\":".to_string()).await.unwrap();

    let client = BannerClient { storage };
    let err = client.load().await.unwrap_err();
    assert!(err.is_read_error(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_record_refuses_the_wrong_store() {
    let (actor, storage) = StorageActor::new(StorageScope::Session, 4);
    tokio::spawn(actor.run());

    let client = BannerClient { storage };
    let err = client
        .save(&Banner {
            headline: "x".into(),
            shown_count: 0,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::ScopeMismatch {
            key: "banner",
            expected: StorageScope::Durable,
            actual: StorageScope::Session,
        }
    ));
}

#[tokio::test]
async fn test_closed_store_reports_closed() {
    let (actor, storage) = StorageActor::new(StorageScope::Session, 4);
    drop(actor);

    let result = storage.get("anything").await;
    assert!(matches!(result, Err(StorageError::StoreClosed)));
}
