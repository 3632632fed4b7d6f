//! MongoEventRepository against a real MongoDB (testcontainers)
//!
//! Run with `cargo test -p domain_events -- --ignored`.

use domain_events::*;
use test_utils::{TestDataBuilder, TestMongo, assertions::assert_some};

fn new_event(builder: &TestDataBuilder, suffix: &str) -> NewEvent {
    NewEvent {
        name: builder.name("event", suffix),
        description: None,
        owner_id: builder.owner_id(),
        start_time: 100,
        duration: 15,
        is_solved: false,
        notification_id: None,
    }
}

#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn test_insert_find_save_delete() {
    let mongo = TestMongo::new().await;
    let repo = MongoEventRepository::new(&mongo.database("events-test"));
    repo.create_indexes().await.unwrap();
    let builder = TestDataBuilder::from_test_name("insert_find_save_delete");

    let created = repo.insert(new_event(&builder, "main")).await.unwrap();
    assert_eq!(created.id.len(), 24);

    let found = assert_some(repo.find_by_id(&created.id).await.unwrap(), "stored event");
    assert_eq!(found.name, created.name);
    assert_eq!(found.owner_id, builder.owner_id());

    let mut changed = found.clone();
    changed.is_solved = true;
    let saved = repo.save(changed).await.unwrap();
    assert!(saved.is_solved);
    assert!(saved.updated_at >= found.updated_at);
    assert_eq!(saved.created_at, found.created_at);

    assert!(repo.delete(&created.id).await.unwrap());
    assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    assert!(matches!(
        repo.save(saved).await,
        Err(EventError::NotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn test_search_keeps_insertion_order() {
    let mongo = TestMongo::new().await;
    let repo = MongoEventRepository::new(&mongo.database("events-test"));
    let builder = TestDataBuilder::from_test_name("search_keeps_insertion_order");
    let other = TestDataBuilder::from_test_name("someone_else");

    for suffix in ["first", "second", "third"] {
        repo.insert(new_event(&builder, suffix)).await.unwrap();
        repo.insert(new_event(&other, suffix)).await.unwrap();
    }

    let names: Vec<_> = repo
        .find_by_owner(&builder.owner_id())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(
        names,
        ["first", "second", "third"].map(|s| builder.name("event", s))
    );
}

#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn test_malformed_id_is_a_miss() {
    let mongo = TestMongo::new().await;
    let repo = MongoEventRepository::new(&mongo.database("events-test"));

    assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());
    assert!(!repo.delete("not-an-object-id").await.unwrap());
}
