//! PostgreSQL link repository tests.
//!
//! These need a database: run with `DATABASE_URL` set and `--ignored`.

use chrono::Utc;
use link_shortcut::domain::entities::NewLink;
use link_shortcut::domain::repositories::LinkRepository;
use link_shortcut::error::AppError;
use link_shortcut::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(url: &str, hash: &str) -> NewLink {
    NewLink {
        url: url.to_string(),
        hash: hash.to_string(),
        name: Some("Example".to_string()),
        description: None,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .create(new_link("http://example.com", "roF3Sgod2P9BNSfe1s1vRg=="))
        .await
        .unwrap();

    assert_eq!(link.url, "http://example.com");
    assert_eq!(link.name.as_deref(), Some("Example"));
    assert_eq!(link.access_count, 0);
    assert_eq!(link.row_version, 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unique_constraints(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

    let dup_url = repo.create(new_link("http://a.com", "bbbbb1")).await;
    let dup_hash = repo.create(new_link("http://b.com", "aaaaa1")).await;

    assert!(matches!(dup_url, Err(AppError::Conflict { .. })));
    assert!(matches!(dup_hash, Err(AppError::Conflict { .. })));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_hash_and_url(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let created = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

    let by_hash = repo.find_by_hash("aaaaa1").await.unwrap().unwrap();
    let by_url = repo.find_by_url("http://a.com").await.unwrap().unwrap();
    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(by_hash, created);
    assert_eq!(by_url, created);
    assert_eq!(by_id, created);
    assert!(repo.find_by_hash("aaaaa").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_prefix_queries_treat_underscore_literally(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("http://a.com", "ab_de111")).await.unwrap();
    repo.create(new_link("http://b.com", "ab_de222")).await.unwrap();
    repo.create(new_link("http://c.com", "abXde333")).await.unwrap();

    assert_eq!(repo.count_by_hash_prefix("ab_de").await.unwrap(), 2);
    assert_eq!(repo.list_by_hash_prefix("ab_de").await.unwrap().len(), 2);
    assert_eq!(
        repo.first_by_hash_prefix("ab_de").await.unwrap().unwrap().url,
        "http://a.com"
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_access_checks_version(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

    let updated = repo
        .record_access(link.id, link.row_version, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.access_count, 1);
    assert_eq!(updated.row_version, 1);

    let stale = repo
        .record_access(link.id, link.row_version, Utc::now())
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_page(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let mut ids = Vec::new();
    for i in 0..5 {
        let link = repo
            .create(new_link(&format!("http://{i}.com"), &format!("hash{i}")))
            .await
            .unwrap();
        ids.push(link.id);
    }

    let first = repo.list_page(None, 1, 2).await.unwrap();
    assert_eq!(
        first.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![ids[1], ids[2]]
    );

    let next = repo.list_page(Some(ids[2]), 0, 10).await.unwrap();
    assert_eq!(
        next.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![ids[3], ids[4]]
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

    assert!(repo.delete(link.id).await.unwrap());
    assert!(!repo.delete(link.id).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 0);
}
