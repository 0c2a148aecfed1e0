//! Runs against a real database. Set DATABASE_URL and use `--ignored`.

use jotion_server::{
    auth::CallerIdentity,
    db, documents,
    store::PgDocumentStore,
};
use uuid::Uuid;

async fn store() -> PgDocumentStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = db::create_pool(&url).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    PgDocumentStore::new(pool)
}

#[tokio::test]
#[ignore]
async fn postgres_sidebar_round_trip() {
    let store = store().await;
    // Fresh subject per run so earlier runs do not leak into the assertions
    let caller = CallerIdentity::new(format!("pg_test_{}", Uuid::new_v4()));

    let alpha = documents::create(&store, Some(&caller), "Alpha".to_string(), None)
        .await
        .unwrap();
    documents::create(&store, Some(&caller), "Beta".to_string(), Some(alpha))
        .await
        .unwrap();
    documents::create(&store, Some(&caller), "Gamma".to_string(), None)
        .await
        .unwrap();

    let roots = documents::get_sidebar(&store, Some(&caller), None).await.unwrap();
    let titles: Vec<&str> = roots.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, ["Gamma", "Alpha"]);

    let children = documents::get_sidebar(&store, Some(&caller), Some(alpha))
        .await
        .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].title, "Beta");
    assert_eq!(children[0].user_id, caller.subject);
}
