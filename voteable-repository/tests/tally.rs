//! Integration tests for the tally builder: ranked, filtered aggregates
//! over one voteable entity type.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use voteable_repository::{
    SqliteVoteRepository, VoteLedger, VoteRepositoryError, VoteableConfig, VoteableRegistry,
};
use voteable_shared::types::{EntityRef, TallyOptions, TallyOrder};

#[derive(Debug, PartialEq, sqlx::FromRow)]
struct Post {
    id: i64,
    title: String,
}

async fn make_repository(pool: SqlitePool) -> SqliteVoteRepository {
    sqlx::query(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            vote_count INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("CREATE TABLE comments (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();

    let mut registry = VoteableRegistry::new();
    registry
        .register(VoteableConfig::new("Post", "posts").with_counter())
        .unwrap();
    registry
        .register(VoteableConfig::new("Comment", "comments"))
        .unwrap();
    SqliteVoteRepository::new(pool, registry)
}

async fn insert_post(pool: &SqlitePool, title: &str) -> EntityRef {
    let id: i64 = sqlx::query_scalar("INSERT INTO posts (title) VALUES (?) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap();
    EntityRef::new("Post", id)
}

/// Casts `votes` upvotes on a post, each from a distinct unregistered voter.
async fn cast_votes(repository: &SqliteVoteRepository, post: &EntityRef, votes: i64) {
    for i in 0..votes {
        repository
            .create_vote(&EntityRef::new("Guest", i), post, 1)
            .await
            .unwrap();
    }
}

/// Ledger insert with an explicit timestamp, for time-range filtering tests.
async fn insert_vote_at(
    pool: &SqlitePool,
    post: &EntityRef,
    value: i64,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO votes (voter_type, voter_id, voteable_type, voteable_id, value, created_at) \
         VALUES ('Guest', 0, ?, ?, ?, ?)",
    )
    .bind(&post.entity_type)
    .bind(post.entity_id)
    .bind(value)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

/// The Scenario fixture: three posts with vote counts 3, 2, and 1.
async fn ranked_posts(pool: &SqlitePool, repository: &SqliteVoteRepository) -> Vec<EntityRef> {
    let p1 = insert_post(pool, "p1").await;
    let p2 = insert_post(pool, "p2").await;
    let p3 = insert_post(pool, "p3").await;
    cast_votes(repository, &p1, 3).await;
    cast_votes(repository, &p2, 2).await;
    cast_votes(repository, &p3, 1).await;
    vec![p1, p2, p3]
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_orders_by_count_desc_by_default(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    ranked_posts(&pool, &repository).await;

    let tallies = repository
        .tally::<Post>("Post", &TallyOptions::default())
        .await
        .unwrap();

    let ranked: Vec<(&str, i64)> = tallies
        .iter()
        .map(|t| (t.entity.title.as_str(), t.count))
        .collect();
    assert_eq!(ranked, vec![("p1", 3), ("p2", 2), ("p3", 1)]);
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_at_least_with_limit_returns_top_post(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    ranked_posts(&pool, &repository).await;

    let options = TallyOptions {
        at_least: Some(2),
        limit: Some(1),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();

    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].entity.title, "p1");
    assert_eq!(tallies[0].count, 3);
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_count_bounds(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    ranked_posts(&pool, &repository).await;

    let options = TallyOptions {
        at_most: Some(2),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert!(tallies.iter().all(|t| t.count <= 2));
    assert_eq!(tallies.len(), 2);

    let options = TallyOptions {
        at_least: Some(2),
        at_most: Some(2),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].entity.title, "p2");
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_excludes_entities_with_no_votes(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    let voted = insert_post(&pool, "voted").await;
    insert_post(&pool, "ignored").await;
    cast_votes(&repository, &voted, 1).await;

    let tallies = repository
        .tally::<Post>("Post", &TallyOptions::default())
        .await
        .unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].entity.title, "voted");

    // A type with no votes at all tallies to an empty set.
    #[derive(Debug, sqlx::FromRow)]
    struct Comment {
        #[allow(dead_code)]
        id: i64,
    }
    let tallies = repository
        .tally::<Comment>("Comment", &TallyOptions::default())
        .await
        .unwrap();
    assert!(tallies.is_empty());
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_respects_limit(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    ranked_posts(&pool, &repository).await;

    let options = TallyOptions {
        limit: Some(2),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies.len(), 2);
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_time_range_filters_votes(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    let post = insert_post(&pool, "p1").await;

    let day1 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let day2 = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();
    let day3 = Utc.with_ymd_and_hms(2026, 1, 3, 12, 0, 0).unwrap();
    insert_vote_at(&pool, &post, 1, day1).await;
    insert_vote_at(&pool, &post, 1, day2).await;
    insert_vote_at(&pool, &post, 1, day3).await;

    let options = TallyOptions {
        start_at: Some(day2),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies[0].count, 2);

    let options = TallyOptions {
        start_at: Some(day2),
        end_at: Some(day2),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies[0].count, 1);

    // A window with no votes drops the post entirely.
    let options = TallyOptions {
        start_at: Some(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert!(tallies.is_empty());
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_condition_restricts_counted_votes(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    let post = insert_post(&pool, "p1").await;
    repository
        .create_vote(&EntityRef::new("Guest", 1), &post, 1)
        .await
        .unwrap();
    repository
        .create_vote(&EntityRef::new("Guest", 2), &post, -1)
        .await
        .unwrap();

    let options = TallyOptions {
        condition: Some("votes.value = 1".to_string()),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies[0].count, 1);
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_merges_entity_scope(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    let keep = insert_post(&pool, "keep-me").await;
    let skip = insert_post(&pool, "skip-me").await;
    cast_votes(&repository, &keep, 1).await;
    cast_votes(&repository, &skip, 5).await;

    let options = TallyOptions {
        scope: Some("posts.title LIKE 'keep%'".to_string()),
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].entity.title, "keep-me");
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_custom_orders(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;
    ranked_posts(&pool, &repository).await;

    let options = TallyOptions {
        order: TallyOrder::CountAsc,
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    let counts: Vec<i64> = tallies.iter().map(|t| t.count).collect();
    assert_eq!(counts, vec![1, 2, 3]);

    let options = TallyOptions {
        order: TallyOrder::Column {
            name: "title".to_string(),
            descending: true,
        },
        ..Default::default()
    };
    let tallies = repository.tally::<Post>("Post", &options).await.unwrap();
    let titles: Vec<&str> = tallies.iter().map(|t| t.entity.title.as_str()).collect();
    assert_eq!(titles, vec!["p3", "p2", "p1"]);
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_rejects_invalid_options_before_querying(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;

    let options = TallyOptions {
        at_least: Some(-2),
        ..Default::default()
    };
    let result = repository.tally::<Post>("Post", &options).await;
    assert!(matches!(
        result.unwrap_err(),
        VoteRepositoryError::InvalidOption(_)
    ));

    let options = TallyOptions {
        order: TallyOrder::Column {
            name: "title DESC; DROP TABLE votes".to_string(),
            descending: false,
        },
        ..Default::default()
    };
    let result = repository.tally::<Post>("Post", &options).await;
    assert!(matches!(
        result.unwrap_err(),
        VoteRepositoryError::InvalidOption(_)
    ));
}

#[sqlx::test(migrations = "src/sqlite/migrations")]
async fn test_tally_rejects_unregistered_entity_type(pool: SqlitePool) {
    let repository = make_repository(pool.clone()).await;

    let result = repository
        .tally::<Post>("Widget", &TallyOptions::default())
        .await;
    assert!(matches!(
        result.unwrap_err(),
        VoteRepositoryError::InvalidOption(_)
    ));
}
