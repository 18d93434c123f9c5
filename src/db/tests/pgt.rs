//! Shared tests for PgtRepo implementations

use super::harness::{at, at_millis};
use crate::{db::repos::PgtRepo, models::PgtRecord};

fn pgt(ticket: &str, timestamp: i64) -> PgtRecord {
    PgtRecord {
        ticket: ticket.to_string(),
        pgt: format!("PGT-{ticket}"),
        timestamp: at(timestamp),
    }
}

pub async fn test_insert_and_take(repo: &dyn PgtRepo) {
    repo.insert(pgt("PGTIOU-1", 1000)).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);

    let taken = repo.take("PGTIOU-1").await.unwrap().unwrap();
    assert_eq!(taken.pgt, "PGT-PGTIOU-1");
    assert_eq!(taken.timestamp, at(1000));

    assert!(repo.take("PGTIOU-1").await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 0);
}

pub async fn test_take_missing(repo: &dyn PgtRepo) {
    assert!(repo.take("PGTIOU-missing").await.unwrap().is_none());
}

pub async fn test_insert_replaces_same_ticket(repo: &dyn PgtRepo) {
    repo.insert(pgt("PGTIOU-1", 1000)).await.unwrap();
    repo.insert(pgt("PGTIOU-1", 2000)).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    let taken = repo.take("PGTIOU-1").await.unwrap().unwrap();
    assert_eq!(taken.timestamp, at(2000));
}

pub async fn test_delete_stored_before_is_inclusive(repo: &dyn PgtRepo) {
    repo.insert(pgt("old", 5000)).await.unwrap();
    repo.insert(pgt("edge", 6400)).await.unwrap();
    repo.insert(pgt("new", 6401)).await.unwrap();

    let deleted = repo.delete_stored_before(at(6400)).await.unwrap();
    assert_eq!(deleted, 2);
    assert!(repo.take("old").await.unwrap().is_none());
    assert!(repo.take("edge").await.unwrap().is_none());
    assert!(repo.take("new").await.unwrap().is_some());
}

pub async fn test_sub_second_timestamps_stored_as_whole_seconds(repo: &dyn PgtRepo) {
    let mut late = pgt("late", 0);
    late.timestamp = at_millis(6_400_500);
    let mut next = pgt("next", 0);
    next.timestamp = at_millis(6_401_200);
    repo.insert(late).await.unwrap();
    repo.insert(next).await.unwrap();

    let deleted = repo.delete_stored_before(at_millis(6_400_900)).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.take("late").await.unwrap().is_none());
    assert_eq!(repo.take("next").await.unwrap().unwrap().timestamp, at(6401));
}

pub async fn test_delete_stored_before_empty(repo: &dyn PgtRepo) {
    assert_eq!(repo.delete_stored_before(at(10_000)).await.unwrap(), 0);
}

mod memory_tests {
    use crate::db::memory::MemoryPgtRepo;

    macro_rules! memory_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let repo = MemoryPgtRepo::new();
                super::$name(&repo).await;
            }
        };
    }

    memory_test!(test_insert_and_take);
    memory_test!(test_take_missing);
    memory_test!(test_insert_replaces_same_ticket);
    memory_test!(test_delete_stored_before_is_inclusive);
    memory_test!(test_delete_stored_before_empty);
    memory_test!(test_sub_second_timestamps_stored_as_whole_seconds);
}

#[cfg(feature = "database-sqlite")]
mod sqlite_tests {
    use crate::db::{sqlite::SqlitePgtRepo, tests::harness::create_migrated_sqlite_pool};

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let repo = SqlitePgtRepo::new(create_migrated_sqlite_pool().await);
                super::$name(&repo).await;
            }
        };
    }

    sqlite_test!(test_insert_and_take);
    sqlite_test!(test_take_missing);
    sqlite_test!(test_insert_replaces_same_ticket);
    sqlite_test!(test_delete_stored_before_is_inclusive);
    sqlite_test!(test_delete_stored_before_empty);
    sqlite_test!(test_sub_second_timestamps_stored_as_whole_seconds);
}
