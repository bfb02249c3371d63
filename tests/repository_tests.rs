use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;

use chirpterm::client::{fetch_status_if_missing, ApiClient, PostParams};
use chirpterm::error::{Error, Result};
use chirpterm::model::{AnyEntity, Status, User};
use chirpterm::repository::{ManualClock, Repositories, StatusRepository};

fn repositories() -> (Repositories, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let repos = Repositories::with_clock(Duration::from_secs(60), clock.clone());
    (repos, clock)
}

#[test]
fn concurrent_stores_preserve_both_entries() {
    let (repos, _clock) = repositories();

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let statuses = repos.statuses.clone();
            thread::spawn(move || {
                for j in 0..50 {
                    let id = format!("{}-{}", i, j);
                    statuses.store(Status::new(id, "100", "concurrent"));
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(repos.statuses.all().len(), 8 * 50);
    for i in 0..8 {
        for j in 0..50 {
            assert!(repos.statuses.contains(&format!("{}-{}", i, j)));
        }
    }
}

#[test]
fn concurrent_mutation_with_sweeps_stays_consistent() {
    let (repos, clock) = repositories();

    let store_half = {
        let statuses = repos.statuses.clone();
        thread::spawn(move || {
            for i in 0..200 {
                statuses.store(Status::new(format!("s{}", i), "100", "x"));
            }
        })
    };
    let delete_half = {
        let statuses = repos.statuses.clone();
        thread::spawn(move || {
            for i in 0..200 {
                statuses.delete(&format!("s{}", i));
            }
        })
    };
    let sweeper = {
        let statuses = repos.statuses.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                statuses.sweep();
            }
        })
    };

    store_half.join().unwrap();
    delete_half.join().unwrap();
    sweeper.join().unwrap();

    // Whatever interleaving happened, every surviving entry is findable and
    // every reported id resolves: entity and recency record move together.
    for id in repos.statuses.ids() {
        assert!(repos.statuses.find(&id).is_some());
    }

    clock.advance_secs(61);
    repos.statuses.sweep();
    assert!(repos.statuses.is_empty());
}

#[test]
fn timeline_scenario_with_replies_and_expiry() {
    let (repos, clock) = repositories();

    repos.users.store(User::new("100", "alice", "Alice"));
    repos.statuses.store(Status::new("1", "100", "root"));
    repos
        .statuses
        .store(Status::new("2", "100", "reply a").in_reply_to("1"));
    repos
        .statuses
        .store(Status::new("3", "100", "reply b").in_reply_to("1"));

    let mut reply_ids: Vec<_> = repos
        .statuses
        .find_replies_for(&"1".to_string())
        .into_iter()
        .map(|status| status.id)
        .collect();
    reply_ids.sort();
    assert_eq!(reply_ids, vec!["2".to_string(), "3".to_string()]);
    assert!(repos
        .statuses
        .find_replies_for(&"2".to_string())
        .is_empty());

    // Keep the root alive across the TTL boundary by reading it.
    clock.advance_secs(30);
    assert!(repos.statuses.find(&"1".to_string()).is_some());

    clock.advance_secs(50);
    let report = repos.sweep_all();
    assert_eq!(report.statuses, 2);
    assert_eq!(report.users, 1);

    // Only the touched root survived, so the reply lookup is now empty.
    assert_eq!(repos.statuses.ids(), vec!["1".to_string()]);
    assert!(repos
        .statuses
        .find_replies_for(&"1".to_string())
        .is_empty());
}

#[test]
fn warm_start_seed_from_json() {
    let clock = Arc::new(ManualClock::new());
    let seed: Vec<AnyEntity> = serde_json::from_str(
        r#"[
            {"kind": "status", "id": "1", "user_id": "100", "text": "hello"},
            {"kind": "status", "id": "2", "user_id": "100", "text": "again", "in_reply_to_status_id": "1"}
        ]"#,
    )
    .unwrap();

    let statuses =
        StatusRepository::with_seed(Duration::from_secs(60), clock, seed).unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses.find_replies_for(&"1".to_string()).len(), 1);
}

#[test]
fn warm_start_seed_rejects_foreign_records() {
    let clock = Arc::new(ManualClock::new());
    let seed: Vec<AnyEntity> = serde_json::from_str(
        r#"[
            {"kind": "status", "id": "1", "user_id": "100", "text": "hello"},
            {"kind": "user", "id": "100", "screen_name": "alice", "name": "Alice"}
        ]"#,
    )
    .unwrap();

    let result = StatusRepository::with_seed(Duration::from_secs(60), clock, seed);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

struct CountingClient {
    fetches: AtomicUsize,
}

#[async_trait]
impl ApiClient for CountingClient {
    async fn home_timeline(&self) -> Result<Vec<Status>> {
        Ok(Vec::new())
    }

    async fn show_status(&self, id: &String) -> Result<Status> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Status::new(id.clone(), "100", "fetched"))
    }

    async fn post(&self, params: PostParams) -> Result<Status> {
        let mut status = Status::new("posted", "100", params.text);
        status.in_reply_to_status_id = params.in_reply_to_status_id;
        Ok(status)
    }

    async fn destroy_status(&self, _id: &String) -> Result<()> {
        Ok(())
    }

    async fn show_user(&self, id: &String) -> Result<User> {
        Ok(User::new(id.clone(), "alice", "Alice"))
    }
}

#[tokio::test]
async fn fetch_is_skipped_while_the_status_is_live() {
    let (repos, clock) = repositories();
    let client = CountingClient {
        fetches: AtomicUsize::new(0),
    };
    let id = "1".to_string();

    // First call misses the repository and hits the network.
    let status = fetch_status_if_missing(&client, &repos.statuses, &id)
        .await
        .unwrap();
    assert_eq!(status.text, "fetched");
    assert_eq!(client.fetches.load(Ordering::SeqCst), 1);

    // While live, the repository answers.
    fetch_status_if_missing(&client, &repos.statuses, &id)
        .await
        .unwrap();
    assert_eq!(client.fetches.load(Ordering::SeqCst), 1);

    // Once expired, the next call fetches again.
    clock.advance_secs(61);
    fetch_status_if_missing(&client, &repos.statuses, &id)
        .await
        .unwrap();
    assert_eq!(client.fetches.load(Ordering::SeqCst), 2);
}
