use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::repository::clock::{Clock, SystemClock};
use crate::repository::status::StatusRepository;
use crate::repository::user::UserRepository;

/// One repository per entity kind, constructed once at startup and handed to
/// every collaborator that needs entity access.
#[derive(Clone)]
pub struct Repositories {
    pub statuses: StatusRepository,
    pub users: UserRepository,
}

impl Repositories {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            statuses: StatusRepository::new(ttl, clock.clone()),
            users: UserRepository::new(ttl, clock),
        }
    }

    /// Runs every repository's expiration sweep once.
    pub fn sweep_all(&self) -> SweepReport {
        SweepReport {
            statuses: self.statuses.sweep(),
            users: self.users.sweep(),
        }
    }

    /// Spawns a background task that sweeps all repositories on `interval`,
    /// so memory is reclaimed even for kinds that stop being queried.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let repositories = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh process
            // does not sweep an empty set.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let report = repositories.sweep_all();
                if report.total() > 0 {
                    debug!(
                        "Sweep reclaimed {} statuses, {} users",
                        report.statuses, report.users
                    );
                }
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepReport {
    pub statuses: usize,
    pub users: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.statuses + self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, User};
    use crate::repository::clock::ManualClock;

    #[test]
    fn test_sweep_all_reports_per_kind_counts() {
        let clock = Arc::new(ManualClock::new());
        let repositories = Repositories::with_clock(Duration::from_secs(60), clock.clone());

        repositories.statuses.store(Status::new("1", "100", "a"));
        repositories.statuses.store(Status::new("2", "100", "b"));
        repositories.users.store(User::new("100", "alice", "Alice"));

        clock.advance_secs(61);
        let report = repositories.sweep_all();
        assert_eq!(report.statuses, 2);
        assert_eq!(report.users, 1);
        assert_eq!(report.total(), 3);

        // Nothing left to reclaim.
        assert_eq!(repositories.sweep_all().total(), 0);
    }

    #[tokio::test]
    async fn test_spawn_sweeper_reclaims_expired_entries() {
        let clock = Arc::new(ManualClock::new());
        let repositories = Repositories::with_clock(Duration::from_secs(60), clock.clone());
        repositories.statuses.store(Status::new("1", "100", "hello"));

        let handle = repositories.spawn_sweeper(Duration::from_millis(10));

        clock.advance_secs(61);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(repositories.statuses.len(), 0);
        handle.abort();
    }
}
