use std::future::Future;

use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{debug, error};

use crate::time::next_cutoff;

/// Smallest wait between two runs, so a clock jump cannot spin the loop.
const MIN_DELAY: Duration = Duration::from_secs(1);

/// Time to sleep from `now` until the next local `hour:00:00`.
pub fn delay_until_hour<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Duration {
    let next = next_cutoff(now, hour);
    next.signed_duration_since(now.clone())
        .to_std()
        .unwrap_or(MIN_DELAY)
        .max(MIN_DELAY)
}

/// Spawn a task that runs once a day at the given local hour, forever.
///
/// Failures are logged and the next run is scheduled as usual.
pub fn spawn_daily<F, Fut>(name: &'static str, hour: u32, task: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    spawn_daily_with_clock(name, hour, Local::now, task)
}

/// Same as [`spawn_daily`], reading the wall clock from `clock`.
pub fn spawn_daily_with_clock<Tz, C, F, Fut>(
    name: &'static str,
    hour: u32,
    clock: C,
    mut task: F,
) -> JoinHandle<()>
where
    Tz: TimeZone,
    C: Fn() -> DateTime<Tz> + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let delay = delay_until_hour(&clock(), hour);
            debug!(task = name, delay_secs = delay.as_secs(), "waiting for daily run");
            sleep(delay).await;

            if let Err(source) = task().await {
                error!(?source, task = name, "daily task failed");
            }
        }
    })
}

/// Spawn a task that runs every `period`, forever.
pub fn spawn_interval<F, Fut>(name: &'static str, period: Duration, mut task: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let period = period.max(MIN_DELAY);

    tokio::spawn(async move {
        loop {
            sleep(period).await;

            if let Err(source) = task().await {
                error!(?source, task = name, "periodic task failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[test]
    fn delay_reaches_next_local_hour() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 2, 3, 22, 30, 0).unwrap();

        assert_eq!(delay_until_hour(&now, 0), Duration::from_secs(90 * 60));
        assert_eq!(delay_until_hour(&now, 23), Duration::from_secs(30 * 60));
    }

    #[test]
    fn delay_at_the_hour_waits_a_full_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz.with_ymd_and_hms(2025, 2, 3, 4, 0, 0).unwrap();

        assert_eq!(delay_until_hour(&now, 4), Duration::from_secs(24 * 60 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_task_keeps_running_after_failures() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let handle = spawn_interval("test", Duration::from_secs(60), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(anyhow::anyhow!("always fails"))
            }
        });

        sleep(Duration::from_secs(60 * 3 + 1)).await;
        handle.abort();

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn daily_task_runs_at_the_hour_and_survives_failures() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let start_wall = tz.with_ymd_and_hms(2025, 2, 3, 22, 30, 0).unwrap();
        let start = Instant::now();
        let clock = move || {
            start_wall + chrono::Duration::from_std(start.elapsed()).unwrap()
        };

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let handle = spawn_daily_with_clock("test", 0, clock, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(anyhow::anyhow!("always fails"))
            }
        });

        sleep(Duration::from_secs(89 * 60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_secs(60 + 1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(24 * 60 * 60)).await;
        handle.abort();

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
