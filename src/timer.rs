//! Periodic refresh of the dashboard
//!
//! Statuses depend on the current time, so the dashboard has to be redrawn every now and then even
//! when nobody touches it.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// How often the dashboard is redrawn, unless configured otherwise
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// See [`shutdown_channel`]
pub type ShutdownSender = tokio::sync::watch::Sender<bool>;
/// See [`shutdown_channel`]
pub type ShutdownReceiver = tokio::sync::watch::Receiver<bool>;

/// Create a channel that tells a [`run`] loop to stop, by sending `true`
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    tokio::sync::watch::channel(false)
}


/// A fixed-period timer.
///
/// The first tick happens one period after creation, since the dashboard is drawn as soon as it is created.
/// Must be created from within a Tokio runtime.
#[derive(Debug)]
pub struct RefreshTimer {
    period: Duration,
    interval: Interval,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        // Ticks that were missed (e.g. while a confirmation prompt was waiting) are not replayed in a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Call `on_tick` at every tick of `timer`, until `shutdown` receives `true` (or its sender is dropped).
///
/// This suits hosts where `on_tick` is the only thing touching the dashboard. A host that also feeds
/// user input to the controller (like `meeting-alert`) `select!`s on [`RefreshTimer::tick`] itself.
///
/// Returns the number of ticks that were handled.
pub async fn run<F>(mut timer: RefreshTimer, mut on_tick: F, mut shutdown: ShutdownReceiver) -> u64
where
    F: FnMut(),
{
    let mut ticks = 0;
    log::debug!("Refreshing every {:?}", timer.period());

    loop {
        tokio::select! {
            _ = timer.tick() => {
                on_tick();
                ticks += 1;
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            },
        }
    }

    log::debug!("Refresh loop stopped after {} tick(s)", ticks);
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period() {
        let (stop, shutdown) = shutdown_channel();
        let fired = Cell::new(0);

        let runner = run(RefreshTimer::new(Duration::from_secs(60)), || fired.set(fired.get() + 1), shutdown);
        let stopper = async {
            tokio::time::sleep(Duration::from_secs(150)).await;
            stop.send(true).unwrap();
        };
        let (ticks, _) = tokio::join!(runner, stopper);

        assert_eq!(ticks, 2);
        assert_eq!(fired.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_immediate_tick() {
        let mut timer = RefreshTimer::new(Duration::from_secs(60));
        let start = Instant::now();
        timer.tick().await;
        assert!(Instant::now() - start >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_the_sender_is_gone() {
        let (stop, shutdown) = shutdown_channel();
        drop(stop);
        let ticks = run(RefreshTimer::new(Duration::from_secs(60)), || {}, shutdown).await;
        assert_eq!(ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn false_alarms_do_not_stop() {
        let (stop, shutdown) = shutdown_channel();
        let runner = run(RefreshTimer::new(Duration::from_secs(10)), || {}, shutdown);
        let stopper = async {
            tokio::time::sleep(Duration::from_secs(15)).await;
            stop.send(false).unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            stop.send(true).unwrap();
        };
        let (ticks, _) = tokio::join!(runner, stopper);
        assert_eq!(ticks, 2);
    }
}
