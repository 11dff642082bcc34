//! Periodic refresh driver
//!
//! One ticker task runs per mounted screen. It stops when the screen is
//! dropped or aborts it on unmount, sleeps while the screen is hidden and
//! restarts its period on re-entry so missed ticks never pile up.
//! Periods shorter than [`MIN_PERIOD`] are raised to it.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

pub(crate) const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Receiver of periodic ticks
pub(crate) trait Tick: Send + Sync {
    fn on_tick(self: Arc<Self>);
}

pub(crate) fn spawn_ticker(
    target: Weak<dyn Tick>,
    mut visible: watch::Receiver<bool>,
    period: Duration,
) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if !*visible.borrow_and_update() {
                debug!("Auto-refresh suspended");
                if visible.changed().await.is_err() {
                    break;
                }
                if *visible.borrow() {
                    debug!("Auto-refresh resumed");
                    interval.reset();
                }
                continue;
            }

            tokio::select! {
                _ = interval.tick() => {
                    let Some(target) = target.upgrade() else {
                        break;
                    };
                    trace!("Auto-refresh tick");
                    target.on_tick();
                }
                changed = visible.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}
