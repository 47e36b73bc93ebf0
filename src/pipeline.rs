//! Daily batch orchestration.
//!
//! One invocation performs one day's collection, storage, and notification
//! fan-out, run to completion on a single task. The record phase is guarded
//! so at most one snapshot lands per calendar date; a stale day skips only
//! the insert and the run still notifies from existing history.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::analytics::changes::{SPIKE_WINDOW, change_set, spike_detected};
use crate::analytics::outliers::remove_outliers;
use crate::analytics::statistics::{
    REPRESENTATIVE_PERCENTILE, calculate_statistics, representative_price,
};
use crate::config::User;
use crate::fuel::{Fuel, fuel_name};
use crate::message::build_message;
use crate::services::notify::Notifier;
use crate::services::price_api::PriceApi;
use crate::services::tips::TipGenerator;
use crate::store::{PriceSnapshot, RecordStore, SnapshotRepo};

pub struct Pipeline<P, S, T, N> {
    users: Vec<User>,
    prices: P,
    repo: SnapshotRepo<S>,
    tips: T,
    notifier: N,
}

impl<P, S, T, N> Pipeline<P, S, T, N>
where
    P: PriceApi,
    S: RecordStore,
    T: TipGenerator,
    N: Notifier,
{
    pub fn new(users: Vec<User>, prices: P, store: S, tips: T, notifier: N) -> Self {
        Self {
            users,
            prices,
            repo: SnapshotRepo::new(store),
            tips,
            notifier,
        }
    }

    /// Runs the whole day: record phase, then notification phase.
    ///
    /// The spike window is the trailing week of history as it stood before
    /// today's sample lands; today's own movement reaches users through the
    /// latest-vs-previous percentage instead.
    pub async fn run(&self, today: NaiveDate, advisory: &str) -> Result<()> {
        let window = self.repo.recent(SPIKE_WINDOW).await?;
        self.record_snapshot(today).await?;
        self.notify_users(&window, advisory).await
    }

    /// Reduces today's samples for every tracked fuel and inserts one
    /// snapshot, unless the store already holds a row for today or later.
    ///
    /// The guard runs before any id allocation or price fetch. It is a soft
    /// guard: nothing prevents duplicates if stored dates are inconsistent
    /// with the clock (e.g. an out-of-order backfill).
    pub async fn record_snapshot(&self, today: NaiveDate) -> Result<()> {
        if let Some(most_recent) = self.repo.most_recent_date().await? {
            if most_recent >= today {
                info!(
                    %today,
                    %most_recent,
                    "snapshot already recorded for today or later, skipping insert"
                );
                return Ok(());
            }
        }

        let id = self.repo.next_id().await?;
        let mut snapshot = PriceSnapshot::new(id, today);

        for fuel in Fuel::TRACKED {
            let price = self.reduced_price(fuel.id()).await?;
            snapshot.set_price(fuel, price);
        }

        info!(id, %today, u98 = ?snapshot.u98, "inserting daily snapshot");
        self.repo.insert(&snapshot).await
    }

    /// Fetches fresh samples for `fuel_id` and reduces them to the day's
    /// representative price. An empty sample set fails the run.
    async fn reduced_price(&self, fuel_id: u32) -> Result<f64> {
        let raw = self.prices.prices_for(fuel_id).await?;
        let cleaned = remove_outliers(&raw);
        let stats = calculate_statistics(&cleaned, REPRESENTATIVE_PERCENTILE)?;
        Ok(representative_price(fuel_id, &stats))
    }

    /// Sequential per-user fan-out over `window`, the most-recent-first
    /// snapshots used for spike detection. Delivery failures are logged and
    /// do not stop the loop; price-source and store failures propagate.
    pub async fn notify_users(&self, window: &[PriceSnapshot], advisory: &str) -> Result<()> {
        let changes = match (self.repo.latest(0).await?, self.repo.latest(1).await?) {
            (Some(latest), Some(previous)) => change_set(&latest, &previous),
            _ => {
                warn!("store holds fewer than 2 snapshots, no change data available");
                Default::default()
            }
        };

        let tip = self.tips.concise_tip(advisory).await?;
        info!(%tip, "buying tip ready");

        for user in &self.users {
            let representative = self.reduced_price(user.preferred_fuel_id).await?;

            let fuel = Fuel::from_id(user.preferred_fuel_id);
            let change = fuel.and_then(|f| changes.get(&f).copied());
            let spike = fuel.is_some_and(|f| spike_detected(window, f));

            let label = fuel_name(user.preferred_fuel_id);
            let message = build_message(label, representative, change, spike, &tip);

            info!(user = %user.name, %message, "sending price alert");
            if let Err(e) = self.notifier.send(&user.user_key, &message).await {
                error!(user = %user.name, error = %e, "failed to deliver notification");
            }
        }

        Ok(())
    }
}
