use std::time::Duration;

use tokio::{task::JoinSet, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use vessel_core::{SnapshotReader, VesselRegistry};

use crate::{
    aisstream::{AisStreamClient, AisTransport},
    backoff::Backoff,
    consumer::Consumer,
    models::Subscription,
    settings::Settings,
};

pub struct App<T> {
    consumer: Consumer<T>,
    registry: VesselRegistry,
    staleness_threshold: Duration,
    eviction_interval: Duration,
    stats_interval: Duration,
}

/// The running service. Dropping it without calling [AppHandle::shutdown] aborts every task.
pub struct AppHandle {
    cancellation: CancellationToken,
    tasks: JoinSet<()>,
    reader: SnapshotReader,
}

impl App<AisStreamClient> {
    pub fn build(settings: &Settings) -> App<AisStreamClient> {
        App::with_transport(settings, AisStreamClient::new(settings.api_address.clone()))
    }
}

impl<T: AisTransport> App<T> {
    pub fn with_transport(settings: &Settings, transport: T) -> App<T> {
        let registry = VesselRegistry::new();

        let subscription = Subscription {
            api_key: settings.api_key.expose().to_string(),
            bounding_boxes: vec![settings.bounding_box],
            filter_message_types: settings.message_types.clone(),
        };

        App {
            consumer: Consumer::new(
                transport,
                registry.clone(),
                subscription,
                Backoff::new(&settings.reconnect),
                settings.idle_timeout,
            ),
            registry,
            staleness_threshold: settings.staleness_threshold,
            eviction_interval: settings.eviction_interval,
            stats_interval: settings.stats_interval,
        }
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.registry.clone())
    }

    /// Starts the consumer, the evictor and the stats logger as separate tasks.
    pub fn spawn(self) -> AppHandle {
        let cancellation = CancellationToken::new();
        let reader = self.reader();
        let mut tasks = JoinSet::new();

        tasks.spawn(self.consumer.run(cancellation.clone()));
        tasks.spawn(eviction_loop(
            self.registry.clone(),
            self.eviction_interval,
            self.staleness_threshold,
            cancellation.clone(),
        ));
        tasks.spawn(stats_loop(
            self.registry,
            self.stats_interval,
            cancellation.clone(),
        ));

        AppHandle {
            cancellation,
            tasks,
            reader,
        }
    }

    /// Runs until the process receives ctrl-c.
    pub async fn run(self) {
        let handle = self.spawn();

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {e:?}");
        }

        info!("shutting down");
        handle.shutdown().await;
    }
}

impl AppHandle {
    pub fn reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    pub async fn shutdown(mut self) {
        self.cancellation.cancel();

        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                error!("task exited abnormally: {e:?}");
            }
        }
    }
}

async fn eviction_loop(
    registry: VesselRegistry,
    period: Duration,
    max_age: Duration,
    cancellation: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => return,
            _ = interval.tick() => evict(&registry, max_age),
        }
    }
}

#[instrument(skip_all)]
fn evict(registry: &VesselRegistry, max_age: Duration) {
    let removed = registry.evict(Instant::now(), max_age);
    if removed > 0 {
        info!(
            "cleaned {removed} stale vessels, active vessels: {}",
            registry.len()
        );
    }
}

async fn stats_loop(registry: VesselRegistry, period: Duration, cancellation: CancellationToken) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => return,
            _ = interval.tick() => {
                let active = registry.len();
                if active > 0 {
                    info!(
                        "active vessels: {active} | visible vessels: {} | updates applied: {}",
                        registry.visible_len(),
                        registry.updates_applied(),
                    );
                }
            }
        }
    }
}
