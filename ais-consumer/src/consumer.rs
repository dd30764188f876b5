use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use vessel_core::VesselRegistry;

use crate::{
    aisstream::AisTransport,
    backoff::{Backoff, ReconnectState},
    decoder::decode,
    models::Subscription,
};

/// Owns the upstream connection and feeds every decoded update into the registry.
pub struct Consumer<T> {
    transport: T,
    registry: VesselRegistry,
    subscription: Subscription,
    backoff: Backoff,
    idle_timeout: Duration,
}

impl<T: AisTransport> Consumer<T> {
    pub fn new(
        transport: T,
        registry: VesselRegistry,
        subscription: Subscription,
        backoff: Backoff,
        idle_timeout: Duration,
    ) -> Consumer<T> {
        Consumer {
            transport,
            registry,
            subscription,
            backoff,
            idle_timeout,
        }
    }

    /// Connects, consumes until the connection ends and reconnects after the backoff delay,
    /// for as long as `cancellation` is not triggered.
    pub async fn run(mut self, cancellation: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => return,
                _ = self.run_cycle() => {}
            }

            self.backoff.disconnected();
            let delay = self.backoff.pending_delay();

            info!("reconnecting to ais stream in {delay:?}");

            tokio::select! {
                _ = cancellation.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            self.backoff.fire();
        }
    }

    #[instrument(skip_all, fields(app.num_messages))]
    async fn run_cycle(&mut self) {
        info!("connecting to ais stream");

        let mut frames = match self.transport.connect(&self.subscription).await {
            Ok(frames) => frames,
            Err(e) => {
                error!("failed to connect to ais stream: {e:?}");
                return;
            }
        };

        self.backoff.connected();

        let mut num_messages: u64 = 0;
        loop {
            // A half-open connection never ends the stream, so silence is treated as a close.
            let frame = match tokio::time::timeout(self.idle_timeout, frames.next()).await {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(_) => {
                    warn!("no frames received within {:?}", self.idle_timeout);
                    break;
                }
            };

            match frame {
                Err(e) => {
                    error!("ais stream transport error: {e:?}");
                    break;
                }
                Ok(frame) => match decode(&frame) {
                    Err(e) => warn!("dropping ais frame: {e:?}"),
                    Ok(update) => {
                        if num_messages == 0 {
                            info!("receiving vessel data");
                        }
                        num_messages += 1;
                        self.backoff.data_received();

                        if let Some(update) = update {
                            self.registry.apply(update);
                        }
                    }
                },
            }
        }

        tracing::Span::current().record("app.num_messages", num_messages);

        let received_data = matches!(
            self.backoff.state(),
            ReconnectState::Connected {
                received_data: true
            }
        );
        info!(received_data, "disconnected from ais stream after {num_messages} messages");
    }
}
