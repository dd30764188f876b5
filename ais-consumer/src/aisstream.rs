use async_trait::async_trait;
use futures::{SinkExt, StreamExt, stream::BoxStream};
use snafu::ResultExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

use crate::{
    error::{
        Result,
        error::{ConnectSnafu, SerializeSnafu, SubscribeSnafu, TransportSnafu},
    },
    models::Subscription,
};

/// Raw frames pushed by the upstream source. The stream ends when the connection closes.
pub type FrameStream = BoxStream<'static, Result<Vec<u8>>>;

/// A source of ais frames that can be (re)connected to.
#[async_trait]
pub trait AisTransport: Send + Sync + 'static {
    /// Opens a new connection and sends the subscription request on it.
    async fn connect(&self, subscription: &Subscription) -> Result<FrameStream>;
}

pub struct AisStreamClient {
    api_address: String,
}

impl AisStreamClient {
    pub fn new(api_address: String) -> AisStreamClient {
        AisStreamClient { api_address }
    }
}

#[async_trait]
impl AisTransport for AisStreamClient {
    async fn connect(&self, subscription: &Subscription) -> Result<FrameStream> {
        let (mut socket, _) = connect_async(self.api_address.as_str())
            .await
            .context(ConnectSnafu {
                url: &self.api_address,
            })?;

        info!("connected to ais stream, sending subscription");

        let subscription = serde_json::to_string(subscription).context(SerializeSnafu)?;
        socket
            .send(Message::Text(subscription))
            .await
            .context(SubscribeSnafu)?;

        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text.into_bytes())),
                // The stream delivers its json payloads as binary frames, utf-8 is checked
                // when decoding so a bad frame is dropped without closing the connection.
                Ok(Message::Binary(bytes)) => Some(Ok(bytes)),
                Ok(Message::Close(frame)) => {
                    warn!("ais stream sent close frame: {frame:?}");
                    None
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => None,
                Err(e) => Some(Err(e).context(TransportSnafu)),
            }
        });

        Ok(frames.boxed())
    }
}
