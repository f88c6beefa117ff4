//! Delivery of queued custom messages through the Centrifugo publish API.

use crate::{config::CentrifugoConfig, transport::CustomMessage};
use anyhow::{Context, Result, bail, ensure};
use log::{debug, error, info};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    channel: &'a str,
    data: &'a CustomMessage,
}

pub struct CentrifugoPublisher {
    client: Client,
    config: CentrifugoConfig,
}

impl CentrifugoPublisher {
    pub fn new(config: CentrifugoConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to create http client")?;

        Ok(Self { client, config })
    }

    /// Publish one message on the session channel.
    pub async fn publish(&self, message: &CustomMessage) -> Result<()> {
        let url = &self.config.url;
        debug!("POST {url} {} on {}", message.name, self.config.channel);

        let res = self
            .client
            .post(url)
            .header("X-API-Key", &self.config.api_key)
            .json(&PublishRequest {
                channel: &self.config.channel,
                data: message,
            })
            .send()
            .await
            .context(format!("failed to send POST request to {url}"))?;

        handle_publish_response(res, &message.name).await
    }

    /// Drain the queue in send order until every sender is dropped.
    ///
    /// Failed messages are logged and skipped. Returns how many were
    /// published.
    pub async fn run(self, mut rx: UnboundedReceiver<CustomMessage>) -> usize {
        let mut published = 0;

        while let Some(message) = rx.recv().await {
            match self.publish(&message).await {
                Ok(()) => published += 1,
                Err(e) => error!("failed to publish {}: {e:#}", message.name),
            }
        }

        info!(
            "published {published} message(s) on {}",
            self.config.channel
        );
        published
    }
}

/// Centrifugo reports command errors in a 200 response body.
async fn handle_publish_response(res: Response, name: &str) -> Result<()> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    ensure!(
        status.is_success(),
        "publish {name} failed with status {status} and body: {body}"
    );

    if let Ok(reply) = serde_json::from_str::<Value>(&body) {
        if let Some(error) = reply.get("error") {
            bail!("publish {name} rejected: {error}");
        }
    }

    Ok(())
}
