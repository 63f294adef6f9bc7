/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::events;
use crate::lookup::{LookupdClient, Producer};
use crate::subscription::{stop_requested, NsqSubscription};
use async_trait::async_trait;
use faas_connector::{Broker, ConnectorError, Subscription};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::info;

const COMPONENT: &str = "nsq_broker";

pub const DEFAULT_LOOKUPD_HTTP_PORT: u16 = 4161;
pub const DEFAULT_LOOKUPD_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NsqConfig {
    /// `host:port` of nsqlookupd's HTTP listener.
    pub lookupd_address: String,
    /// Wait between nsqlookupd queries, both while a topic has no producers
    /// and while subscribed, to pick up new or restarted nsqd instances.
    pub poll_interval: Duration,
}

impl NsqConfig {
    /// Targets nsqlookupd's default HTTP port on `host`.
    pub fn for_lookupd_host(host: &str) -> Self {
        Self {
            lookupd_address: format!("{host}:{DEFAULT_LOOKUPD_HTTP_PORT}"),
            poll_interval: DEFAULT_LOOKUPD_POLL_INTERVAL,
        }
    }
}

/// Subscribes through nsqlookupd to every nsqd producing a topic.
///
/// Subscriptions keep polling nsqlookupd, so producers that appear later are
/// consumed too and dropped connections are re-established. Raising `stop`
/// closes all open subscriptions, which ends their streams.
pub struct NsqBroker {
    config: NsqConfig,
    stop: watch::Receiver<bool>,
}

impl NsqBroker {
    pub fn new(config: NsqConfig, stop: watch::Receiver<bool>) -> Self {
        Self { config, stop }
    }

    /// `None` when stop fired before any producer showed up.
    async fn wait_for_producers(
        &self,
        lookupd: &LookupdClient,
        topic: &str,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<Option<Vec<Producer>>, ConnectorError> {
        loop {
            let producers = lookupd.producers(topic).await?;
            if !producers.is_empty() {
                info!(
                    event = events::LOOKUP_PRODUCERS,
                    component = COMPONENT,
                    topic,
                    producers = producers.len(),
                    "found nsqd producers"
                );
                return Ok(Some(producers));
            }

            info!(
                event = events::LOOKUP_NO_PRODUCERS,
                component = COMPONENT,
                topic,
                retry_in = ?self.config.poll_interval,
                "no nsqd produces this topic yet"
            );
            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                () = stop_requested(stop) => return Ok(None),
            }
        }
    }
}

#[async_trait]
impl Broker for NsqBroker {
    async fn subscribe(
        &self,
        topic: &str,
        consumer_group: &str,
    ) -> Result<Box<dyn Subscription>, ConnectorError> {
        // Built here so the client belongs to the calling consumer's runtime.
        let lookupd = LookupdClient::new(&self.config.lookupd_address)?;
        let mut stop = self.stop.clone();

        let Some(producers) = self.wait_for_producers(&lookupd, topic, &mut stop).await? else {
            let closed =
                NsqSubscription::open(topic, consumer_group, Vec::<TcpStream>::new(), stop).await?;
            return Ok(Box::new(closed));
        };

        let subscription = NsqSubscription::discover(
            topic,
            consumer_group,
            producers,
            lookupd,
            self.config.poll_interval,
            stop,
        )
        .await?;
        Ok(Box::new(subscription))
    }
}
