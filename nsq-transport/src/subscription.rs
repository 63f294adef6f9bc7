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

use crate::connection::{self, send_command, ConnectionEvent, SharedWriter};
use crate::events;
use crate::frame::{Command, MESSAGE_ID_LEN};
use crate::lookup::{LookupdClient, Producer};
use async_trait::async_trait;
use faas_connector::{BrokerMessage, ConnectorError, Subscription};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{info, warn};

const COMPONENT: &str = "nsq_subscription";

/// How long nsqd gets to answer `CLS` before the connections are abandoned.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Resolves once `stop` reads `true`; never resolves if its sender is gone.
pub(crate) async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    let detached = stop.wait_for(|stopped| *stopped).await.is_err();
    if detached {
        std::future::pending::<()>().await;
    }
}

async fn connect_producer(
    producer: &Producer,
    index: usize,
    topic: &str,
    channel: &str,
    reports: UnboundedSender<ConnectionEvent>,
) -> Result<SharedWriter, ConnectorError> {
    let stream = TcpStream::connect((producer.broadcast_address.as_str(), producer.tcp_port))
        .await
        .map_err(|err| {
            ConnectorError::broker(format!(
                "unable to connect to nsqd {}:{}: {err}",
                producer.broadcast_address, producer.tcp_port
            ))
        })?;
    connection::open(stream, index, topic, channel, reports).await
}

/// Keeps asking nsqlookupd for producers and dials the ones without a live
/// connection, whether new or dropped.
struct ProducerDiscovery {
    lookupd: LookupdClient,
    poll_interval: Duration,
    next_poll: Instant,
    channel: String,
    reports: UnboundedSender<ConnectionEvent>,
    connected: HashMap<Producer, usize>,
}

/// Messages of one topic merged from every subscribed nsqd connection.
pub struct NsqSubscription {
    topic: String,
    // Indexed by `DeliveryTag::connection`; `None` once a connection is gone.
    connections: Vec<Option<SharedWriter>>,
    reports: UnboundedReceiver<ConnectionEvent>,
    discovery: Option<ProducerDiscovery>,
    stop: watch::Receiver<bool>,
    closing_deadline: Option<Instant>,
}

impl NsqSubscription {
    fn new(
        topic: &str,
        reports: UnboundedReceiver<ConnectionEvent>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            connections: Vec::new(),
            reports,
            discovery: None,
            stop,
            closing_deadline: None,
        }
    }

    /// Subscribes every stream; fails if any nsqd rejects the subscription.
    ///
    /// The stream ends once all of these connections are gone.
    pub(crate) async fn open<S>(
        topic: &str,
        channel: &str,
        streams: Vec<S>,
        stop: watch::Receiver<bool>,
    ) -> Result<Self, ConnectorError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (sender, reports) = unbounded_channel();
        let mut subscription = Self::new(topic, reports, stop);
        for (index, stream) in streams.into_iter().enumerate() {
            let writer = connection::open(stream, index, topic, channel, sender.clone()).await?;
            subscription.connections.push(Some(writer));
        }
        Ok(subscription)
    }

    /// Subscribes to `producers`, then polls `lookupd` every `poll_interval`
    /// for producers that appear later or lost their connection.
    ///
    /// Failing to reach an initial producer fails the subscription; later
    /// failures are logged and retried on the next poll.
    pub(crate) async fn discover(
        topic: &str,
        channel: &str,
        producers: Vec<Producer>,
        lookupd: LookupdClient,
        poll_interval: Duration,
        stop: watch::Receiver<bool>,
    ) -> Result<Self, ConnectorError> {
        let (sender, reports) = unbounded_channel();
        let mut subscription = Self::new(topic, reports, stop);
        let mut connected = HashMap::with_capacity(producers.len());
        for producer in producers {
            let index = subscription.connections.len();
            let writer = connect_producer(&producer, index, topic, channel, sender.clone()).await?;
            subscription.connections.push(Some(writer));
            connected.insert(producer, index);
        }

        subscription.discovery = Some(ProducerDiscovery {
            lookupd,
            poll_interval,
            next_poll: Instant::now() + poll_interval,
            channel: channel.to_string(),
            reports: sender,
            connected,
        });
        Ok(subscription)
    }

    async fn refresh_producers(&mut self) {
        let Some(discovery) = self.discovery.as_mut() else {
            return;
        };
        discovery.next_poll = Instant::now() + discovery.poll_interval;

        let producers = match discovery.lookupd.producers(&self.topic).await {
            Ok(producers) => producers,
            Err(err) => {
                warn!(
                    event = events::LOOKUP_FAILED,
                    component = COMPONENT,
                    topic = self.topic.as_str(),
                    err = %err,
                    "unable to refresh nsqd producers"
                );
                return;
            }
        };

        for producer in producers {
            if discovery.connected.contains_key(&producer) {
                continue;
            }

            let index = self.connections.len();
            match connect_producer(
                &producer,
                index,
                &self.topic,
                &discovery.channel,
                discovery.reports.clone(),
            )
            .await
            {
                Ok(writer) => {
                    info!(
                        event = events::SUBSCRIPTION_PRODUCER_ADDED,
                        component = COMPONENT,
                        topic = self.topic.as_str(),
                        producer = %format!("{}:{}", producer.broadcast_address, producer.tcp_port),
                        connection = index,
                        "subscribed to nsqd producer"
                    );
                    self.connections.push(Some(writer));
                    discovery.connected.insert(producer, index);
                }
                Err(err) => {
                    warn!(
                        event = events::SUBSCRIPTION_PRODUCER_FAILED,
                        component = COMPONENT,
                        topic = self.topic.as_str(),
                        err = %err,
                        "unable to subscribe to nsqd producer, retrying on next lookup"
                    );
                }
            }
        }
    }

    fn connection_closed(&mut self, index: usize) {
        if let Some(slot) = self.connections.get_mut(index) {
            *slot = None;
        }
        if let Some(discovery) = self.discovery.as_mut() {
            discovery.connected.retain(|_, connection| *connection != index);
            warn!(
                event = events::SUBSCRIPTION_CONNECTION_LOST,
                component = COMPONENT,
                topic = self.topic.as_str(),
                connection = index,
                "nsqd connection lost, reconnecting on next lookup"
            );
        }
    }

    async fn close(&mut self) {
        // Dropping the discovery's sender lets the stream end with the readers.
        self.discovery = None;

        let open: Vec<_> = self
            .connections
            .iter()
            .enumerate()
            .filter_map(|(index, writer)| writer.as_ref().map(|writer| (index, writer)))
            .collect();
        info!(
            event = events::SUBSCRIPTION_CLOSING,
            component = COMPONENT,
            topic = self.topic.as_str(),
            connections = open.len(),
            "stop requested, closing nsqd connections"
        );

        for (index, writer) in open {
            if let Err(err) = send_command(writer, Command::Cls).await {
                warn!(
                    event = events::SUBSCRIPTION_CLOSE_FAILED,
                    component = COMPONENT,
                    topic = self.topic.as_str(),
                    connection = index,
                    err = %err,
                    "unable to send CLS"
                );
            }
        }
        self.closing_deadline = Some(Instant::now() + CLOSE_GRACE);
    }

    /// Waits until every connection's reader has finished.
    async fn drain(&mut self) {
        while self.reports.recv().await.is_some() {}
    }
}

#[async_trait]
impl Subscription for NsqSubscription {
    async fn next_message(&mut self) -> Option<BrokerMessage> {
        loop {
            if let Some(deadline) = self.closing_deadline {
                // In-flight messages left unfinished are requeued by nsqd.
                let _ = timeout_at(deadline, self.drain()).await;
                return None;
            }

            let next_poll = self.discovery.as_ref().map(|discovery| discovery.next_poll);
            tokio::select! {
                report = self.reports.recv() => match report {
                    Some(ConnectionEvent::Delivery(delivery)) => {
                        return Some(delivery.into_broker_message(&self.topic));
                    }
                    Some(ConnectionEvent::Closed { connection }) => self.connection_closed(connection),
                    None => return None,
                },
                () = stop_requested(&mut self.stop) => self.close().await,
                () = sleep_until(next_poll.unwrap_or_else(Instant::now)), if next_poll.is_some() => {
                    self.refresh_producers().await;
                }
            }
        }
    }

    async fn ack(&mut self, message: &BrokerMessage) -> Result<(), ConnectorError> {
        let writer = self
            .connections
            .get(message.tag.connection)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                ConnectorError::broker(format!(
                    "no nsqd connection {} for {}",
                    message.tag.connection, self.topic
                ))
            })?;
        let id: &[u8; MESSAGE_ID_LEN] = message
            .tag
            .message_id
            .as_slice()
            .try_into()
            .map_err(|_| ConnectorError::broker("message id must be 16 bytes"))?;

        send_command(writer, Command::Fin(id))
            .await
            .map_err(|err| ConnectorError::broker(format!("unable to send FIN: {err}")))
    }
}
