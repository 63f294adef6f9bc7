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

use crate::lock;
use async_trait::async_trait;
use faas_connector::{Broker, BrokerMessage, ConnectorError, DeliveryTag, Subscription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Encodes a message body the way publishers do: `{"topic": .., "value": ..}`.
pub fn envelope(topic: &str, value: &str) -> Vec<u8> {
    serde_json::json!({ "topic": topic, "value": value })
        .to_string()
        .into_bytes()
}

struct TopicQueue {
    sender: Option<UnboundedSender<Vec<u8>>>,
    receiver: Option<UnboundedReceiver<Vec<u8>>>,
}

impl TopicQueue {
    fn open() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            sender: Some(sender),
            receiver: Some(receiver),
        }
    }
}

/// Broker keeping one queue per topic.
///
/// Messages published before a consumer subscribes are buffered. Closing a
/// topic lets its subscription drain what is queued and then end.
#[derive(Default)]
pub struct InMemoryBroker {
    queues: Mutex<HashMap<String, TopicQueue>>,
    closed: AtomicBool,
    subscribe_error: Mutex<Option<ConnectorError>>,
    acked: Arc<Mutex<Vec<BrokerMessage>>>,
}

impl InMemoryBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with_queue<R>(&self, topic: &str, f: impl FnOnce(&mut TopicQueue) -> R) -> R {
        let mut queues = lock(&self.queues);
        let queue = queues
            .entry(topic.to_string())
            .or_insert_with(TopicQueue::open);
        if self.closed.load(Ordering::SeqCst) {
            queue.sender = None;
        }
        f(queue)
    }

    /// Queues a raw body; `false` once the topic has been closed.
    pub fn publish(&self, topic: &str, body: impl Into<Vec<u8>>) -> bool {
        let body = body.into();
        self.with_queue(topic, |queue| match &queue.sender {
            Some(sender) => sender.send(body).is_ok(),
            None => false,
        })
    }

    pub fn publish_value(&self, topic: &str, value: &str) -> bool {
        self.publish(topic, envelope(topic, value))
    }

    pub fn close(&self, topic: &str) {
        self.with_queue(topic, |queue| queue.sender = None);
    }

    /// Closes every topic, including ones nobody has touched yet.
    pub fn close_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for queue in lock(&self.queues).values_mut() {
            queue.sender = None;
        }
    }

    /// Makes every following `subscribe` call fail with `error`.
    pub fn fail_subscriptions_with(&self, error: ConnectorError) {
        *lock(&self.subscribe_error) = Some(error);
    }

    pub fn acked(&self) -> Vec<BrokerMessage> {
        lock(&self.acked).clone()
    }

    pub fn acked_count(&self, topic: &str) -> usize {
        lock(&self.acked)
            .iter()
            .filter(|message| message.topic == topic)
            .count()
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    async fn subscribe(
        &self,
        topic: &str,
        _consumer_group: &str,
    ) -> Result<Box<dyn Subscription>, ConnectorError> {
        if let Some(error) = lock(&self.subscribe_error).clone() {
            return Err(error);
        }

        let receiver = self
            .with_queue(topic, |queue| queue.receiver.take())
            .ok_or_else(|| ConnectorError::broker(format!("{topic} already has a subscriber")))?;
        debug!("in-memory subscription opened for {topic}");

        Ok(Box::new(InMemorySubscription {
            topic: topic.to_string(),
            receiver,
            acked: self.acked.clone(),
            delivered: 0,
        }))
    }
}

struct InMemorySubscription {
    topic: String,
    receiver: UnboundedReceiver<Vec<u8>>,
    acked: Arc<Mutex<Vec<BrokerMessage>>>,
    delivered: u64,
}

#[async_trait]
impl Subscription for InMemorySubscription {
    async fn next_message(&mut self) -> Option<BrokerMessage> {
        let body = self.receiver.recv().await?;
        self.delivered += 1;
        Some(BrokerMessage {
            topic: self.topic.clone(),
            body,
            tag: DeliveryTag {
                connection: 0,
                message_id: self.delivered.to_be_bytes().to_vec(),
            },
        })
    }

    async fn ack(&mut self, message: &BrokerMessage) -> Result<(), ConnectorError> {
        lock(&self.acked).push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{envelope, InMemoryBroker};
    use faas_connector::{Broker, ConnectorError, Subscription};

    #[tokio::test]
    async fn buffered_messages_drain_before_close_ends_the_subscription() {
        let broker = InMemoryBroker::new();
        assert!(broker.publish_value("faas-request", "one"));
        broker.close("faas-request");
        assert!(!broker.publish_value("faas-request", "two"));

        let mut subscription = broker
            .subscribe("faas-request", "group")
            .await
            .expect("subscribed");

        let message = subscription.next_message().await.expect("buffered message");
        assert_eq!(message.body, envelope("faas-request", "one"));
        subscription.ack(&message).await.expect("ack");
        assert!(subscription.next_message().await.is_none());
        assert_eq!(broker.acked_count("faas-request"), 1);
    }

    #[tokio::test]
    async fn second_subscriber_and_scripted_failures_are_rejected() {
        let broker = InMemoryBroker::new();
        assert!(broker.subscribe("faas-request", "group").await.is_ok());
        assert!(broker.subscribe("faas-request", "group").await.is_err());

        broker.fail_subscriptions_with(ConnectorError::broker("lookupd unreachable"));
        assert_eq!(
            broker.subscribe("other", "group").await.err(),
            Some(ConnectorError::broker("lookupd unreachable"))
        );
    }
}
