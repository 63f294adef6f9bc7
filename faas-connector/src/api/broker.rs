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

use crate::error::ConnectorError;
use async_trait::async_trait;

/// Identifies a delivered message towards the subscription that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeliveryTag {
    /// Index of the broker connection inside the subscription.
    pub connection: usize,
    pub message_id: Vec<u8>,
}

/// A raw message as delivered by the broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerMessage {
    pub topic: String,
    pub body: Vec<u8>,
    pub tag: DeliveryTag,
}

/// Hands out one subscription per topic.
///
/// `subscribe` is called from the consumer's own worker thread, so any I/O
/// resources an implementation opens belong to that thread's runtime.
#[async_trait]
pub trait Broker: Send + Sync {
    async fn subscribe(
        &self,
        topic: &str,
        consumer_group: &str,
    ) -> Result<Box<dyn Subscription>, ConnectorError>;
}

/// Stream of messages for one topic.
#[async_trait]
pub trait Subscription: Send {
    /// Waits for the next message; `None` once the broker has shut the
    /// subscription down (connection closed or stop signal raised).
    async fn next_message(&mut self) -> Option<BrokerMessage>;

    /// Marks a message as handled so the broker does not redeliver it.
    async fn ack(&mut self, message: &BrokerMessage) -> Result<(), ConnectorError>;
}
