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

//! Per-topic consumer loop: subscribe, decode, dispatch, acknowledge.

use crate::api::broker::{Broker, BrokerMessage};
use crate::data_plane::envelope::decode_envelope;
use crate::data_plane::invoker::{InvocationSummary, Invoker};
use crate::error::ConnectorError;
use crate::observability::{events, fields};
use std::sync::Arc;
use tracing::{error, info, warn};

const COMPONENT: &str = "consumer";

const RECEIVED_COUNTER_WRAP: u32 = i32::MAX as u32;

pub struct Consumer {
    topic: String,
    consumer_group: String,
    broker: Arc<dyn Broker>,
    invoker: Invoker,
    received: u32,
}

impl Consumer {
    pub fn new(topic: &str, consumer_group: &str, broker: Arc<dyn Broker>, invoker: Invoker) -> Self {
        Self {
            topic: topic.to_string(),
            consumer_group: consumer_group.to_string(),
            broker,
            invoker,
            received: 0,
        }
    }

    /// Subscribes and handles messages one at a time until the broker stops.
    ///
    /// Only a failed subscription is returned as an error.
    pub async fn run(mut self) -> Result<(), ConnectorError> {
        info!(
            event = events::CONSUMER_SUBSCRIBING,
            component = COMPONENT,
            topic = self.topic.as_str(),
            consumer_group = self.consumer_group.as_str(),
            "subscribing to topic"
        );

        let mut subscription = match self
            .broker
            .subscribe(&self.topic, &self.consumer_group)
            .await
        {
            Ok(subscription) => subscription,
            Err(err) => {
                error!(
                    event = events::CONSUMER_SUBSCRIBE_FAILED,
                    component = COMPONENT,
                    topic = self.topic.as_str(),
                    err = %err,
                    "unable to subscribe to topic"
                );
                return Err(err);
            }
        };

        info!(
            event = events::CONSUMER_LISTENING,
            component = COMPONENT,
            topic = self.topic.as_str(),
            "listening for messages"
        );

        while let Some(message) = subscription.next_message().await {
            self.handle_message(&message).await;

            if let Err(err) = subscription.ack(&message).await {
                warn!(
                    event = events::CONSUMER_ACK_FAILED,
                    component = COMPONENT,
                    topic = self.topic.as_str(),
                    err = %err,
                    "unable to acknowledge message"
                );
            }
        }

        info!(
            event = events::CONSUMER_STOPPED,
            component = COMPONENT,
            topic = self.topic.as_str(),
            received = self.received,
            "subscription closed, consumer stopped"
        );
        Ok(())
    }

    /// Decodes one message and dispatches it; `None` when the body was dropped.
    pub async fn handle_message(&mut self, message: &BrokerMessage) -> Option<InvocationSummary> {
        let inbound = match decode_envelope(&message.body, &message.topic) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(
                    event = events::CONSUMER_DECODE_FAILED,
                    component = COMPONENT,
                    topic = self.topic.as_str(),
                    err = %err,
                    "dropping malformed message"
                );
                return None;
            }
        };

        self.received = (self.received + 1) % RECEIVED_COUNTER_WRAP;
        info!(
            event = events::CONSUMER_RECEIVED,
            component = COMPONENT,
            seq = self.received,
            topic = inbound.topic.as_str(),
            value = %fields::format_payload(&inbound.payload),
            "received message"
        );

        Some(self.invoker.invoke(&inbound.topic, &inbound.payload).await)
    }
}
