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

//! NSQ implementation of the connector's [`faas_connector::Broker`].
//!
//! Producers of a topic are discovered through nsqlookupd. Each consumer
//! subscribes to every producer with the consumer group as NSQ channel and
//! keeps one message in flight per connection. Subscriptions keep polling
//! nsqlookupd, so later producers and restarted nsqd instances are picked up.

mod broker;
mod connection;
mod events;
pub mod frame;
pub mod lookup;
mod subscription;

pub use broker::{NsqBroker, NsqConfig, DEFAULT_LOOKUPD_HTTP_PORT, DEFAULT_LOOKUPD_POLL_INTERVAL};
pub use subscription::NsqSubscription;
