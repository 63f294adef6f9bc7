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

//! # faas-connector
//!
//! `faas-connector` subscribes to a fixed set of broker topics and, for every
//! message received, invokes each function currently registered for that topic
//! with the message value as the request body.
//!
//! Typical usage is centered on [`Connector`], wired with a [`RegistryClient`],
//! a [`Broker`] and a [`FunctionGatewayFactory`].
//!
//! ## Static registry
//!
//! ```
//! use std::sync::Arc;
//! use faas_connector::{Connector, ConnectorConfig, RegistryClient};
//! use integration_test_utils::{InMemoryBroker, RecordingGateway};
//! use registry_static_file::RegistryStaticFile;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry: Arc<dyn RegistryClient> = Arc::new(RegistryStaticFile::new(
//!     "../utils/registry-static-file/static-configs/functions.json",
//! ));
//! let broker = InMemoryBroker::new();
//! let gateway = RecordingGateway::new();
//!
//! let config = ConnectorConfig::with_topics(vec!["faas-request".to_string()]);
//! let connector = Connector::new(config, registry, broker.clone(), gateway.factory()).unwrap();
//!
//! // Closing the broker stops every consumer, which ends `run`.
//! broker.close_all();
//! connector.run().await.unwrap();
//! # });
//! ```
//!
//! ## Gateway registry
//!
//! In a deployment the registry and the functions are both reached through
//! the gateway.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use faas_connector::{Connector, ConnectorConfig, GatewayRegistry, HttpFunctionGateway};
//! # use integration_test_utils::InMemoryBroker;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = ConnectorConfig::with_topics(vec!["faas-request".to_string()]);
//! let registry = Arc::new(GatewayRegistry::new(&config.gateway_url, config.upstream_timeout).unwrap());
//! let gateway = HttpFunctionGateway::factory(&config.gateway_url, Duration::from_secs(30));
//! # let broker = InMemoryBroker::new();
//!
//! let connector = Connector::new(config, registry, broker, gateway).unwrap();
//! connector.run().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API: collaborator traits for registry, broker and function gateway
//! - Control plane: topic map ownership and the periodic synchronizer
//! - Data plane: per-topic consumers and the invoker fan-out
//! - Gateway: HTTP implementations of the registry and function gateway
//! - Runtime: worker thread and runtime boundaries
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod api;
mod config;
mod connector;
mod control_plane;
mod data_plane;
mod error;
mod gateway;
mod runtime;

#[doc(hidden)]
pub mod observability;

pub use api::broker::{Broker, BrokerMessage, DeliveryTag, Subscription};
pub use api::function_gateway::{FunctionGateway, FunctionGatewayFactory, FunctionResponse};
pub use api::registry::{LookupEntry, RegistryClient};
pub use config::{
    parse_flag, parse_topics, ConnectorConfig, DEFAULT_CONSUMER_GROUP, DEFAULT_GATEWAY_URL,
    DEFAULT_REBUILD_INTERVAL, DEFAULT_UPSTREAM_TIMEOUT,
};
pub use connector::Connector;
pub use control_plane::{
    build_topic_snapshot, FunctionSet, MapSynchronizer, TopicMap, TopicMapWriter, TopicSnapshot,
};
pub use data_plane::{
    decode_envelope, Consumer, DecodeError, InboundMessage, InvocationSummary, Invoker,
};
pub use error::{ConnectorError, InvocationError};
pub use gateway::{GatewayRegistry, HttpFunctionGateway, TOPIC_ANNOTATION};
