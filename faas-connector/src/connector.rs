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

use crate::api::broker::Broker;
use crate::api::function_gateway::FunctionGatewayFactory;
use crate::api::registry::RegistryClient;
use crate::config::ConnectorConfig;
use crate::control_plane::{MapSynchronizer, TopicMap, TopicMapWriter};
use crate::data_plane::{Consumer, Invoker};
use crate::error::ConnectorError;
use crate::runtime::worker_runtime::spawn_worker;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, error, info, warn};

const CONNECTOR_TAG: &str = "Connector:";
const CONNECTOR_FN_NEW_TAG: &str = "new():";
const CONNECTOR_FN_RUN_TAG: &str = "run():";

const SYNCHRONIZER_WORKER: &str = "topic-map-sync";

fn consumer_worker_name(topic: &str) -> String {
    format!("consumer-{topic}")
}

/// Wires the synchronizer and one consumer per topic around a shared topic map.
pub struct Connector {
    config: ConnectorConfig,
    registry: Arc<dyn RegistryClient>,
    broker: Arc<dyn Broker>,
    gateway_factory: FunctionGatewayFactory,
    topic_map: TopicMap,
    writer: TopicMapWriter,
}

impl Connector {
    pub fn new(
        config: ConnectorConfig,
        registry: Arc<dyn RegistryClient>,
        broker: Arc<dyn Broker>,
        gateway_factory: FunctionGatewayFactory,
    ) -> Result<Self, ConnectorError> {
        config.validate()?;
        debug!(
            "{}:{} Connector created for topics {:?}",
            CONNECTOR_TAG, CONNECTOR_FN_NEW_TAG, config.topics
        );

        let (topic_map, writer) = TopicMap::with_writer();
        Ok(Self {
            config,
            registry,
            broker,
            gateway_factory,
            topic_map,
            writer,
        })
    }

    /// Read handle on the routing table this connector maintains.
    pub fn topic_map(&self) -> TopicMap {
        self.topic_map.clone()
    }

    /// Starts every worker and waits.
    ///
    /// Returns `Ok` once all consumers have stopped, or the first fatal error
    /// reported by any worker.
    pub async fn run(self) -> Result<(), ConnectorError> {
        let (exits, mut exit_rx) = unbounded_channel();

        let synchronizer =
            MapSynchronizer::new(self.registry, self.writer, self.config.rebuild_interval);
        spawn_worker(SYNCHRONIZER_WORKER.to_string(), exits.clone(), move || {
            synchronizer.run()
        })?;

        for topic in &self.config.topics {
            let topic = topic.clone();
            let consumer_group = self.config.consumer_group.clone();
            let broker = self.broker.clone();
            let topic_map = self.topic_map.clone();
            let gateway_factory = self.gateway_factory.clone();
            let call_timeout = self.config.upstream_timeout;
            let print_response = self.config.print_response;

            spawn_worker(consumer_worker_name(&topic), exits.clone(), move || async move {
                let gateway = gateway_factory()?;
                let invoker = Invoker::new(topic_map, gateway, call_timeout, print_response);
                Consumer::new(&topic, &consumer_group, broker, invoker)
                    .run()
                    .await
            })?;
        }
        drop(exits);

        info!(
            "{}:{} started {} consumers and the topic map synchronizer",
            CONNECTOR_TAG,
            CONNECTOR_FN_RUN_TAG,
            self.config.topics.len()
        );

        let mut running_consumers = self.config.topics.len();
        while let Some(exit) = exit_rx.recv().await {
            match exit.result {
                Err(err) => {
                    error!(
                        "{}:{} worker {} failed, shutting down: {}",
                        CONNECTOR_TAG, CONNECTOR_FN_RUN_TAG, exit.name, err
                    );
                    return Err(err);
                }
                Ok(()) if exit.name == SYNCHRONIZER_WORKER => {
                    warn!(
                        "{}:{} topic map synchronizer exited without error",
                        CONNECTOR_TAG, CONNECTOR_FN_RUN_TAG
                    );
                }
                Ok(()) => {
                    running_consumers -= 1;
                    debug!(
                        "{}:{} worker {} stopped, {} consumers still running",
                        CONNECTOR_TAG, CONNECTOR_FN_RUN_TAG, exit.name, running_consumers
                    );
                    if running_consumers == 0 {
                        info!(
                            "{}:{} all consumers stopped",
                            CONNECTOR_TAG, CONNECTOR_FN_RUN_TAG
                        );
                        return Ok(());
                    }
                }
            }
        }

        Err(ConnectorError::runtime(
            "workers exited without reporting a result",
        ))
    }
}
