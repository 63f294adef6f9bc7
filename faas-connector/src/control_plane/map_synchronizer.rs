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

//! Periodic rebuild of the topic map from the registry.

use crate::api::registry::RegistryClient;
use crate::control_plane::topic_index::build_topic_snapshot;
use crate::control_plane::topic_map::TopicMapWriter;
use crate::error::ConnectorError;
use crate::observability::events;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

const COMPONENT: &str = "map_synchronizer";

pub struct MapSynchronizer {
    registry: Arc<dyn RegistryClient>,
    writer: TopicMapWriter,
    rebuild_interval: Duration,
}

impl MapSynchronizer {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        writer: TopicMapWriter,
        rebuild_interval: Duration,
    ) -> Self {
        Self {
            registry,
            writer,
            rebuild_interval,
        }
    }

    /// Runs one poll-and-replace cycle and returns the number of topics installed.
    ///
    /// On registry failure the current snapshot is left untouched.
    pub async fn rebuild_once(&self) -> Result<usize, ConnectorError> {
        let entries = match self.registry.list_functions().await {
            Ok(entries) => entries,
            Err(err) => {
                error!(
                    event = events::TOPIC_MAP_SYNC_FAILED,
                    component = COMPONENT,
                    err = %err,
                    "unable to list functions from registry"
                );
                return Err(err);
            }
        };

        let snapshot = build_topic_snapshot(&entries);
        let topics = snapshot.len();
        self.writer.replace(snapshot);

        info!(
            event = events::TOPIC_MAP_SYNC,
            component = COMPONENT,
            functions = entries.len(),
            topics,
            "syncing topic map"
        );
        Ok(topics)
    }

    /// Rebuilds on every tick, first tick one interval after start.
    ///
    /// Only returns on a registry failure, which the caller treats as fatal.
    pub async fn run(self) -> Result<(), ConnectorError> {
        let mut ticker = interval_at(
            Instant::now() + self.rebuild_interval,
            self.rebuild_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.rebuild_once().await?;
        }
    }
}
