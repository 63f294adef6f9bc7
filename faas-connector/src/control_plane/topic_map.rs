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

//! Shared topic -> function table with snapshot-swap replacement.

use arc_swap::ArcSwap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type FunctionSet = HashSet<String>;
pub type TopicSnapshot = HashMap<String, FunctionSet>;

/// Read handle over the current routing snapshot.
///
/// Cloning is cheap; every clone observes the same table. Readers never wait
/// on a rebuild: they load whichever snapshot was installed last.
#[derive(Clone)]
pub struct TopicMap {
    current: Arc<ArcSwap<TopicSnapshot>>,
}

/// Sole write handle over a [`TopicMap`]. Not cloneable.
pub struct TopicMapWriter {
    current: Arc<ArcSwap<TopicSnapshot>>,
}

impl TopicMap {
    /// Creates an empty table together with its only writer.
    pub fn with_writer() -> (TopicMap, TopicMapWriter) {
        let current = Arc::new(ArcSwap::from_pointee(TopicSnapshot::new()));
        (
            TopicMap {
                current: current.clone(),
            },
            TopicMapWriter { current },
        )
    }

    /// Functions subscribed to `topic`; empty when the topic is unknown.
    pub fn lookup(&self, topic: &str) -> FunctionSet {
        self.current
            .load()
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Arc<TopicSnapshot> {
        self.current.load_full()
    }

    pub fn topic_count(&self) -> usize {
        self.current.load().len()
    }
}

impl TopicMapWriter {
    /// Installs `mapping` as the new snapshot in one step.
    pub fn replace(&self, mapping: TopicSnapshot) {
        self.current.store(Arc::new(mapping));
    }
}
