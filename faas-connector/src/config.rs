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

//! Runtime settings shared by the synchronizer, consumers and invokers.

use crate::error::ConnectorError;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "http://gateway:8080";
pub const DEFAULT_CONSUMER_GROUP: &str = "openfaas-channel";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REBUILD_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Base address of the gateway serving both the registry and the functions.
    pub gateway_url: String,
    pub topics: Vec<String>,
    pub consumer_group: String,
    pub upstream_timeout: Duration,
    pub rebuild_interval: Duration,
    pub print_response: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            topics: Vec::new(),
            consumer_group: DEFAULT_CONSUMER_GROUP.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            rebuild_interval: DEFAULT_REBUILD_INTERVAL,
            print_response: false,
        }
    }
}

impl ConnectorConfig {
    pub fn with_topics(topics: Vec<String>) -> Self {
        Self {
            topics,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.topics.is_empty() {
            return Err(ConnectorError::config(
                r#"provide a list of topics i.e. topics="payment_published,slack_joined""#,
            ));
        }
        if self.rebuild_interval.is_zero() {
            return Err(ConnectorError::config("rebuild interval must be non-zero"));
        }
        if self.upstream_timeout.is_zero() {
            return Err(ConnectorError::config("upstream timeout must be non-zero"));
        }
        if self.consumer_group.trim().is_empty() {
            return Err(ConnectorError::config("consumer group must not be empty"));
        }
        Ok(())
    }
}

/// Splits a comma separated topic list, dropping empty entries.
pub fn parse_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

/// Only exactly `1` or `true` enable; everything else, `TRUE` included, disables.
pub fn parse_flag(raw: &str) -> bool {
    raw == "1" || raw == "true"
}
