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

/// One function and the topics it is annotated to receive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupEntry {
    pub function: String,
    pub topics: Vec<String>,
}

impl LookupEntry {
    pub fn new<T: Into<String>>(function: &str, topics: impl IntoIterator<Item = T>) -> Self {
        Self {
            function: function.to_string(),
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of truth for which functions exist and what they subscribe to.
///
/// Implementations must be side-effect free on the registry: the synchronizer
/// calls `list_functions` once per rebuild cycle for the life of the process.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<LookupEntry>, ConnectorError>;
}
