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
use faas_connector::{ConnectorError, LookupEntry, RegistryClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Registry answering every lookup with whatever it was last told.
pub struct ScriptedRegistry {
    answer: Mutex<Result<Vec<LookupEntry>, ConnectorError>>,
    lookups: AtomicUsize,
}

impl ScriptedRegistry {
    pub fn new(functions: Vec<LookupEntry>) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Ok(functions)),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn set_functions(&self, functions: Vec<LookupEntry>) {
        *lock(&self.answer) = Ok(functions);
    }

    pub fn fail_with(&self, error: ConnectorError) {
        *lock(&self.answer) = Err(error);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryClient for ScriptedRegistry {
    async fn list_functions(&self) -> Result<Vec<LookupEntry>, ConnectorError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        lock(&self.answer).clone()
    }
}
