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

use crate::{lock, wait_until};
use async_trait::async_trait;
use faas_connector::{FunctionGateway, FunctionGatewayFactory, FunctionResponse, InvocationError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub function: String,
    pub payload: Vec<u8>,
}

/// Gateway that records every call and answers `200 OK` unless told otherwise.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<RecordedCall>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hands the same recorder to every consumer thread.
    pub fn factory(self: &Arc<Self>) -> FunctionGatewayFactory {
        let gateway = self.clone();
        Arc::new(move || {
            let gateway: Arc<dyn FunctionGateway> = gateway.clone();
            Ok(gateway)
        })
    }

    /// Calls to `function` are recorded and then answered with `500`.
    pub fn fail_function(&self, function: &str) {
        lock(&self.failing).insert(function.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, function: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.function == function)
            .cloned()
            .collect()
    }

    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        wait_until(timeout, || lock(&self.calls).len() >= count).await
    }
}

#[async_trait]
impl FunctionGateway for RecordingGateway {
    async fn call(
        &self,
        function: &str,
        payload: &[u8],
    ) -> Result<FunctionResponse, InvocationError> {
        lock(&self.calls).push(RecordedCall {
            function: function.to_string(),
            payload: payload.to_vec(),
        });

        if lock(&self.failing).contains(function) {
            return Err(InvocationError::Status {
                status: 500,
                body: format!("{function} failed"),
            });
        }

        Ok(FunctionResponse {
            status: 200,
            body: format!("{function} ok").into_bytes(),
        })
    }
}
