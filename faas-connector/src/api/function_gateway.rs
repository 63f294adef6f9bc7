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

use crate::error::{ConnectorError, InvocationError};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs a single call to a named function.
///
/// Implementations bound every call by their configured timeout and report
/// non-success statuses as [`InvocationError::Status`].
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn call(&self, function: &str, payload: &[u8])
        -> Result<FunctionResponse, InvocationError>;
}

/// Builds a gateway on the worker thread that will use it.
pub type FunctionGatewayFactory =
    Arc<dyn Fn() -> Result<Arc<dyn FunctionGateway>, ConnectorError> + Send + Sync>;
