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

//! Error types surfaced by the connector and its collaborators.

use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Failures that stop the connector.
///
/// Every variant is fatal: a worker returning one of these ends the process.
/// Per-message and per-invocation problems never become a `ConnectorError`.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The registry could not be queried or its answer could not be understood.
    Registry(String),
    /// The broker subscription could not be established.
    Broker(String),
    /// Configuration is missing or invalid.
    Config(String),
    /// A worker thread or its runtime could not be started, or it panicked.
    Runtime(String),
}

impl ConnectorError {
    pub fn registry(msg: impl Into<String>) -> Self {
        ConnectorError::Registry(msg.into())
    }

    pub fn broker(msg: impl Into<String>) -> Self {
        ConnectorError::Broker(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ConnectorError::Config(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        ConnectorError::Runtime(msg.into())
    }
}

impl Debug for ConnectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Registry(msg) => write!(f, "Registry({msg:?})"),
            ConnectorError::Broker(msg) => write!(f, "Broker({msg:?})"),
            ConnectorError::Config(msg) => write!(f, "Config({msg:?})"),
            ConnectorError::Runtime(msg) => write!(f, "Runtime({msg:?})"),
        }
    }
}

impl Display for ConnectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Registry(msg) => write!(f, "registry lookup failed: {msg}"),
            ConnectorError::Broker(msg) => write!(f, "broker subscription failed: {msg}"),
            ConnectorError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            ConnectorError::Runtime(msg) => write!(f, "worker runtime failure: {msg}"),
        }
    }
}

impl Error for ConnectorError {}

/// Failure of a single downstream function call.
///
/// Logged by the invoker and then dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationError {
    /// The call did not complete within the upstream timeout.
    Timeout,
    /// The request could not be sent or the response could not be read.
    Transport(String),
    /// The function answered with a non-success status.
    Status { status: u16, body: String },
}

impl Display for InvocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::Timeout => write!(f, "call timed out"),
            InvocationError::Transport(msg) => write!(f, "transport error: {msg}"),
            InvocationError::Status { status, body } => {
                write!(f, "unexpected status {status}: {body}")
            }
        }
    }
}

impl Error for InvocationError {}
