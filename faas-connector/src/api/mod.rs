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

//! Collaborator seams.
//!
//! The routing core talks to the outside world only through these traits:
//! a [`RegistryClient`](registry::RegistryClient) that lists functions and their
//! topics, a [`Broker`](broker::Broker) that hands out per-topic subscriptions,
//! and a [`FunctionGateway`](function_gateway::FunctionGateway) that performs one
//! outbound call per function.

pub mod broker;
pub mod function_gateway;
pub mod registry;
