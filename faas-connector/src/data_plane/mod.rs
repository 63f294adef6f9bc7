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

//! Data-plane layer.
//!
//! Owns the per-topic consumer loop and the invoker fan-out. Consumers decode
//! broker bodies into inbound units and hand them to the invoker one at a time;
//! the invoker reads the shared topic map and calls each subscribed function
//! independently.

pub(crate) mod consumer;
pub(crate) mod envelope;
pub(crate) mod invoker;

pub use consumer::Consumer;
pub use envelope::{decode_envelope, DecodeError, InboundMessage};
pub use invoker::{InvocationSummary, Invoker};
