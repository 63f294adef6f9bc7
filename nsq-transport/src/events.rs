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

pub(crate) const LOOKUP_NO_PRODUCERS: &str = "nsq_lookup_no_producers";
pub(crate) const LOOKUP_PRODUCERS: &str = "nsq_lookup_producers";
pub(crate) const LOOKUP_FAILED: &str = "nsq_lookup_failed";

pub(crate) const CONNECTION_SUBSCRIBED: &str = "nsq_connection_subscribed";
pub(crate) const CONNECTION_ERROR_FRAME: &str = "nsq_connection_error_frame";
pub(crate) const CONNECTION_CLOSED: &str = "nsq_connection_closed";
pub(crate) const CONNECTION_READ_FAILED: &str = "nsq_connection_read_failed";

pub(crate) const SUBSCRIPTION_CLOSING: &str = "nsq_subscription_closing";
pub(crate) const SUBSCRIPTION_CLOSE_FAILED: &str = "nsq_subscription_close_failed";
pub(crate) const SUBSCRIPTION_PRODUCER_ADDED: &str = "nsq_subscription_producer_added";
pub(crate) const SUBSCRIPTION_PRODUCER_FAILED: &str = "nsq_subscription_producer_failed";
pub(crate) const SUBSCRIPTION_CONNECTION_LOST: &str = "nsq_subscription_connection_lost";
