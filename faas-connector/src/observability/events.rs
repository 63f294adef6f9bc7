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

// control plane
pub const TOPIC_MAP_SYNC: &str = "topic_map_sync";
pub const TOPIC_MAP_SYNC_FAILED: &str = "topic_map_sync_failed";

// data plane
pub const CONSUMER_SUBSCRIBING: &str = "consumer_subscribing";
pub const CONSUMER_SUBSCRIBE_FAILED: &str = "consumer_subscribe_failed";
pub const CONSUMER_LISTENING: &str = "consumer_listening";
pub const CONSUMER_RECEIVED: &str = "consumer_received";
pub const CONSUMER_DECODE_FAILED: &str = "consumer_decode_failed";
pub const CONSUMER_ACK_FAILED: &str = "consumer_ack_failed";
pub const CONSUMER_STOPPED: &str = "consumer_stopped";

pub const INVOKE_NO_SUBSCRIBERS: &str = "invoke_no_subscribers";
pub const INVOKE_SEND_ATTEMPT: &str = "invoke_send_attempt";
pub const INVOKE_SEND_OK: &str = "invoke_send_ok";
pub const INVOKE_SEND_FAILED: &str = "invoke_send_failed";
pub const INVOKE_RESPONSE_BODY: &str = "invoke_response_body";

// runtime
pub const WORKER_START: &str = "worker_start";
pub const WORKER_EXIT: &str = "worker_exit";
