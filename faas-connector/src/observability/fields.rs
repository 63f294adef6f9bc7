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

use std::borrow::Cow;

const MAX_LOGGED_PAYLOAD: usize = 512;

/// Renders a payload for log output, lossily decoded and truncated.
pub fn format_payload(payload: &[u8]) -> Cow<'_, str> {
    if payload.len() <= MAX_LOGGED_PAYLOAD {
        return String::from_utf8_lossy(payload);
    }
    let mut rendered = String::from_utf8_lossy(&payload[..MAX_LOGGED_PAYLOAD]).into_owned();
    rendered.push_str("...");
    Cow::Owned(rendered)
}
