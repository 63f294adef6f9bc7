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

//! Decoding of broker message bodies into inbound message units.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A decoded (topic, payload) unit handed to the invoker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    NotAnObject,
    NotAString(&'static str),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed message envelope: {err}"),
            Self::NotAnObject => write!(f, "malformed message envelope: not a JSON object"),
            Self::NotAString(field) => {
                write!(f, "malformed message envelope: {field} is not a string")
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

// An exact key wins over one differing only in case.
fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn string_field(object: &Map<String, Value>, name: &'static str) -> Result<String, DecodeError> {
    match field(object, name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(DecodeError::NotAString(name)),
    }
}

/// Parses a `{"topic": ..., "value": ...}` body.
///
/// Field names match regardless of case. An envelope without a topic is
/// routed on `delivered_topic`, the topic the broker delivered it on.
pub fn decode_envelope(body: &[u8], delivered_topic: &str) -> Result<InboundMessage, DecodeError> {
    let object = match serde_json::from_slice(body).map_err(DecodeError::Json)? {
        Value::Object(object) => object,
        _ => return Err(DecodeError::NotAnObject),
    };

    let topic = string_field(&object, "topic")?;
    let value = string_field(&object, "value")?;

    Ok(InboundMessage {
        topic: if topic.is_empty() {
            delivered_topic.to_string()
        } else {
            topic
        },
        payload: value.into_bytes(),
    })
}
