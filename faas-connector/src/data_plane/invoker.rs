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

//! Fan-out of one inbound message to every function subscribed to its topic.

use crate::api::function_gateway::FunctionGateway;
use crate::control_plane::TopicMap;
use crate::error::InvocationError;
use crate::observability::{events, fields};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const COMPONENT: &str = "invoker";

/// Outcome counts of one `invoke`, used for logging and tests only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvocationSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct Invoker {
    topic_map: TopicMap,
    gateway: Arc<dyn FunctionGateway>,
    call_timeout: Duration,
    print_response: bool,
}

impl Invoker {
    pub fn new(
        topic_map: TopicMap,
        gateway: Arc<dyn FunctionGateway>,
        call_timeout: Duration,
        print_response: bool,
    ) -> Self {
        Self {
            topic_map,
            gateway,
            call_timeout,
            print_response,
        }
    }

    /// Calls every function currently subscribed to `topic` with `payload`.
    ///
    /// Calls run concurrently and are awaited together. A failed call is logged
    /// and never affects the others.
    pub async fn invoke(&self, topic: &str, payload: &[u8]) -> InvocationSummary {
        let functions = self.topic_map.lookup(topic);
        if functions.is_empty() {
            debug!(
                event = events::INVOKE_NO_SUBSCRIBERS,
                component = COMPONENT,
                topic,
                "no functions subscribed, dropping message"
            );
            return InvocationSummary::default();
        }

        let outcomes = join_all(
            functions
                .iter()
                .map(|function| self.call_function(topic, function, payload)),
        )
        .await;

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        InvocationSummary {
            attempted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }

    async fn call_function(&self, topic: &str, function: &str, payload: &[u8]) -> bool {
        debug!(
            event = events::INVOKE_SEND_ATTEMPT,
            component = COMPONENT,
            topic,
            function,
            payload_len = payload.len(),
            "invoking function"
        );

        let result = match tokio::time::timeout(
            self.call_timeout,
            self.gateway.call(function, payload),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(InvocationError::Timeout),
        };

        match result {
            Ok(response) => {
                info!(
                    event = events::INVOKE_SEND_OK,
                    component = COMPONENT,
                    topic,
                    function,
                    status = response.status,
                    response_len = response.body.len(),
                    "function invoked"
                );
                if self.print_response {
                    info!(
                        event = events::INVOKE_RESPONSE_BODY,
                        component = COMPONENT,
                        function,
                        body = %fields::format_payload(&response.body),
                        "function response"
                    );
                }
                true
            }
            Err(err) => {
                warn!(
                    event = events::INVOKE_SEND_FAILED,
                    component = COMPONENT,
                    topic,
                    function,
                    err = %err,
                    "function invocation failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvocationSummary, Invoker};
    use crate::api::function_gateway::{FunctionGateway, FunctionResponse};
    use crate::control_plane::{TopicMap, TopicMapWriter, TopicSnapshot};
    use crate::error::InvocationError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::future::pending;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum Behaviour {
        Succeed,
        Fail,
        Hang,
    }

    /// Records every call and answers per function.
    #[derive(Default)]
    struct RecordingGateway {
        behaviour: HashMap<String, Behaviour>,
        calls: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl RecordingGateway {
        fn with(behaviour: &[(&str, Behaviour)]) -> Arc<Self> {
            Arc::new(Self {
                behaviour: behaviour
                    .iter()
                    .map(|(function, behaviour)| (function.to_string(), *behaviour))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn called_functions(&self) -> Vec<String> {
            let mut functions: Vec<String> = self
                .calls
                .lock()
                .expect("lock calls")
                .iter()
                .map(|(function, _)| function.clone())
                .collect();
            functions.sort();
            functions
        }
    }

    #[async_trait]
    impl FunctionGateway for RecordingGateway {
        async fn call(
            &self,
            function: &str,
            payload: &[u8],
        ) -> Result<FunctionResponse, InvocationError> {
            self.calls
                .lock()
                .expect("lock calls")
                .push((function.to_string(), payload.to_vec()));

            match self
                .behaviour
                .get(function)
                .copied()
                .unwrap_or(Behaviour::Succeed)
            {
                Behaviour::Succeed => Ok(FunctionResponse {
                    status: 200,
                    body: b"ok".to_vec(),
                }),
                Behaviour::Fail => Err(InvocationError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }),
                Behaviour::Hang => pending().await,
            }
        }
    }

    fn topic_map(entries: &[(&str, &[&str])]) -> (TopicMap, TopicMapWriter) {
        let (topic_map, writer) = TopicMap::with_writer();
        let snapshot: TopicSnapshot = entries
            .iter()
            .map(|(topic, functions)| {
                (
                    topic.to_string(),
                    functions.iter().map(|f| f.to_string()).collect(),
                )
            })
            .collect();
        writer.replace(snapshot);
        (topic_map, writer)
    }

    #[tokio::test]
    async fn empty_function_set_performs_no_calls() {
        let (topic_map, _writer) = topic_map(&[]);
        let gateway = RecordingGateway::with(&[]);
        let invoker = Invoker::new(topic_map, gateway.clone(), Duration::from_secs(30), false);

        let summary = invoker.invoke("faas-request", b"payload").await;

        assert_eq!(summary, InvocationSummary::default());
        assert!(gateway.called_functions().is_empty());
    }

    #[tokio::test]
    async fn every_subscribed_function_receives_the_payload() {
        let (topic_map, _writer) = topic_map(&[("faas-request", &["f1", "f2"])]);
        let gateway = RecordingGateway::with(&[]);
        let invoker = Invoker::new(topic_map, gateway.clone(), Duration::from_secs(30), true);

        let summary = invoker.invoke("faas-request", b"payload").await;

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(gateway.called_functions(), vec!["f1", "f2"]);
        assert!(gateway
            .calls
            .lock()
            .expect("lock calls")
            .iter()
            .all(|(_, payload)| payload == b"payload"));
    }

    #[tokio::test]
    async fn failing_function_does_not_prevent_other_calls() {
        let (topic_map, _writer) = topic_map(&[("faas-request", &["f1", "f2"])]);
        let gateway = RecordingGateway::with(&[("f1", Behaviour::Fail)]);
        let invoker = Invoker::new(topic_map, gateway.clone(), Duration::from_secs(30), false);

        let summary = invoker.invoke("faas-request", b"payload").await;

        assert_eq!(
            summary,
            InvocationSummary {
                attempted: 2,
                succeeded: 1,
                failed: 1,
            }
        );
        assert_eq!(gateway.called_functions(), vec!["f1", "f2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_function_is_bounded_by_call_timeout() {
        let (topic_map, _writer) = topic_map(&[("faas-request", &["slow", "fast"])]);
        let gateway = RecordingGateway::with(&[("slow", Behaviour::Hang)]);
        let invoker = Invoker::new(topic_map, gateway.clone(), Duration::from_secs(30), false);

        let summary = invoker.invoke("faas-request", b"payload").await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn lookup_follows_latest_snapshot() {
        let (topic_map, writer) = topic_map(&[("faas-request", &["f1"])]);
        let gateway = RecordingGateway::with(&[]);
        let invoker = Invoker::new(topic_map, gateway.clone(), Duration::from_secs(30), false);

        writer.replace(TopicSnapshot::new());
        let summary = invoker.invoke("faas-request", b"payload").await;

        assert_eq!(summary.attempted, 0);
        assert!(gateway.called_functions().is_empty());
    }
}
