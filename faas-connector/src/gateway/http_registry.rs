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

use crate::api::registry::{LookupEntry, RegistryClient};
use crate::config::parse_topics;
use crate::error::ConnectorError;
use crate::gateway::{build_client, endpoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Annotation holding a function's comma separated topic list.
pub const TOPIC_ANNOTATION: &str = "topic";

#[derive(Debug, Deserialize)]
struct FunctionStatus {
    name: String,
    #[serde(default)]
    annotations: Option<HashMap<String, String>>,
}

fn lookup_entries(functions: Vec<FunctionStatus>) -> Vec<LookupEntry> {
    functions
        .into_iter()
        .filter_map(|function| {
            let topics = function
                .annotations
                .as_ref()
                .and_then(|annotations| annotations.get(TOPIC_ANNOTATION))
                .map(|raw| parse_topics(raw))?;
            Some(LookupEntry {
                function: function.name,
                topics,
            })
        })
        .collect()
}

/// Lists deployed functions through the gateway's `/system/functions` endpoint.
pub struct GatewayRegistry {
    url: String,
    client: reqwest::Client,
}

impl GatewayRegistry {
    pub fn new(gateway_url: &str, timeout: Duration) -> Result<Self, ConnectorError> {
        Ok(Self {
            url: endpoint(gateway_url, "system/functions"),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl RegistryClient for GatewayRegistry {
    async fn list_functions(&self) -> Result<Vec<LookupEntry>, ConnectorError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| ConnectorError::registry(format!("GET {}: {err}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::registry(format!(
                "GET {} returned {status}",
                self.url
            )));
        }

        let functions: Vec<FunctionStatus> = response.json().await.map_err(|err| {
            ConnectorError::registry(format!("unable to decode function list: {err}"))
        })?;
        debug!("registry listed {} functions", functions.len());

        Ok(lookup_entries(functions))
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup_entries, FunctionStatus, GatewayRegistry};
    use crate::api::registry::{LookupEntry, RegistryClient};
    use crate::error::ConnectorError;
    use crate::gateway::test_server::serve_once;
    use std::time::Duration;

    #[test]
    fn topic_annotation_is_split_into_entries() {
        let functions: Vec<FunctionStatus> = serde_json::from_str(
            r#"[
                {"name": "figlet", "image": "functions/figlet", "annotations": {"topic": "faas-request,payment_published"}},
                {"name": "nodeinfo", "annotations": null},
                {"name": "env"},
                {"name": "echo", "annotations": {"com.openfaas.scale.min": "1"}}
            ]"#,
        )
        .expect("valid function list");

        assert_eq!(
            lookup_entries(functions),
            vec![LookupEntry::new(
                "figlet",
                ["faas-request", "payment_published"]
            )]
        );
    }

    #[tokio::test]
    async fn list_functions_queries_system_functions() {
        let (address, request) = serve_once(
            "200 OK",
            r#"[{"name":"figlet","annotations":{"topic":"faas-request"}}]"#,
        )
        .await;
        let registry =
            GatewayRegistry::new(&format!("{address}/"), Duration::from_secs(5)).expect("client");

        let entries = registry.list_functions().await.expect("listing succeeds");

        assert_eq!(entries, vec![LookupEntry::new("figlet", ["faas-request"])]);
        let request = request.await.expect("server task");
        assert!(request.starts_with("GET /system/functions HTTP/1.1"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_registry_error() {
        let (address, _request) = serve_once("500 Internal Server Error", "oops").await;
        let registry = GatewayRegistry::new(&address, Duration::from_secs(5)).expect("client");

        let result = registry.list_functions().await;

        assert!(matches!(result, Err(ConnectorError::Registry(_))));
    }
}
