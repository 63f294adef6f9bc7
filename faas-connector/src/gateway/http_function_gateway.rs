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

use crate::api::function_gateway::{FunctionGateway, FunctionGatewayFactory, FunctionResponse};
use crate::error::{ConnectorError, InvocationError};
use crate::gateway::{build_client, endpoint};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

fn transport_error(err: reqwest::Error) -> InvocationError {
    if err.is_timeout() {
        InvocationError::Timeout
    } else {
        InvocationError::Transport(err.to_string())
    }
}

/// Calls functions with `POST <gateway>/function/<name>`.
pub struct HttpFunctionGateway {
    gateway_url: String,
    client: reqwest::Client,
}

impl HttpFunctionGateway {
    pub fn new(gateway_url: &str, timeout: Duration) -> Result<Self, ConnectorError> {
        Ok(Self {
            gateway_url: gateway_url.to_string(),
            client: build_client(timeout)?,
        })
    }

    /// Factory building one client per consumer thread.
    pub fn factory(gateway_url: &str, timeout: Duration) -> FunctionGatewayFactory {
        let gateway_url = gateway_url.to_string();
        Arc::new(move || {
            let gateway: Arc<dyn FunctionGateway> =
                Arc::new(HttpFunctionGateway::new(&gateway_url, timeout)?);
            Ok(gateway)
        })
    }

    fn function_url(&self, function: &str) -> String {
        endpoint(&self.gateway_url, &format!("function/{function}"))
    }
}

#[async_trait]
impl FunctionGateway for HttpFunctionGateway {
    async fn call(
        &self,
        function: &str,
        payload: &[u8],
    ) -> Result<FunctionResponse, InvocationError> {
        let response = self
            .client
            .post(self.function_url(function))
            .body(payload.to_vec())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        if !(200..300).contains(&status) {
            return Err(InvocationError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(FunctionResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::HttpFunctionGateway;
    use crate::api::function_gateway::FunctionGateway;
    use crate::error::InvocationError;
    use crate::gateway::test_server::serve_once;
    use std::time::Duration;

    #[test]
    fn function_url_joins_gateway_and_name() {
        let gateway =
            HttpFunctionGateway::new("http://gateway:8080/", Duration::from_secs(1)).expect("client");
        assert_eq!(
            gateway.function_url("figlet"),
            "http://gateway:8080/function/figlet"
        );
    }

    #[tokio::test]
    async fn call_posts_payload_to_function_endpoint() {
        let (address, request) = serve_once("200 OK", "done").await;
        let gateway = HttpFunctionGateway::new(&address, Duration::from_secs(5)).expect("client");

        let response = gateway
            .call("figlet", b"hello world")
            .await
            .expect("call succeeds");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"done");
        let request = request.await.expect("server task");
        assert!(request.starts_with("POST /function/figlet HTTP/1.1"));
        assert!(request.ends_with("hello world"));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let (address, _request) = serve_once("502 Bad Gateway", "upstream gone").await;
        let gateway = HttpFunctionGateway::new(&address, Duration::from_secs(5)).expect("client");

        let err = gateway.call("figlet", b"x").await.unwrap_err();

        assert_eq!(
            err,
            InvocationError::Status {
                status: 502,
                body: "upstream gone".to_string(),
            }
        );
    }
}
