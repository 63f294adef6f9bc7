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

//! Producer discovery through nsqlookupd's HTTP API.

use faas_connector::ConnectorError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// An nsqd instance publishing the topic.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
pub struct Producer {
    pub broadcast_address: String,
    pub tcp_port: u16,
}

#[derive(Deserialize)]
struct ProducerList {
    #[serde(default)]
    producers: Vec<Producer>,
}

// nsqlookupd before 1.0 wraps the payload in `{"status_code": .., "data": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LookupResponse {
    Legacy { data: ProducerList },
    Current(ProducerList),
}

pub fn parse_lookup_response(body: &[u8]) -> Result<Vec<Producer>, serde_json::Error> {
    let response: LookupResponse = serde_json::from_slice(body)?;
    Ok(match response {
        LookupResponse::Legacy { data } => data.producers,
        LookupResponse::Current(list) => list.producers,
    })
}

pub struct LookupdClient {
    lookupd_address: String,
    client: reqwest::Client,
}

impl LookupdClient {
    /// `lookupd_address` is `host:port` of nsqlookupd's HTTP listener.
    pub fn new(lookupd_address: &str) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|err| ConnectorError::broker(format!("unable to build lookupd client: {err}")))?;

        Ok(Self {
            lookupd_address: lookupd_address.to_string(),
            client,
        })
    }

    // Query-encoded so `#ephemeral` topics stay part of the query.
    fn lookup_request(&self, topic: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("http://{}/lookup", self.lookupd_address))
            .query(&[("topic", topic)])
    }

    /// Producers currently known for `topic`; empty while nobody has published to it.
    pub async fn producers(&self, topic: &str) -> Result<Vec<Producer>, ConnectorError> {
        let response = self
            .lookup_request(topic)
            .send()
            .await
            .map_err(|err| {
                ConnectorError::broker(format!(
                    "nsqlookupd {} unreachable: {err}",
                    self.lookupd_address
                ))
            })?;

        let status = response.status();
        // nsqlookupd answers 404 TOPIC_NOT_FOUND for topics without producers.
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ConnectorError::broker(format!(
                "nsqlookupd lookup for {topic} returned {status}"
            )));
        }

        let body = response.bytes().await.map_err(|err| {
            ConnectorError::broker(format!("unable to read nsqlookupd response: {err}"))
        })?;
        parse_lookup_response(&body).map_err(|err| {
            ConnectorError::broker(format!("unable to decode nsqlookupd response: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_lookup_response, LookupdClient, Producer};
    use faas_connector::ConnectorError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn producer(address: &str, port: u16) -> Producer {
        Producer {
            broadcast_address: address.to_string(),
            tcp_port: port,
        }
    }

    #[test]
    fn parses_current_response_shape() {
        let body = br#"{
            "channels": ["openfaas-channel"],
            "producers": [
                {"remote_address": "10.0.0.7:51234", "hostname": "nsqd-0",
                 "broadcast_address": "nsqd-0", "tcp_port": 4150, "http_port": 4151,
                 "version": "1.2.1"}
            ]
        }"#;

        assert_eq!(
            parse_lookup_response(body).expect("parses"),
            vec![producer("nsqd-0", 4150)]
        );
    }

    #[test]
    fn parses_legacy_wrapped_response_shape() {
        let body = br#"{
            "status_code": 200,
            "status_txt": "OK",
            "data": {
                "channels": [],
                "producers": [
                    {"broadcast_address": "nsqd-0", "tcp_port": 4150},
                    {"broadcast_address": "nsqd-1", "tcp_port": 4250}
                ]
            }
        }"#;

        assert_eq!(
            parse_lookup_response(body).expect("parses"),
            vec![producer("nsqd-0", 4150), producer("nsqd-1", 4250)]
        );
    }

    #[test]
    fn producer_without_port_is_rejected() {
        assert!(parse_lookup_response(br#"{"producers": [{"broadcast_address": "x"}]}"#).is_err());
    }

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr").to_string();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
        });
        address
    }

    #[tokio::test]
    async fn unknown_topic_has_no_producers() {
        let address = serve_once("404 Not Found", r#"{"message":"TOPIC_NOT_FOUND"}"#).await;
        let client = LookupdClient::new(&address).expect("client");

        assert_eq!(client.producers("faas-request").await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn unreachable_lookupd_is_a_broker_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr").to_string();
        drop(listener);
        let client = LookupdClient::new(&address).expect("client");

        assert!(matches!(
            client.producers("faas-request").await,
            Err(ConnectorError::Broker(_))
        ));
    }

    #[test]
    fn lookup_request_targets_topic_query() {
        let client = LookupdClient::new("nsqlookupd:4161").expect("client");
        let request = client
            .lookup_request("faas-request")
            .build()
            .expect("request");

        assert_eq!(
            request.url().as_str(),
            "http://nsqlookupd:4161/lookup?topic=faas-request"
        );
    }

    #[test]
    fn ephemeral_topic_is_encoded_into_the_query() {
        let client = LookupdClient::new("nsqlookupd:4161").expect("client");
        let request = client
            .lookup_request("events#ephemeral")
            .build()
            .expect("request");

        assert_eq!(request.url().query(), Some("topic=events%23ephemeral"));
        assert_eq!(request.url().fragment(), None);
    }
}
