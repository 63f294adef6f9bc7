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

use clap::{ArgAction, Parser};
use faas_connector::{parse_flag, parse_topics, ConnectorConfig, DEFAULT_GATEWAY_URL};
use nsq_transport::NsqConfig;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_NSQLOOKUPD_HOST: &str = "nsqlookupd";

fn parse_enabled(raw: &str) -> Result<bool, String> {
    Ok(parse_flag(raw))
}

#[derive(Debug, Parser)]
#[command(name = "nsq-connector")]
#[command(about = "Invokes the functions subscribed to NSQ topics with each message received")]
pub struct Cli {
    /// Gateway serving the function registry and the function endpoints.
    #[arg(long, env = "gateway_url", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Comma separated topics to consume, e.g. `payment_published,slack_joined`.
    #[arg(long, env = "topics", default_value = "")]
    pub topics: String,

    #[arg(long, env = "nsqlookupd_host", default_value = DEFAULT_NSQLOOKUPD_HOST)]
    pub nsqlookupd_host: String,

    /// Limit for each function call, e.g. `30s` or `1m 30s`.
    #[arg(long, env = "upstream_timeout", default_value = "30s", value_parser = humantime::parse_duration)]
    pub upstream_timeout: Duration,

    /// Pause between topic map rebuilds.
    #[arg(long, env = "rebuild_interval", default_value = "3s", value_parser = humantime::parse_duration)]
    pub rebuild_interval: Duration,

    /// Log function response bodies (`1` or `true`).
    #[arg(long, env = "print_response", default_value = "false", value_parser = parse_enabled, action = ArgAction::Set)]
    pub print_response: bool,

    /// NSQ channel shared by every connector instance.
    #[arg(long, env = "consumer_group", default_value = faas_connector::DEFAULT_CONSUMER_GROUP)]
    pub consumer_group: String,

    /// Pause between nsqlookupd queries while a topic has no producers.
    #[arg(long, env = "lookupd_poll_interval", default_value = "60s", value_parser = humantime::parse_duration)]
    pub lookupd_poll_interval: Duration,

    /// Read function subscriptions from this JSON file instead of the gateway.
    #[arg(long, env = "registry_file")]
    pub registry_file: Option<PathBuf>,
}

impl Cli {
    pub fn connector_config(&self) -> ConnectorConfig {
        ConnectorConfig {
            gateway_url: self.gateway_url.clone(),
            topics: parse_topics(&self.topics),
            consumer_group: self.consumer_group.clone(),
            upstream_timeout: self.upstream_timeout,
            rebuild_interval: self.rebuild_interval,
            print_response: self.print_response,
        }
    }

    pub fn nsq_config(&self) -> NsqConfig {
        NsqConfig {
            poll_interval: self.lookupd_poll_interval,
            ..NsqConfig::for_lookupd_host(&self.nsqlookupd_host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn defaults_follow_the_reference_deployment() {
        let cli = Cli::try_parse_from(["nsq-connector", "--topics", "faas-request"])
            .expect("parses");

        let config = cli.connector_config();
        assert_eq!(config.gateway_url, "http://gateway:8080");
        assert_eq!(config.topics, vec!["faas-request".to_string()]);
        assert_eq!(config.consumer_group, "openfaas-channel");
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.rebuild_interval, Duration::from_secs(3));
        assert!(!config.print_response);

        let nsq = cli.nsq_config();
        assert_eq!(nsq.lookupd_address, "nsqlookupd:4161");
        assert_eq!(nsq.poll_interval, Duration::from_secs(60));
        assert!(cli.registry_file.is_none());
    }

    #[test]
    fn durations_topics_and_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "nsq-connector",
            "--topics",
            "payment_published, ,slack_joined,",
            "--upstream-timeout",
            "1m 30s",
            "--rebuild-interval",
            "500ms",
            "--print-response",
            "1",
            "--nsqlookupd-host",
            "lookupd.nsq",
        ])
        .expect("parses");

        let config = cli.connector_config();
        assert_eq!(
            config.topics,
            vec!["payment_published".to_string(), "slack_joined".to_string()]
        );
        assert_eq!(config.upstream_timeout, Duration::from_secs(90));
        assert_eq!(config.rebuild_interval, Duration::from_millis(500));
        assert!(config.print_response);
        assert_eq!(cli.nsq_config().lookupd_address, "lookupd.nsq:4161");
    }

    #[test]
    fn print_response_accepts_only_one_or_true() {
        for (raw, expected) in [("true", true), ("TRUE", false), ("1", true), ("yes", false), ("0", false)] {
            let cli = Cli::try_parse_from(["nsq-connector", "--print-response", raw])
                .expect("parses");
            assert_eq!(cli.print_response, expected, "print_response={raw}");
        }
    }

    #[test]
    fn invalid_duration_is_rejected() {
        assert!(Cli::try_parse_from(["nsq-connector", "--rebuild-interval", "soon"]).is_err());
    }

    #[test]
    fn missing_topics_fail_validation() {
        let cli = Cli::try_parse_from(["nsq-connector", "--topics", " , "]).expect("parses");
        assert!(cli.connector_config().validate().is_err());
    }
}
