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

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use faas_connector::{Connector, GatewayRegistry, HttpFunctionGateway, RegistryClient};
use nsq_transport::NsqBroker;
use registry_static_file::RegistryStaticFile;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.connector_config();
    config.validate()?;

    let registry: Arc<dyn RegistryClient> = match &cli.registry_file {
        Some(path) => {
            info!("Using static function registry {}", path.display());
            Arc::new(RegistryStaticFile::new(path.clone()))
        }
        None => Arc::new(
            GatewayRegistry::new(&config.gateway_url, config.upstream_timeout)
                .context("unable to create gateway registry client")?,
        ),
    };

    let (stop_tx, stop_rx) = watch::channel(false);
    let broker = Arc::new(NsqBroker::new(cli.nsq_config(), stop_rx));
    let gateway_factory = HttpFunctionGateway::factory(&config.gateway_url, config.upstream_timeout);

    info!(
        "Gateway: {}, topics: {:?}, nsqlookupd: {}, upstream timeout: {:?}, rebuild interval: {:?}",
        config.gateway_url,
        config.topics,
        cli.nsq_config().lookupd_address,
        config.upstream_timeout,
        config.rebuild_interval
    );

    let connector = Connector::new(config, registry, broker, gateway_factory)?;
    let running = connector.run();
    tokio::pin!(running);

    tokio::select! {
        result = &mut running => return result.context("connector stopped"),
        signal = tokio::signal::ctrl_c() => {
            signal.context("unable to listen for shutdown signal")?;
            info!("Shutdown requested, closing subscriptions");
            stop_tx.send_replace(true);
        }
    }

    running.await.context("connector stopped during shutdown")
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("nsq-connector failed: {err:#}");
            ExitCode::from(1)
        }
    }
}
