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

//! Runtime helper for running each worker loop on its own thread.

use crate::error::ConnectorError;
use crate::observability::events;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

const COMPONENT: &str = "worker_runtime";

/// Reported once by every worker when its loop ends.
#[derive(Debug)]
pub(crate) struct WorkerExit {
    pub(crate) name: String,
    pub(crate) result: Result<(), ConnectorError>,
}

/// Spawns `run_loop` on a dedicated OS thread with a current-thread runtime.
///
/// The future is built on the worker thread, so it does not need to be `Send`.
/// A panic inside the loop is reported as a runtime error.
pub(crate) fn spawn_worker<F, Fut>(
    name: String,
    exits: UnboundedSender<WorkerExit>,
    run_loop: F,
) -> Result<(), ConnectorError>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), ConnectorError>> + 'static,
{
    let thread_name = name.clone();
    thread::Builder::new()
        .name(thread_name)
        .spawn(move || {
            debug!(
                event = events::WORKER_START,
                component = COMPONENT,
                worker = name.as_str(),
                "worker thread started"
            );

            let result = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => catch_unwind(AssertUnwindSafe(|| runtime.block_on(run_loop())))
                    .unwrap_or_else(|_| {
                        Err(ConnectorError::runtime(format!("worker {name} panicked")))
                    }),
                Err(err) => Err(ConnectorError::runtime(format!(
                    "unable to create runtime for worker {name}: {err}"
                ))),
            };

            info!(
                event = events::WORKER_EXIT,
                component = COMPONENT,
                worker = name.as_str(),
                ok = result.is_ok(),
                "worker thread exiting"
            );

            // The receiver is gone once the connector has already returned.
            let _ = exits.send(WorkerExit { name, result });
        })
        .map(|_| ())
        .map_err(|err| ConnectorError::runtime(format!("unable to spawn worker thread: {err}")))
}
