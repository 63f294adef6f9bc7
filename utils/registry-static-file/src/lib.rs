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

//! Function registry backed by a JSON file.
//!
//! The file maps function names to the topics they subscribe to, either as an
//! array of topic names or as a comma-separated string:
//!
//! ```json
//! {
//!     "figlet": ["faas-request"],
//!     "nodeinfo": "faas-request, payment_published"
//! }
//! ```
//!
//! The file is re-read on every lookup, so edits show up on the next rebuild.

use async_trait::async_trait;
use faas_connector::{parse_topics, ConnectorError, LookupEntry, RegistryClient};
use serde_json::Value;
use std::fs::{self, canonicalize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct RegistryStaticFile {
    static_file: PathBuf,
}

impl RegistryStaticFile {
    pub fn new(static_file: impl Into<PathBuf>) -> Self {
        Self {
            static_file: static_file.into(),
        }
    }

    fn read_static_config_json(&self) -> Result<Value, ConnectorError> {
        let registry_json_file = canonicalize(&self.static_file).map_err(|error| {
            ConnectorError::registry(format!(
                "static registry file {} not found: {error}",
                self.static_file.display()
            ))
        })?;
        debug!("registry_json_file: {registry_json_file:?}");

        let data = fs::read_to_string(&registry_json_file).map_err(|error| {
            ConnectorError::registry(format!("unable to read static registry file: {error}"))
        })?;

        serde_json::from_str(&data).map_err(|error| {
            ConnectorError::registry(format!("unable to parse static registry file: {error}"))
        })
    }

    fn parse_static_functions(&self) -> Result<Vec<LookupEntry>, ConnectorError> {
        let value = self.read_static_config_json()?;
        let Some(entries) = value.as_object() else {
            return Err(ConnectorError::registry(
                "static registry file must be a JSON object mapping function names to topics",
            ));
        };

        let mut functions = Vec::with_capacity(entries.len());
        for (function, topic_values) in entries {
            let topics = match topic_values {
                Value::String(joined) => parse_topics(joined),
                Value::Array(values) => values
                    .iter()
                    .filter_map(|value| {
                        let topic = value.as_str();
                        if topic.is_none() {
                            warn!("Ignoring non-string topic '{value}' for function '{function}'");
                        }
                        topic
                    })
                    .map(str::to_string)
                    .collect(),
                other => {
                    warn!("Ignoring function '{function}' with unsupported topics '{other}'");
                    continue;
                }
            };

            functions.push(LookupEntry {
                function: function.clone(),
                topics,
            });
        }

        Ok(functions)
    }
}

#[async_trait]
impl RegistryClient for RegistryStaticFile {
    async fn list_functions(&self) -> Result<Vec<LookupEntry>, ConnectorError> {
        let functions = self.parse_static_functions()?;
        debug!("Finished reading static registry\n{functions:#?}");
        Ok(functions)
    }
}

#[cfg(test)]
mod tests {
    use super::RegistryStaticFile;
    use faas_connector::{build_topic_snapshot, ConnectorError, RegistryClient};
    use std::collections::HashSet;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TEST_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn write_static_config(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        let counter = TEST_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!(
            "registry-static-file-test-{}-{}.json",
            std::process::id(),
            counter
        ));

        fs::write(&path, contents).expect("static test config written");
        path
    }

    fn functions(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn list_functions_accepts_arrays_and_joined_strings() {
        let static_path = write_static_config(
            r#"{
                "figlet": ["faas-request", 42],
                "nodeinfo": "faas-request, payment_published",
                "broken": {"topic": "ignored"}
            }"#,
        );
        let registry = RegistryStaticFile::new(&static_path);

        let entries = registry.list_functions().await.expect("registry readable");
        fs::remove_file(&static_path).expect("remove static config file");

        assert_eq!(entries.len(), 2);
        let snapshot = build_topic_snapshot(&entries);
        assert_eq!(snapshot["faas-request"], functions(&["figlet", "nodeinfo"]));
        assert_eq!(snapshot["payment_published"], functions(&["nodeinfo"]));
    }

    #[tokio::test]
    async fn edits_are_picked_up_on_the_next_lookup() {
        let static_path = write_static_config(r#"{"figlet": ["faas-request"]}"#);
        let registry = RegistryStaticFile::new(&static_path);

        let before = registry.list_functions().await.expect("registry readable");
        fs::write(&static_path, r#"{"figlet": ["slack_joined"]}"#).expect("rewrite config");
        let after = registry.list_functions().await.expect("registry readable");
        fs::remove_file(&static_path).expect("remove static config file");

        assert_eq!(before[0].topics, vec!["faas-request".to_string()]);
        assert_eq!(after[0].topics, vec!["slack_joined".to_string()]);
    }

    #[tokio::test]
    async fn missing_or_malformed_file_is_a_registry_error() {
        let missing = RegistryStaticFile::new("/definitely/not/here.json");
        assert!(matches!(
            missing.list_functions().await,
            Err(ConnectorError::Registry(_))
        ));

        let static_path = write_static_config(r#"["figlet"]"#);
        let not_an_object = RegistryStaticFile::new(&static_path);
        let result = not_an_object.list_functions().await;
        fs::remove_file(&static_path).expect("remove static config file");

        assert!(matches!(result, Err(ConnectorError::Registry(_))));
    }
}
