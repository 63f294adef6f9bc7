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

//! Inversion of registry lookup entries into the topic-keyed table.

use crate::api::registry::LookupEntry;
use crate::control_plane::topic_map::TopicSnapshot;

/// Builds a fresh topic -> functions table from one registry answer.
///
/// A function annotated with several topics lands in each topic's set. Topic
/// names are trimmed and blank ones are skipped.
pub fn build_topic_snapshot(entries: &[LookupEntry]) -> TopicSnapshot {
    let mut snapshot = TopicSnapshot::new();

    for entry in entries {
        for topic in &entry.topics {
            let topic = topic.trim();
            if topic.is_empty() {
                continue;
            }
            snapshot
                .entry(topic.to_string())
                .or_default()
                .insert(entry.function.clone());
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::build_topic_snapshot;
    use crate::api::registry::LookupEntry;
    use std::collections::HashSet;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn functions_are_indexed_under_every_annotated_topic() {
        let snapshot = build_topic_snapshot(&[
            LookupEntry::new("f1", ["A", "B"]),
            LookupEntry::new("f2", ["B"]),
        ]);

        assert_eq!(snapshot.get("A"), Some(&set(&["f1"])));
        assert_eq!(snapshot.get("B"), Some(&set(&["f1", "f2"])));
        assert!(snapshot.get("C").is_none());
    }

    #[test]
    fn blank_topics_are_skipped_and_names_trimmed() {
        let snapshot = build_topic_snapshot(&[LookupEntry::new("f1", [" A ", "", "  "])]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("A"), Some(&set(&["f1"])));
    }

    #[test]
    fn duplicate_annotations_collapse() {
        let snapshot = build_topic_snapshot(&[
            LookupEntry::new("f1", ["A", "A"]),
            LookupEntry::new("f1", ["A"]),
        ]);

        assert_eq!(snapshot.get("A"), Some(&set(&["f1"])));
    }

    #[test]
    fn functions_without_topics_are_absent() {
        let snapshot = build_topic_snapshot(&[LookupEntry::new("f1", Vec::<String>::new())]);
        assert!(snapshot.is_empty());
    }
}
