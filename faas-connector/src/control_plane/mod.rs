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

//! Control-plane layer.
//!
//! Owns the topic -> function table and the synchronizer that rebuilds it from
//! the registry. The synchronizer holds the only [`TopicMapWriter`]; everything
//! else gets a read-only [`TopicMap`] handle.
//!
//! ```
//! use faas_connector::{build_topic_snapshot, LookupEntry, TopicMap};
//!
//! let (topic_map, writer) = TopicMap::with_writer();
//! writer.replace(build_topic_snapshot(&[
//!     LookupEntry::new("f1", ["A", "B"]),
//!     LookupEntry::new("f2", ["B"]),
//! ]));
//!
//! assert_eq!(topic_map.lookup("A").len(), 1);
//! assert_eq!(topic_map.lookup("B").len(), 2);
//! assert!(topic_map.lookup("C").is_empty());
//! ```

pub(crate) mod map_synchronizer;
pub(crate) mod topic_index;
pub(crate) mod topic_map;

pub use map_synchronizer::MapSynchronizer;
pub use topic_index::build_topic_snapshot;
pub use topic_map::{FunctionSet, TopicMap, TopicMapWriter, TopicSnapshot};
