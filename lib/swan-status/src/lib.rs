/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

//! Extraction of connection names and traffic counters from the plain text
//! printed by `swanctl --list-conns` and `swanctl --list-sas`.
//!
//! The output of swanctl has no stable schema, so every extractor here runs
//! a catalog of line rules over the text. Nothing in this crate fails: text
//! that is not recognized simply yields empty results.

use std::collections::BTreeSet;

pub mod number;
pub mod pattern;

mod active;
pub use active::active_connections;

mod conns;
pub use conns::{configured_connections, from_list_conns, from_list_sas};

mod stats;
pub use stats::{ConnectionStatus, StatusAggregator, StatusMap, TrafficCounter, aggregate_status};

mod trace;
pub use trace::{ActiveTrace, NO_MATCH_MESSAGE, TracedLine, trace_active_lines};

fn sorted_unique<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_unique_names() {
        let names = sorted_unique([" b", "a", "b ", "", "  ", "C"]);
        assert_eq!(names, vec!["C", "a", "b"]);
    }
}
