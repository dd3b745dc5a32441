/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

use crate::number::parse_count;
use crate::pattern::{COUNTER_RULES, Direction, HEADER_RULES};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrafficCounter {
    pub bytes: i64,
    pub packets: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub active: bool,
    pub inbound: TrafficCounter,
    pub outbound: TrafficCounter,
}

impl ConnectionStatus {
    fn counter_mut(&mut self, direction: Direction) -> &mut TrafficCounter {
        match direction {
            Direction::Inbound => &mut self.inbound,
            Direction::Outbound => &mut self.outbound,
        }
    }
}

pub type StatusMap = BTreeMap<String, ConnectionStatus>;

enum ParseState {
    NoCurrentConnection,
    HasCurrentConnection(String),
}

/// Walks `swanctl --list-sas` output one line at a time.
///
/// A header line selects the current child SA. Traffic lines that follow
/// are credited to it until the next header, and traffic lines seen before
/// any header are dropped. For each direction the last traffic line wins.
pub struct StatusAggregator {
    state: ParseState,
    stats: StatusMap,
}

impl Default for StatusAggregator {
    fn default() -> Self {
        StatusAggregator::new()
    }
}

impl StatusAggregator {
    pub fn new() -> Self {
        StatusAggregator {
            state: ParseState::NoCurrentConnection,
            stats: StatusMap::new(),
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        if let Some((_, name)) = HEADER_RULES.classify_name(line) {
            self.stats.entry(name.to_string()).or_default().active = true;
            self.state = ParseState::HasCurrentConnection(name.to_string());
            return;
        }

        let ParseState::HasCurrentConnection(current) = &self.state else {
            return;
        };
        let Some((rule, caps)) = COUNTER_RULES.classify(line) else {
            return;
        };

        let counter = TrafficCounter {
            bytes: caps.get(1).map(|m| parse_count(m.as_str())).unwrap_or(0),
            packets: caps.get(2).map(|m| parse_count(m.as_str())).unwrap_or(0),
        };
        if let Some(status) = self.stats.get_mut(current) {
            *status.counter_mut(rule.direction) = counter;
        }
    }

    pub fn feed_text(&mut self, text: &str) {
        text.lines().for_each(|line| self.feed_line(line));
    }

    pub fn finish(self) -> StatusMap {
        self.stats
    }
}

/// Per child SA counters found in `swanctl --list-sas` output.
pub fn aggregate_status(text: &str) -> StatusMap {
    let mut aggregator = StatusAggregator::new();
    aggregator.feed_text(text);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(in_bytes: i64, in_pkts: i64, out_bytes: i64, out_pkts: i64) -> ConnectionStatus {
        ConnectionStatus {
            active: true,
            inbound: TrafficCounter {
                bytes: in_bytes,
                packets: in_pkts,
            },
            outbound: TrafficCounter {
                bytes: out_bytes,
                packets: out_pkts,
            },
        }
    }

    #[test]
    fn hash_esp_block() {
        let text = "\
tun1: #3, reqid 1, INSTALLED, TUNNEL, ESP:AES_CBC
in  0xc1234567,  1000 bytes,   10 packets
out 0xc7654321,  2000 bytes,   20 packets
";
        let stats = aggregate_status(text);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["tun1"], status(1000, 10, 2000, 20));
    }

    #[test]
    fn counters_before_header_dropped() {
        let text = "\
in  c1a2b3c4,  500 bytes,  5 packets
out c5d6e7f8,  600 bytes,  6 packets
";
        assert!(aggregate_status(text).is_empty());

        let text = format!("{text}  lan{{1}}:  INSTALLED, TUNNEL\n");
        let stats = aggregate_status(&text);
        assert_eq!(stats["lan"], status(0, 0, 0, 0));
    }

    #[test]
    fn header_without_counters() {
        let stats = aggregate_status("child 'idle'\n");
        assert_eq!(stats["idle"], status(0, 0, 0, 0));
    }

    #[test]
    fn counters_follow_current_header() {
        let text = "\
  a: #1, reqid 1, INSTALLED, TUNNEL, ESP:AES_GCM_16-128
    in  c0000001,  1,000 bytes,  10 packets,  1s ago
    out c0000002,  2,000 bytes,  20 packets,  1s ago
  b: #2, reqid 2, INSTALLED, TUNNEL, ESP:AES_GCM_16-128
    in  c0000003,  3,000 bytes,  30 packets,  1s ago
";
        let stats = aggregate_status(text);
        assert_eq!(stats["a"], status(1000, 10, 2000, 20));
        assert_eq!(stats["b"], status(3000, 30, 0, 0));
    }

    #[test]
    fn last_line_per_direction_wins() {
        let text = "\
x{1}:
  in: 10 bytes, 1 packets
  in: 20 bytes, 2 packets
  out: 30 bytes, 3 packets
";
        assert_eq!(aggregate_status(text)["x"], status(20, 2, 30, 3));
    }

    #[test]
    fn repeated_header_keeps_counters() {
        let text = "\
x{1}:
  in: 10 bytes, 1 packets
  out: 30 bytes, 3 packets
x{2}:
  out: 40 bytes, 4 packets
";
        assert_eq!(aggregate_status(text)["x"], status(10, 1, 40, 4));
    }

    #[test]
    fn alternate_and_loose_counters() {
        let text = "\
CHILD_SA vpn{4}
  in: esp bytes 1,500 packets 15
  out (esp) bytes 2,500 packets 25
";
        assert_eq!(aggregate_status(text)["vpn"], status(1500, 15, 2500, 25));
    }

    #[test]
    fn unknown_lines_ignored() {
        let text = "\
gw-gw: #1, ESTABLISHED, IKEv2, 0a8c9e7f6b5d4c3b_i* 1f2e3d4c5b6a7980_r
  local  'moon.strongswan.org' @ 192.168.0.1[4500]
  established 95s ago, rekeying in 13710s
";
        assert!(aggregate_status(text).is_empty());
    }

    #[test]
    fn incremental_feed() {
        let mut aggregator = StatusAggregator::default();
        aggregator.feed_line("  lan: #9, reqid 3, INSTALLED, TUNNEL, ESP:AES_CBC-128");
        aggregator.feed_line("    in  cafe0001,  7 bytes,  1 packets");
        let stats = aggregator.finish();
        assert_eq!(stats["lan"], status(7, 1, 0, 0));
    }
}
