/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;

use crate::pattern::{ACTIVE_RULES, NameRule};

pub const NO_MATCH_MESSAGE: &str = "No lines matched active-child patterns.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TracedLine<'a> {
    pub line: &'a str,
    /// The first active rule that matched the line.
    pub rule: NameRule,
}

/// Which lines of `swanctl --list-sas` output the active rules fire on.
#[derive(Debug, PartialEq, Eq)]
pub enum ActiveTrace<'a> {
    Matched(Vec<TracedLine<'a>>),
    /// Nothing matched, the whole text is kept for display.
    NoMatch(&'a str),
}

impl ActiveTrace<'_> {
    pub fn matched_lines(&self) -> impl Iterator<Item = &str> {
        let lines = match self {
            ActiveTrace::Matched(lines) => lines.as_slice(),
            ActiveTrace::NoMatch(_) => &[],
        };
        lines.iter().map(|l| l.line)
    }
}

impl fmt::Display for ActiveTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveTrace::Matched(lines) => {
                let mut iter = lines.iter();
                if let Some(first) = iter.next() {
                    f.write_str(first.line)?;
                }
                for l in iter {
                    write!(f, "\n{}", l.line)?;
                }
                Ok(())
            }
            ActiveTrace::NoMatch(text) => write!(f, "{NO_MATCH_MESSAGE}\n\nFull output:\n{text}"),
        }
    }
}

pub fn trace_active_lines(text: &str) -> ActiveTrace<'_> {
    let matched: Vec<TracedLine<'_>> = text
        .lines()
        .filter_map(|line| {
            ACTIVE_RULES
                .first_match(line)
                .map(|rule| TracedLine { line, rule })
        })
        .collect();
    if matched.is_empty() {
        ActiveTrace::NoMatch(text)
    } else {
        ActiveTrace::Matched(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_in_order() {
        let text = "\
gw-gw: #1, ESTABLISHED, IKEv2
  net-net: #1, reqid 1, INSTALLED, TUNNEL, ESP:AES_GCM_16-128
    in  c1a2b3c4,  0 bytes,  0 packets
  lab: INSTALLED, TUNNEL
";
        let trace = trace_active_lines(text);
        let ActiveTrace::Matched(lines) = &trace else {
            panic!("expected matched lines");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].rule, NameRule::HashEsp);
        assert_eq!(lines[1].rule, NameRule::Installed);
        assert_eq!(lines[0].rule.to_string(), "hash-esp");
        assert_eq!(
            trace.to_string(),
            "  net-net: #1, reqid 1, INSTALLED, TUNNEL, ESP:AES_GCM_16-128\n  lab: INSTALLED, TUNNEL"
        );
        assert_eq!(trace.matched_lines().count(), 2);
    }

    #[test]
    fn no_match_keeps_text() {
        let text = "no IKE_SAs found\n";
        let trace = trace_active_lines(text);
        assert_eq!(trace, ActiveTrace::NoMatch(text));
        assert_eq!(
            trace.to_string(),
            "No lines matched active-child patterns.\n\nFull output:\nno IKE_SAs found\n"
        );
        assert_eq!(trace.matched_lines().count(), 0);
    }

    #[test]
    fn empty_text() {
        let trace = trace_active_lines("");
        assert!(trace.to_string().starts_with(NO_MATCH_MESSAGE));
    }
}
