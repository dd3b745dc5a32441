/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// The shapes of line that carry a connection name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameRule {
    /// `  name: TUNNEL, ...` in `--list-conns`.
    ConnTunnel,
    /// `  child name` in `--list-conns`.
    ConnChild,
    /// `name: #12, reqid 1, INSTALLED, TUNNEL, ESP:...`
    HashEsp,
    /// `name{1}:` or `child name{1}:`
    Brace,
    /// `CHILD_SA name{1}`
    ChildSa,
    /// `child 'name'`
    Quoted,
    /// `name: INSTALLED, ...`
    Installed,
    /// `... installed CHILD_SA 'name' ...` as printed by the daemon log.
    InstalledLog,
    /// `name: TUNNEL|ESP|ROUTED|ESTABLISHED ...`
    GenericHeader,
}

impl NameRule {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NameRule::ConnTunnel => "conn-tunnel",
            NameRule::ConnChild => "conn-child",
            NameRule::HashEsp => "hash-esp",
            NameRule::Brace => "brace",
            NameRule::ChildSa => "child-sa",
            NameRule::Quoted => "quoted",
            NameRule::Installed => "installed",
            NameRule::InstalledLog => "installed-log",
            NameRule::GenericHeader => "generic-header",
        }
    }
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterShape {
    /// `in  c1234567,  100 bytes,  2 packets`
    Spi,
    /// `in: 100 bytes, 2 packets`
    Primary,
    /// `in: ... bytes 100 ... packets 2`
    Alternate,
    /// `in ... bytes 100 ... packets 2`
    Loose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CounterRule {
    pub direction: Direction,
    pub shape: CounterShape,
}

impl CounterRule {
    const fn new(direction: Direction, shape: CounterShape) -> Self {
        CounterRule { direction, shape }
    }
}

pub struct LineRule<T> {
    tag: T,
    regex: Regex,
}

impl<T: Copy> LineRule<T> {
    fn new(tag: T, pattern: &str) -> Self {
        let regex = Regex::new(pattern).expect("static line pattern must compile");
        LineRule { tag, regex }
    }

    #[inline]
    pub fn tag(&self) -> T {
        self.tag
    }

    #[inline]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn captures<'a>(&self, line: &'a str) -> Option<Captures<'a>> {
        self.regex.captures(line)
    }

    /// The first capture group, trimmed, if the line matches and the
    /// capture is not blank.
    pub fn name<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.regex.captures(line)?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() { None } else { Some(name) }
    }
}

/// An ordered list of line rules. The position of a rule in the list is
/// its precedence.
pub struct PatternSet<T> {
    rules: Vec<LineRule<T>>,
}

impl<T: Copy> PatternSet<T> {
    fn new(rules: &[(T, &str)]) -> Self {
        PatternSet {
            rules: rules
                .iter()
                .map(|(tag, pattern)| LineRule::new(*tag, pattern))
                .collect(),
        }
    }

    #[inline]
    pub fn rules(&self) -> &[LineRule<T>] {
        &self.rules
    }

    /// Run the rules in order and stop at the first one that matches.
    pub fn classify<'a>(&self, line: &'a str) -> Option<(T, Captures<'a>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.captures(line).map(|caps| (rule.tag, caps)))
    }

    /// Like [`classify`](Self::classify) but yields the captured name.
    pub fn classify_name<'a>(&self, line: &'a str) -> Option<(T, &'a str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.name(line).map(|name| (rule.tag, name)))
    }

    /// The first rule matching the line, with no capture extraction.
    pub fn first_match(&self, line: &str) -> Option<T> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(line))
            .map(|rule| rule.tag)
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.first_match(line).is_some()
    }

    /// Names captured by every rule that matches, in rule order.
    pub fn names<'a>(&self, line: &'a str) -> impl Iterator<Item = &'a str> {
        self.rules.iter().filter_map(move |rule| rule.name(line))
    }
}

/// Rules applied to `--list-conns` output. The `children:` list form has
/// its own splitter in the conns module.
pub static LIST_CONNS_RULES: LazyLock<PatternSet<NameRule>> = LazyLock::new(|| {
    PatternSet::new(&[
        (NameRule::ConnTunnel, r"^\s+([A-Za-z0-9._:-]+):\s+TUNNEL\b"),
        (NameRule::ConnChild, r"(?i)^\s*child\s+([A-Za-z0-9._:-]+)\b"),
    ])
});

/// Child discovery in `--list-sas` output, used when `--list-conns` names
/// nothing.
pub static LIST_SAS_RULES: LazyLock<PatternSet<NameRule>> = LazyLock::new(|| {
    PatternSet::new(&[
        (NameRule::Brace, r"^\s*(?:child\s+)?([A-Za-z0-9._:-]+)\{[0-9]+\}:?"),
        (NameRule::ChildSa, r"^\s*CHILD_SA\s+([A-Za-z0-9._:-]+)\{[0-9]+\}"),
        (NameRule::Quoted, r"^\s*child\s+'([^']+)'"),
    ])
});

/// Every known shape of an installed child SA. The hash-ESP form comes
/// first as it is the one printed by current swanctl releases.
pub static ACTIVE_RULES: LazyLock<PatternSet<NameRule>> = LazyLock::new(|| {
    PatternSet::new(&[
        (
            NameRule::HashEsp,
            r"(?i)^\s*([A-Za-z0-9._:-]+):\s*#[0-9]+,\s.*\bESP:",
        ),
        (
            NameRule::Brace,
            r"(?i)^\s*(?:child\s+)?([A-Za-z0-9._:-]+)\{[0-9]+\}:",
        ),
        (
            NameRule::ChildSa,
            r"(?i)^\s*CHILD_SA\s+([A-Za-z0-9._:-]+)\{[0-9]+\}",
        ),
        (NameRule::Quoted, r"(?i)^\s*child\s+'([^']+)'"),
        (
            NameRule::Installed,
            r"(?i)^\s*(?:child\s+)?([A-Za-z0-9._:-]+):\s+INSTALLED\b",
        ),
        (NameRule::InstalledLog, r"(?i)\binstalled\s+CHILD_SA\s+'([^']+)'"),
        (
            NameRule::GenericHeader,
            r"(?i)^\s*(?:child\s+)?([A-Za-z0-9._:-]+):\s*(?:TUNNEL|ESP|ROUTED|ESTABLISHED)\b",
        ),
    ])
});

/// Lines that open a new child SA block in `--list-sas` output.
pub static HEADER_RULES: LazyLock<PatternSet<NameRule>> = LazyLock::new(|| {
    PatternSet::new(&[
        (
            NameRule::HashEsp,
            r"^\s*([A-Za-z0-9._:-]+):\s*#[0-9]+,\s.*\bESP:",
        ),
        (NameRule::Brace, r"^\s*(?:child\s+)?([A-Za-z0-9._:-]+)\{[0-9]+\}:?"),
        (NameRule::ChildSa, r"^\s*CHILD_SA\s+([A-Za-z0-9._:-]+)\{[0-9]+\}"),
        (NameRule::Quoted, r"^\s*child\s+'([^']+)'"),
    ])
});

/// Traffic lines, most specific first. Capture 1 is bytes, capture 2 is
/// packets.
pub static COUNTER_RULES: LazyLock<PatternSet<CounterRule>> = LazyLock::new(|| {
    use CounterShape::*;
    use Direction::*;

    PatternSet::new(&[
        (
            CounterRule::new(Inbound, Spi),
            r"^\s*in\s+[0-9A-Fa-fx]+,\s*([0-9,]+)\s*bytes,\s*([0-9,]+)\s*packets",
        ),
        (
            CounterRule::new(Outbound, Spi),
            r"^\s*out\s+[0-9A-Fa-fx]+,\s*([0-9,]+)\s*bytes,\s*([0-9,]+)\s*packets",
        ),
        (
            CounterRule::new(Inbound, Primary),
            r"^\s*in:\s*([0-9,]+)\s*bytes,\s*([0-9,]+)\s*packets",
        ),
        (
            CounterRule::new(Outbound, Primary),
            r"^\s*out:\s*([0-9,]+)\s*bytes,\s*([0-9,]+)\s*packets",
        ),
        (
            CounterRule::new(Inbound, Alternate),
            r"^\s*in:.*?\bbytes\s+([0-9,]+).*?\bpackets\s+([0-9,]+)",
        ),
        (
            CounterRule::new(Outbound, Alternate),
            r"^\s*out:.*?\bbytes\s+([0-9,]+).*?\bpackets\s+([0-9,]+)",
        ),
        (
            CounterRule::new(Inbound, Loose),
            r"^\s*in\b.*?\bbytes\s+([0-9,]+).*?\bpackets\s+([0-9,]+)",
        ),
        (
            CounterRule::new(Outbound, Loose),
            r"^\s*out\b.*?\bbytes\s+([0-9,]+).*?\bpackets\s+([0-9,]+)",
        ),
    ])
});
