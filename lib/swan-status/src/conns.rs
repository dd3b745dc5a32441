/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::LazyLock;

use regex::Regex;

use crate::pattern::{LIST_CONNS_RULES, LIST_SAS_RULES};

static CHILDREN_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bchildren:\s*(.+)$").expect("static line pattern must compile")
});
static CHILDREN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("static line pattern must compile"));

fn children_list(line: &str) -> impl Iterator<Item = &str> {
    CHILDREN_LIST
        .captures(line)
        .and_then(|caps| caps.get(1))
        .into_iter()
        .flat_map(|m| CHILDREN_SEPARATOR.split(m.as_str()))
}

/// Child names configured in `swanctl --list-conns` output.
///
/// The indented `name: TUNNEL` form, the `children: a, b` list form and the
/// `child name` form may all appear in the same text, so all of them are
/// collected.
pub fn from_list_conns(text: &str) -> Vec<String> {
    crate::sorted_unique(text.lines().flat_map(|line| {
        LIST_CONNS_RULES
            .names(line)
            .chain(children_list(line))
    }))
}

/// Child names seen in `swanctl --list-sas` output.
pub fn from_list_sas(text: &str) -> Vec<String> {
    crate::sorted_unique(text.lines().flat_map(|line| LIST_SAS_RULES.names(line)))
}

/// Configured child names, taken from the `--list-sas` text only if the
/// `--list-conns` text names nothing.
///
/// `list_sas` is only called for the fallback. A failed command should be
/// passed in as empty text.
pub async fn configured_connections<F, Fut>(list_conns: &str, list_sas: F) -> Vec<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = String>,
{
    let names = from_list_conns(list_conns);
    if !names.is_empty() {
        return names;
    }
    from_list_sas(&list_sas().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    async fn configured(list_conns: &str, list_sas: &str) -> Vec<String> {
        configured_connections(list_conns, || async move { list_sas.to_string() }).await
    }

    const LIST_CONNS: &str = "\
site-to-site: IKEv2, no reauthentication, rekeying every 14400s
  local:  %any
  remote: 192.0.2.1
  local pre-shared key authentication:
  remote pre-shared key authentication:
  site-b: TUNNEL, rekeying every 3600s
    local:  10.1.0.0/16
    remote: 10.2.0.0/16
  site-a: TUNNEL, rekeying every 3600s
    local:  10.1.0.0/16
    remote: 10.3.0.0/16
";

    #[test]
    fn tunnel_lines() {
        assert_eq!(from_list_conns(LIST_CONNS), vec!["site-a", "site-b"]);
    }

    #[test]
    fn unindented_tunnel_ignored() {
        assert!(from_list_conns("site-a: TUNNEL, rekeying every 3600s").is_empty());
        assert!(from_list_conns("  site-a: TRANSPORT").is_empty());
    }

    #[test]
    fn children_list_form() {
        let text = "conn office\n  Children: lan, dmz,voip  guest\n";
        assert_eq!(from_list_conns(text), vec!["dmz", "guest", "lan", "voip"]);
    }

    #[test]
    fn child_line_form() {
        let text = "  child roadwarrior\nCHILD home.lan\n  childish thing\n";
        assert_eq!(from_list_conns(text), vec!["home.lan", "roadwarrior"]);
    }

    #[test]
    fn all_forms_union() {
        let text = "  net: TUNNEL, ...\n  children: net, voip\n  child mgmt\n";
        assert_eq!(from_list_conns(text), vec!["mgmt", "net", "voip"]);
    }

    #[tokio::test]
    async fn fallback_to_list_sas() {
        let list_sas = "\
  child lan{3}:  INSTALLED, TUNNEL
CHILD_SA dmz{7} established
child 'guest wifi'
  lan{4}:  INSTALLED, TUNNEL
";
        assert_eq!(
            configured("", list_sas).await,
            vec!["dmz", "guest wifi", "lan"]
        );
        assert_eq!(
            configured("no connections loaded\n", list_sas).await,
            vec!["dmz", "guest wifi", "lan"]
        );
    }

    #[tokio::test]
    async fn no_fallback_when_configured() {
        let called = Cell::new(false);
        let names = configured_connections(LIST_CONNS, || {
            called.set(true);
            async { "other{1}:  INSTALLED, TUNNEL\n".to_string() }
        })
        .await;
        assert_eq!(names, vec!["site-a", "site-b"]);
        assert!(!called.get());
    }

    #[tokio::test]
    async fn empty_input() {
        assert!(configured("", "").await.is_empty());
        assert!(from_list_sas("").is_empty());
    }
}
