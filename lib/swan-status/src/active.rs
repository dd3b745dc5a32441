/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use crate::pattern::ACTIVE_RULES;

/// Names of the installed child SAs in `swanctl --list-sas` output, sorted.
///
/// Each line is checked against every active rule, and each rule that
/// matches contributes its name.
pub fn active_connections(text: &str) -> Vec<String> {
    crate::sorted_unique(text.lines().flat_map(|line| ACTIVE_RULES.names(line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swanctl_list_sas() {
        let text = "\
gw-gw: #1, ESTABLISHED, IKEv2, 0a8c9e7f6b5d4c3b_i* 1f2e3d4c5b6a7980_r
  local  'moon.strongswan.org' @ 192.168.0.1[4500]
  remote 'sun.strongswan.org' @ 192.168.0.2[4500]
  AES_CBC-128/HMAC_SHA2_256_128/PRF_HMAC_SHA2_256/CURVE_25519
  established 95s ago, rekeying in 13710s
  net-net: #1, reqid 1, INSTALLED, TUNNEL, ESP:AES_GCM_16-128
    installed 95s ago, rekeying in 3270s, expires in 3865s
    in  c1a2b3c4,  1,234 bytes,     12 packets,     5s ago
    out c5d6e7f8,  5,678 bytes,     34 packets,     5s ago
    local  10.1.0.0/16
    remote 10.2.0.0/16
  host-host: #2, reqid 2, INSTALLED, TRANSPORT, ESP:AES_CBC-128/HMAC_SHA2_256_128
";
        assert_eq!(active_connections(text), vec!["host-host", "net-net"]);
    }

    #[test]
    fn every_format() {
        let text = "\
home{1}:  INSTALLED, TUNNEL, reqid 1, ESP SPIs: c1234567_i c7654321_o
CHILD_SA office{2}
  child 'road warrior'
lab: INSTALLED, TUNNEL
Jan  1 00:00:00 charon: 12[IKE] installed CHILD_SA 'backup' with SPIs
dmz: ROUTED, TUNNEL, reqid 3
";
        assert_eq!(
            active_connections(text),
            vec!["backup", "dmz", "home", "lab", "office", "road warrior"]
        );
    }

    #[test]
    fn case_insensitive() {
        let text = "Child 'x'\nchild_sa y{1}\nz: installed, tunnel\n";
        assert_eq!(active_connections(text), vec!["x", "y", "z"]);
    }

    #[test]
    fn dedup() {
        let text = "a{1}: INSTALLED\na{2}: INSTALLED\n  a: #5, reqid 2, INSTALLED, TUNNEL, ESP:AES\n";
        assert_eq!(active_connections(text), vec!["a"]);
    }

    #[test]
    fn nothing_active() {
        assert!(active_connections("").is_empty());
        assert!(active_connections("no IKE_SAs found\n").is_empty());
        assert!(active_connections("   in  c1a2b3c4,  0 bytes,  0 packets\n").is_empty());
    }
}
