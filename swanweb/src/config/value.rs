/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use humanize_rs::ParseError;
use yaml_rust::{Yaml, yaml};

pub(crate) fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

pub(crate) fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

/// Run `f` on every hash of a section value, a null value is an empty section.
pub(crate) fn foreach_section_kv<F>(v: &Yaml, f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    match v {
        Yaml::Hash(map) => foreach_kv(map, f),
        Yaml::Null => Ok(()),
        _ => Err(anyhow!("yaml value type for section should be 'map'")),
    }
}

pub(crate) fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}

pub(crate) fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

pub(crate) fn as_sockaddr(v: &Yaml) -> anyhow::Result<SocketAddr> {
    if let Yaml::String(s) = v {
        SocketAddr::from_str(s).map_err(|e| anyhow!("invalid socket address {s}: {e}"))
    } else {
        Err(anyhow!(
            "yaml value type for socket address should be 'string'"
        ))
    }
}

/// A relative path is looked up in `lookup_dir`.
pub(crate) fn as_path(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<PathBuf> {
    if let Yaml::String(path) = v {
        if path.is_empty() {
            return Err(anyhow!("empty path"));
        }
        let path = PathBuf::from(path);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(lookup_dir.join(path))
        }
    } else {
        Err(anyhow!("yaml value type for path should be string"))
    }
}

pub(crate) fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                if let Ok(u) = u64::from_str(value) {
                    Ok(Duration::from_secs(u))
                } else {
                    Err(anyhow!("invalid duration string"))
                }
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            if let Ok(u) = u64::try_from(*value) {
                Ok(Duration::from_secs(u))
            } else {
                Err(anyhow!("unsupported duration value"))
            }
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn doc(s: &str) -> Yaml {
        YamlLoader::load_from_str(s).unwrap().remove(0)
    }

    #[test]
    fn key_normalize() {
        assert_eq!(normalize_key("Static-Dir"), "static_dir");
        assert_eq!(normalize_key("recv_timeout"), "recv_timeout");
    }

    #[test]
    fn kv_order_and_errors() {
        let yaml = doc("a: 1\nb: 2");
        let mut keys = Vec::new();
        foreach_kv(yaml.as_hash().unwrap(), |k, _| {
            keys.push(k.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(keys, vec!["a", "b"]);

        let yaml = doc("123: 1");
        assert!(foreach_kv(yaml.as_hash().unwrap(), |_, _| Ok(())).is_err());

        assert!(foreach_section_kv(&Yaml::Null, |_, _| Ok(())).is_ok());
        assert!(foreach_section_kv(&Yaml::Integer(1), |_, _| Ok(())).is_err());
    }

    #[test]
    fn duration() {
        let v = Yaml::String("1m".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(60));

        let v = Yaml::String("15".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(15));

        let v = Yaml::Integer(10);
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(10));

        assert!(as_duration(&Yaml::Integer(-1)).is_err());
        assert!(as_duration(&Yaml::String("10x".to_string())).is_err());
    }

    #[test]
    fn sockaddr() {
        let v = Yaml::String("127.0.0.1:8080".to_string());
        assert_eq!(
            as_sockaddr(&v).unwrap(),
            SocketAddr::from_str("127.0.0.1:8080").unwrap()
        );
        assert!(as_sockaddr(&Yaml::String("localhost".to_string())).is_err());
        assert!(as_sockaddr(&Yaml::Integer(8080)).is_err());
    }

    #[test]
    fn path_lookup() {
        let dir = Path::new("/etc/swanweb");
        let v = Yaml::String("static".to_string());
        assert_eq!(as_path(&v, dir).unwrap(), PathBuf::from("/etc/swanweb/static"));
        let v = Yaml::String("/srv/www".to_string());
        assert_eq!(as_path(&v, dir).unwrap(), PathBuf::from("/srv/www"));
        assert!(as_path(&Yaml::String(String::new()), dir).is_err());
    }

    #[test]
    fn primary() {
        assert_eq!(as_usize(&Yaml::Integer(4096)).unwrap(), 4096);
        assert!(as_usize(&Yaml::Integer(-1)).is_err());
        assert_eq!(as_string(&Yaml::Integer(1)).unwrap(), "1");
        assert!(as_string(&Yaml::Null).is_err());
    }
}
