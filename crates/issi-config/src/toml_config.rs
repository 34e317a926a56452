use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use issi_core::PeerId;

use super::gateway_config::{GatewayConfig, GatewayState, SharedConfig};
use super::gateway_config_issi::{CfgIssi, CfgIssiDto, apply_issi_patch};

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref issi) = root.issi {
        if !issi.extra.is_empty() {
            return Err(format!("Unrecognized fields in issi: {:?}", sorted_keys(&issi.extra)).into());
        }
    }
    if let Some(ref gs) = root.gateway_state {
        if !gs.extra.is_empty() {
            return Err(format!("Unrecognized fields in gateway_state: {:?}", sorted_keys(&gs.extra)).into());
        }
    }

    let mut cfg = GatewayConfig {
        system_name: root.system_name,
        peer_id: root.peer_id,
        debug_log: root.debug_log,
        issi: CfgIssi::default(),
    };

    if let Some(issi) = root.issi {
        cfg.issi = apply_issi_patch(issi);
    }

    cfg.validate()?;

    let mut state = GatewayState::default();
    if let Some(gs) = root.gateway_state {
        if let Some(v) = gs.remote_call_in_progress {
            state.remote_call_in_progress = v;
        }
    }

    Ok(SharedConfig::from_parts(cfg, state))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    system_name: String,
    peer_id: PeerId,
    debug_log: Option<String>,

    #[serde(default)]
    issi: Option<CfgIssiDto>,

    #[serde(default)]
    gateway_state: Option<GatewayStatePatch>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct GatewayStatePatch {
    pub remote_call_in_progress: Option<bool>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
config_version = "0.1"
system_name = "ISSI-GW"
peer_id = 9000100
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let shared = from_toml_str(MINIMAL).unwrap();
        let cfg = shared.config();
        assert_eq!(cfg.system_name, "ISSI-GW");
        assert_eq!(cfg.peer_id, 9000100);
        assert_eq!(cfg.debug_log, None);
        assert_eq!(cfg.issi.ptt_priority, 4);
        assert_eq!(cfg.issi.rtp_clock_rate, 8000);
        assert_eq!(cfg.issi.packet_duration, 100);
        assert!(!shared.remote_call_in_progress());
    }

    #[test]
    fn test_issi_section_and_state() {
        let toml = format!(
            "{}debug_log = \"gw.log\"\n[issi]\nptt_priority = 7\nrtp_clock_rate = 16000\n[gateway_state]\nremote_call_in_progress = true\n",
            MINIMAL
        );
        let shared = from_toml_str(&toml).unwrap();
        let cfg = shared.config();
        assert_eq!(cfg.debug_log.as_deref(), Some("gw.log"));
        assert_eq!(cfg.issi.ptt_priority, 7);
        assert_eq!(cfg.issi.rtp_clock_rate, 16000);
        assert_eq!(cfg.issi.packet_duration, 100);
        assert!(shared.remote_call_in_progress());
    }

    #[test]
    fn test_rejects_bad_version() {
        let toml = MINIMAL.replace("0.1", "0.9");
        let err = from_toml_str(&toml).err().unwrap();
        assert!(err.to_string().contains("config_version"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let toml = format!("{}bogus = 1\n", MINIMAL);
        assert!(from_toml_str(&toml).is_err());

        let toml = format!("{}[issi]\nclock = 1\n", MINIMAL);
        let err = from_toml_str(&toml).err().unwrap();
        assert!(err.to_string().contains("clock"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let toml = format!("{}[issi]\nrtp_clock_rate = 0\n", MINIMAL);
        assert!(from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_from_reader() {
        let shared = from_reader(MINIMAL.as_bytes()).unwrap();
        assert_eq!(shared.config().peer_id, 9000100);
    }
}
