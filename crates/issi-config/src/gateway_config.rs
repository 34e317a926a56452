use std::sync::{Arc, RwLock};

use issi_core::PeerId;

use crate::gateway_config_issi::CfgIssi;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Name used in log output
    pub system_name: String,
    /// Our peer id towards the FNE
    pub peer_id: PeerId,
    pub debug_log: Option<String>,

    pub issi: CfgIssi,
}

impl GatewayConfig {
    pub fn new(system_name: &str, peer_id: PeerId) -> Self {
        GatewayConfig {
            system_name: system_name.to_string(),
            peer_id,
            debug_log: None,
            issi: CfgIssi::default(),
        }
    }

    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.system_name.is_empty() {
            return Err("system_name must not be empty");
        }
        if self.issi.rtp_clock_rate == 0 {
            return Err("issi.rtp_clock_rate must be nonzero");
        }
        Ok(())
    }
}

/// Mutable gateway state (lock-protected), shared with the ISSI side.
#[derive(Debug, Clone, Default)]
pub struct GatewayState {
    /// Set while the remote ISSI side is transmitting towards us. Local traffic is dropped meanwhile.
    pub remote_call_in_progress: bool,
}

/// Global shared configuration: immutable config + mutable state.
#[derive(Clone)]
pub struct SharedConfig {
    /// Read-only configuration (immutable after construction).
    cfg: Arc<GatewayConfig>,
    /// Mutable state guarded with RwLock
    state: Arc<RwLock<GatewayState>>,
}

impl SharedConfig {
    pub fn new(system_name: &str, peer_id: PeerId) -> Self {
        Self::from_config(GatewayConfig::new(system_name, peer_id))
    }

    pub fn from_config(cfg: GatewayConfig) -> Self {
        Self::from_parts(cfg, GatewayState::default())
    }

    /// Panics on an invalid config. Config loaded from TOML is validated before reaching here.
    pub fn from_parts(cfg: GatewayConfig, state: GatewayState) -> Self {
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid gateway configuration: {}", e),
        }

        Self {
            cfg: Arc::new(cfg),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<GatewayConfig> {
        Arc::clone(&self.cfg)
    }

    /// Read guard for mutable state.
    pub fn state_read(&self) -> std::sync::RwLockReadGuard<'_, GatewayState> {
        self.state.read().expect("GatewayState RwLock blocked")
    }

    /// Write guard for mutable state.
    pub fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, GatewayState> {
        self.state.write().expect("GatewayState RwLock blocked")
    }

    pub fn remote_call_in_progress(&self) -> bool {
        self.state_read().remote_call_in_progress
    }

    /// Called by the ISSI side when a remote transmission starts or ends
    pub fn set_remote_call_in_progress(&self, active: bool) {
        self.state_write().remote_call_in_progress = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shared_between_clones() {
        let cfg = SharedConfig::new("gw", 9000);
        let other = cfg.clone();
        assert!(!cfg.remote_call_in_progress());
        other.set_remote_call_in_progress(true);
        assert!(cfg.remote_call_in_progress());
    }

    #[test]
    #[should_panic(expected = "Invalid gateway configuration")]
    fn test_invalid_config_rejected() {
        let mut cfg = GatewayConfig::new("gw", 1);
        cfg.issi.rtp_clock_rate = 0;
        let _ = SharedConfig::from_config(cfg);
    }
}
