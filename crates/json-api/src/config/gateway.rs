//! Payment Gateway Config

use clap::Args;
use milkrun::signature::GatewaySecret;
use milkrun_app::gateway::GatewayConfig;

/// Payment gateway settings. Online payments are disabled unless all three are set.
#[derive(Debug, Args)]
pub struct GatewaySettings {
    /// Gateway API base URL
    #[arg(long, env = "GATEWAY_BASE_URL")]
    pub gateway_base_url: Option<String>,

    /// Gateway key id
    #[arg(long, env = "GATEWAY_KEY_ID")]
    pub gateway_key_id: Option<String>,

    /// Gateway key secret
    #[arg(long, env = "GATEWAY_KEY_SECRET", hide_env_values = true)]
    pub gateway_key_secret: Option<String>,
}

impl GatewaySettings {
    /// Gateway client settings, when fully configured.
    #[must_use]
    pub fn gateway_config(&self) -> Option<GatewayConfig> {
        match (
            &self.gateway_base_url,
            &self.gateway_key_id,
            &self.gateway_key_secret,
        ) {
            (Some(base_url), Some(key_id), Some(key_secret)) => Some(GatewayConfig {
                base_url: base_url.clone(),
                key_id: key_id.clone(),
                key_secret: GatewaySecret::new(key_secret.as_bytes()),
            }),
            _ => None,
        }
    }
}
