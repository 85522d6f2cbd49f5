//! Admin Config

use clap::Args;

/// Admin access settings.
#[derive(Debug, Args)]
pub struct AdminConfig {
    /// Hex SHA-256 digest of the admin bearer token; admin routes are closed when unset
    #[arg(long, env = "ADMIN_TOKEN_SHA256", hide_env_values = true)]
    pub admin_token_sha256: Option<String>,
}
