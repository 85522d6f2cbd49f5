use clap::Args;
use milkrun_app::{auth::PgAuthService, database};

#[derive(Debug, Args)]
pub(crate) struct RevokeSessionArgs {
    /// Raw bearer token to revoke
    #[arg(long, env = "MILKRUN_SESSION_TOKEN", hide_env_values = true)]
    token: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: RevokeSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let revoked = PgAuthService::new(pool)
        .revoke_session(&args.token)
        .await
        .map_err(|error| format!("failed to revoke session: {error}"))?;

    if revoked {
        println!("session revoked");
    } else {
        println!("no active session matches that token");
    }

    Ok(())
}
