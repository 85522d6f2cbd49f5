use clap::Args;
use jiff::{Timestamp, ToSpan};
use milkrun_app::{
    auth::{AuthServiceError, PgAuthService},
    database,
};

#[derive(Debug, Args)]
pub(crate) struct CreateSessionArgs {
    /// Customer email address
    #[arg(long)]
    email: String,

    /// Session lifetime in hours; sessions never expire when omitted
    #[arg(long)]
    ttl_hours: Option<i64>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateSessionArgs) -> Result<(), String> {
    let expires_at = args
        .ttl_hours
        .map(|hours| {
            if hours <= 0 {
                return Err("--ttl-hours must be positive".to_string());
            }

            Timestamp::now()
                .checked_add(hours.hours())
                .map_err(|error| format!("invalid session lifetime: {error}"))
        })
        .transpose()?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(pool);

    let session = service
        .issue_session(&args.email, expires_at)
        .await
        .map_err(|error| match error {
            AuthServiceError::NotFound => format!("no customer with email {}", args.email),
            AuthServiceError::Sql(error) => format!("failed to create session: {error}"),
        })?;

    println!("session_uuid: {}", session.metadata.uuid);
    println!("customer_uuid: {}", session.metadata.customer_uuid);

    match session.metadata.expires_at {
        Some(expires_at) => println!("expires_at: {expires_at}"),
        None => println!("expires_at: never"),
    }

    println!("token: {}", session.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
