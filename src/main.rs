use finance_tracker::{
    config::{database, settings},
    core::{
        budget::evaluate_budgets,
        clock::SystemClock,
        dashboard::{build_dashboard, format_dashboard_summary},
        settings::notification_policy_for,
    },
    errors::Result,
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let database_url = database::get_database_url(app_config.database_url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Optionally evaluate one owner's budgets and print their dashboard
    let Ok(owner_id) = env::var("OWNER_ID") else {
        info!("OWNER_ID not set, nothing to evaluate.");
        return Ok(());
    };

    let clock = SystemClock;
    let policy = notification_policy_for(&db, &owner_id, app_config.notifications.policy).await?;
    let budgets = evaluate_budgets(&db, &clock, &owner_id, policy).await?;
    let exceeded = budgets.iter().filter(|b| b.exceeded).count();
    info!(owner_id = %owner_id, budgets = budgets.len(), exceeded, "Budgets evaluated");

    let range = env::var("DASHBOARD_RANGE").unwrap_or_else(|_| "month".to_string());
    let snapshot = build_dashboard(&db, &clock, &owner_id, &range).await?;
    info!("\n{}", format_dashboard_summary(&snapshot));

    Ok(())
}
