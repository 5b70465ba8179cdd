use dashboard_actions::app::diagnostics::verify_data;
use dashboard_actions::infra::telemetry::init_tracing;
use dashboard_actions::storage::{self, schema};
use dashboard_actions::Config;

const DEFAULT_SEED_NAME: &str = "User";
const DEFAULT_SEED_EMAIL: &str = "user@nextmail.com";
const DEFAULT_SEED_PASSWORD: &str = "123456";

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--seed]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional (with --seed):\n\
           SEED_USER_NAME, SEED_USER_EMAIL, SEED_USER_PASSWORD\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let seed = args.iter().any(|a| a == "--seed");

    // Force-read config (nice error messages if missing)
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", config.max_connections);

    let pool = storage::connect(&config).await?;
    let version: String = sqlx::query_scalar("SELECT version()").fetch_one(&pool).await?;
    println!("  Postgres: {}", version);

    schema::ensure_schema(&pool).await?;
    println!("  Tables present (users, customers, invoices, revenue).");

    if seed {
        let name = std::env::var("SEED_USER_NAME").unwrap_or_else(|_| DEFAULT_SEED_NAME.to_string());
        let email = std::env::var("SEED_USER_EMAIL").unwrap_or_else(|_| DEFAULT_SEED_EMAIL.to_string());
        let password =
            std::env::var("SEED_USER_PASSWORD").unwrap_or_else(|_| DEFAULT_SEED_PASSWORD.to_string());
        schema::seed(&pool, &name, &email, &password).await?;
        println!("  Seeded login user {} and revenue figures.", email);
    }

    // Same transaction the /verify-data endpoint runs.
    let rows = verify_data(&pool).await?;
    println!("  Revenue table readable ({} rows).", rows);

    println!("> Preflight OK.");
    Ok(())
}
