use product_catalog::infra::config::StorageBackend;
use product_catalog::{AppConfig, PgCatalogStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Checks configuration and the PostgreSQL catalog tables.\n\
         \n\
         Reads env vars:\n\
           DATABASE_URL (required), DB_MAX_CONNECTIONS, BIND_ADDR, STORAGE\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  STORAGE={:?}", config.storage);
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", config.db_max_connections);

    if config.storage == StorageBackend::Memory {
        println!("  In-memory store selected; nothing to check against PostgreSQL.");
        println!("> Preflight OK.");
        return Ok(());
    }

    // Connecting also creates the catalog tables when missing.
    let store = PgCatalogStore::connect(&config).await?;
    println!("  Database reachable, catalog tables present.");

    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(store.pool())
        .await?;
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(store.pool())
        .await?;
    println!("  categories: {} row(s), products: {} row(s)", categories, products);

    // Codes that fail the format would break code allocation for new products.
    let malformed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE code !~ '^P[0-9]{5}$'")
            .fetch_one(store.pool())
            .await?;
    if malformed > 0 {
        eprintln!("  Warning: {} product(s) carry a code outside the PXXXXX format.", malformed);
    }

    let duplicates: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM (SELECT code FROM products GROUP BY code HAVING COUNT(*) > 1) d",
    )
    .fetch_one(store.pool())
    .await?;
    if duplicates > 0 {
        eprintln!("  Warning: {} product code(s) are shared by more than one product.", duplicates);
    }

    println!("> Preflight OK.");
    Ok(())
}
