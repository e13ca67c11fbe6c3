use std::sync::Arc;
use std::time::Duration;
use tire_reconcile::api;
use tire_reconcile::service::{BrandCatalog, ReconcileOptions, Reconciler};
use tire_reconcile::source::{CsvLedgerSource, FileStockSource, HttpStockSource, LedgerCache, StockSource};
use tire_reconcile::AppConfig;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging with local timestamps
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Load configuration
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let fetch_timeout = Duration::from_secs(config.stock.timeout_secs);

    // Stock feed: saved document when configured, live portal otherwise
    let stock_source: Arc<dyn StockSource> = match &config.stock.file {
        Some(path) => {
            info!("Stock feed: file {}", path);
            Arc::new(FileStockSource::new(path))
        }
        None => {
            info!("Stock feed: {}", config.stock.url);
            Arc::new(HttpStockSource::new(&config.stock)?)
        }
    };

    // Ledger behind the session cache
    let ledger = LedgerCache::new(
        Arc::new(CsvLedgerSource::new(&config.ledger.path)),
        Duration::from_secs(config.ledger.cache_ttl_secs),
        fetch_timeout,
    );
    info!("Ledger: {} (cache TTL {}s)", config.ledger.path, config.ledger.cache_ttl_secs);

    let catalog = BrandCatalog::from_config(&config.pipeline.brand_groups);
    info!("Brand groups: {}", catalog.groups().len());

    let reconciler = Arc::new(
        Reconciler::new(
            stock_source,
            ledger,
            ReconcileOptions::from(&config.pipeline),
            fetch_timeout,
        )
        .with_catalog(catalog),
    );

    let app = api::router(reconciler).layer(ServiceBuilder::new());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST  /api/reconcile         - fetch sources and merge");
    info!("  POST  /api/search            - filter and sort products");
    info!("  POST  /api/orders            - place an order");
    info!("  PATCH /api/products/:id      - discount / price override");
    info!("  POST  /api/ledger/invalidate - drop cached ledger");
    info!("  GET   /api/alerts            - low-stock alerts");
    info!("  GET   /api/brands            - brand filter groups");
    info!("  POST  /api/sort              - select / toggle sort column");
    info!("  DELETE /api/sort             - back to recommendation order");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
