use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub stock: StockConfig,
    pub ledger: LedgerConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Supplier portal stock feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    pub url: String,
    pub size_param: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Saved stock document served instead of the live portal
    pub file: Option<String>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9090/stock/list".to_string(),
            size_param: "size".to_string(),
            timeout_secs: 10,
            user_agent: "tire-reconcile/0.1".to_string(),
            file: None,
        }
    }
}

/// Price/DOT ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub path: String,
    pub cache_ttl_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "ledger.csv".to_string(),
            cache_ttl_secs: 600,
        }
    }
}

/// Whether rows without a unique code survive parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueCodePolicy {
    /// Drop rows whose unique code is blank or all zeros
    RequireCode,
    /// Keep every non-discontinued row
    KeepAll,
}

/// Which side drives the merge iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    LedgerDriven,
    StockDriven,
}

/// Zero-based column positions of the stock table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub min_columns: usize,
    pub brand: usize,
    pub model: usize,
    pub internal_code: usize,
    pub size: usize,
    pub unique_code: usize,
    pub stock: usize,
    pub supply_price: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            min_columns: 10,
            brand: 0,
            model: 1,
            internal_code: 2,
            size: 3,
            unique_code: 4,
            stock: 6,
            supply_price: 7,
        }
    }
}

/// One brand filter group: display name plus the spellings folded into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandGroupConfig {
    pub display: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub unique_code_policy: UniqueCodePolicy,
    pub merge_strategy: MergeStrategy,
    pub table_layout: TableLayout,
    pub discontinued_markers: Vec<String>,
    pub default_reorder_point: i64,
    /// Empty keeps the built-in brand groups
    pub brand_groups: Vec<BrandGroupConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            unique_code_policy: UniqueCodePolicy::RequireCode,
            merge_strategy: MergeStrategy::LedgerDriven,
            table_layout: TableLayout::default(),
            discontinued_markers: vec!["단종".to_string(), "discontinued".to_string()],
            default_reorder_point: 2,
            brand_groups: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from `tire-reconcile.toml` (optional) and `TIRE__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("tire-reconcile").required(false))
            .add_source(
                config::Environment::with_prefix("TIRE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Like `load`, falling back to defaults when the sources are unreadable
    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Config load failed, using defaults: {}", e);
            Self::default()
        })
    }
}
