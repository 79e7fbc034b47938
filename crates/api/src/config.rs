use rust_decimal::Decimal;
use storefront_core::cart::{QuantityBounds, DEFAULT_MAX_QUANTITY_PER_ITEM, DEFAULT_MIN_QUANTITY};
use storefront_core::locale::{Locale, FALLBACK_LOCALE};
use storefront_core::order::ChargeSettings;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret and database URL have defaults suitable
/// for local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL of this server, used to build media URLs.
    pub app_url: String,
    /// Storefront base URL, target of OAuth redirects.
    pub frontend_url: String,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Google sign-in credentials; `None` disables the Google routes.
    pub google: Option<GoogleConfig>,
    /// Shop settings: pagination, cart bounds, checkout charges, locale.
    pub shop: ShopConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_URL`              | `http://localhost:3000`    |
    /// | `FRONTEND_URL`         | `http://localhost:5173`    |
    ///
    /// JWT, Google and shop settings are documented on their own loaders.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parse("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_url,
            frontend_url,
            jwt: JwtConfig::from_env(),
            google: GoogleConfig::from_env(),
            shop: ShopConfig::from_env(),
        }
    }
}

/// OAuth client credentials for Google sign-in.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load Google credentials.
    ///
    /// | Env Var                | Required |
    /// |------------------------|----------|
    /// | `GOOGLE_CLIENT_ID`     | no       |
    /// | `GOOGLE_CLIENT_SECRET` | no       |
    /// | `GOOGLE_REDIRECT_URI`  | no       |
    ///
    /// Returns `None` unless all three are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            client_id: read("GOOGLE_CLIENT_ID")?,
            client_secret: read("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: read("GOOGLE_REDIRECT_URI")?,
        })
    }
}

/// Shop settings.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub products_per_page: i64,
    pub orders_per_page: i64,
    pub featured_products_limit: i64,
    pub related_products_limit: i64,
    pub quantity_bounds: QuantityBounds,
    pub charges: ChargeSettings,
    pub default_locale: Locale,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            products_per_page: 12,
            orders_per_page: 10,
            featured_products_limit: 8,
            related_products_limit: 4,
            quantity_bounds: QuantityBounds::default(),
            charges: ChargeSettings::default(),
            default_locale: FALLBACK_LOCALE,
        }
    }
}

impl ShopConfig {
    /// Load shop settings.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `PRODUCTS_PER_PAGE`          | `12`    |
    /// | `ORDERS_PER_PAGE`            | `10`    |
    /// | `FEATURED_PRODUCTS_LIMIT`    | `8`     |
    /// | `RELATED_PRODUCTS_LIMIT`     | `4`     |
    /// | `CART_MIN_QUANTITY`          | `1`     |
    /// | `CART_MAX_QUANTITY_PER_ITEM` | `99`    |
    /// | `SHIPPING_COST`              | `0`     |
    /// | `FREE_SHIPPING_THRESHOLD`    | `0`     |
    /// | `TAX_RATE`                   | `0`     |
    /// | `DEFAULT_LOCALE`             | `en`    |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values or when the cart minimum exceeds the maximum.
    pub fn from_env() -> Self {
        let quantity_bounds = QuantityBounds {
            min: env_parse("CART_MIN_QUANTITY", DEFAULT_MIN_QUANTITY),
            max: env_parse("CART_MAX_QUANTITY_PER_ITEM", DEFAULT_MAX_QUANTITY_PER_ITEM),
        };
        assert!(
            quantity_bounds.min >= 1 && quantity_bounds.min <= quantity_bounds.max,
            "CART_MIN_QUANTITY must be >= 1 and <= CART_MAX_QUANTITY_PER_ITEM"
        );

        Self {
            products_per_page: env_parse("PRODUCTS_PER_PAGE", 12),
            orders_per_page: env_parse("ORDERS_PER_PAGE", 10),
            featured_products_limit: env_parse("FEATURED_PRODUCTS_LIMIT", 8),
            related_products_limit: env_parse("RELATED_PRODUCTS_LIMIT", 4),
            quantity_bounds,
            charges: ChargeSettings {
                shipping_cost: env_parse("SHIPPING_COST", Decimal::ZERO),
                free_shipping_threshold: env_parse("FREE_SHIPPING_THRESHOLD", Decimal::ZERO),
                tax_rate: env_parse("TAX_RATE", Decimal::ZERO),
            },
            default_locale: env_parse("DEFAULT_LOCALE", FALLBACK_LOCALE),
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics with the variable name when the value does not parse.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
