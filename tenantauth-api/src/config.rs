/// Configuration management for the API server
///
/// Loads configuration from environment variables (and a `.env` file when
/// present) into a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Connections kept open (default: 1)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: Wait for a free connection (default: 5)
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 chars)
/// - `JWT_EXPIRES_IN_SECONDS`: Token lifetime; unset issues tokens without `exp`
/// - `DEFAULT_TENANT_ID`: Tenant new users join (default: 1)
/// - `TENANT_DOMAINS`: `domain=tenant_id` pairs, comma-separated; when set,
///   signups are routed by email domain with `DEFAULT_TENANT_ID` as fallback
/// - `PASSWORD_MEMORY_KIB`, `PASSWORD_ITERATIONS`, `PASSWORD_PARALLELISM`:
///   Argon2id work factor (defaults: 65536, 3, 4)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for plain text
///
/// # Example
///
/// ```no_run
/// use tenantauth_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use tenantauth_shared::auth::password::HashParams;
use tenantauth_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Signup configuration
    pub signup: SignupConfig,

    /// Argon2id work factor
    pub password: HashParams,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,

    /// Emit JSON logs
    pub json_logs: bool,
}

/// JWT configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in seconds; `None` means tokens carry no `exp`
    pub expires_in_seconds: Option<i64>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

/// Tenant assignment for new users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupConfig {
    /// Tenant used by the fixed policy, and fallback for the domain policy
    pub default_tenant_id: i64,

    /// Email domain to tenant mapping; empty selects the fixed policy
    pub tenant_domains: HashMap<String, i64>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HashParams::default();
        let pool_defaults = DatabaseConfig::default();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expires_in_seconds = lookup("JWT_EXPIRES_IN_SECONDS")
            .map(|v| parse_var::<i64>("JWT_EXPIRES_IN_SECONDS", &v))
            .transpose()?;

        if matches!(expires_in_seconds, Some(secs) if secs <= 0) {
            anyhow::bail!("JWT_EXPIRES_IN_SECONDS must be positive");
        }

        let tenant_domains = lookup("TENANT_DOMAINS")
            .map(|v| parse_tenant_domains(&v))
            .transpose()?
            .unwrap_or_default();

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var_or(&lookup, "API_PORT", 8080)?,
                cors_origins,
                json_logs: lookup("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: var_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    pool_defaults.max_connections,
                )?,
                min_connections: var_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    pool_defaults.min_connections,
                )?,
                acquire_timeout_seconds: var_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECONDS",
                    pool_defaults.acquire_timeout_seconds,
                )?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_in_seconds,
            },
            signup: SignupConfig {
                default_tenant_id: var_or(&lookup, "DEFAULT_TENANT_ID", 1)?,
                tenant_domains,
            },
            password: HashParams {
                memory_kib: var_or(&lookup, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
                iterations: var_or(&lookup, "PASSWORD_ITERATIONS", defaults.iterations)?,
                parallelism: var_or(&lookup, "PASSWORD_PARALLELISM", defaults.parallelism)?,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Token lifetime, if configured
    pub fn token_lifetime(&self) -> Option<chrono::Duration> {
        self.jwt.expires_in_seconds.map(chrono::Duration::seconds)
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, value, e))
}

fn var_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => parse_var(key, &value),
        None => Ok(default),
    }
}

/// Parses `acme.com=2,example.org=3`
fn parse_tenant_domains(value: &str) -> anyhow::Result<HashMap<String, i64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> anyhow::Result<(String, i64)> {
            let (domain, id) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("TENANT_DOMAINS entry '{}' must be domain=id", entry))?;
            Ok((domain.trim().to_lowercase(), parse_var::<i64>("TENANT_DOMAINS", id)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(vars(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.api.json_logs);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.acquire_timeout_seconds, 5);
        assert_eq!(config.signup.default_tenant_id, 1);
        assert!(config.signup.tenant_domains.is_empty());
        assert_eq!(config.password, HashParams::default());
        assert!(config.token_lifetime().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(vars(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("JWT_EXPIRES_IN_SECONDS", "3600"),
            ("DEFAULT_TENANT_ID", "4"),
            ("TENANT_DOMAINS", "Acme.com=2, example.org=3"),
            ("PASSWORD_MEMORY_KIB", "1024"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_MIN_CONNECTIONS", "3"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECONDS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.token_lifetime(), Some(chrono::Duration::hours(1)));
        assert_eq!(config.signup.default_tenant_id, 4);
        assert_eq!(config.signup.tenant_domains.get("acme.com"), Some(&2));
        assert_eq!(config.signup.tenant_domains.get("example.org"), Some(&3));
        assert_eq!(config.password.memory_kib, 1024);
        assert_eq!(config.password.iterations, 3);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert!(config.api.json_logs);
        assert_eq!(config.database.min_connections, 3);
        assert_eq!(config.database.acquire_timeout_seconds, 2);
    }

    #[test]
    fn test_missing_required() {
        assert!(Config::from_lookup(vars(&[("JWT_SECRET", SECRET)])).is_err());
        assert!(Config::from_lookup(vars(&[("DATABASE_URL", "postgresql://x")])).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::from_lookup(vars(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            ("API_PORT", "not-a-port"),
            ("JWT_EXPIRES_IN_SECONDS", "0"),
            ("TENANT_DOMAINS", "acme.com"),
            ("TENANT_DOMAINS", "acme.com=x"),
        ] {
            let result = Config::from_lookup(vars(&[
                ("DATABASE_URL", "postgresql://localhost/test"),
                ("JWT_SECRET", SECRET),
                (key, value),
            ]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(vars(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
