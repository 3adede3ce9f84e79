use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub busy_timeout_secs: u64,
}

/// Limits applied to multipart image uploads
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Largest accepted image in bytes, before base64 encoding
    pub max_upload_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_URL: &'static str = "sqlite://sql_app.db";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());

        let max_connections = parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?;
        let min_connections = parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?;
        let acquire_timeout_secs =
            parse_var("DB_ACQUIRE_TIMEOUT_SECS", Self::DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let idle_timeout_secs = parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?;
        let max_lifetime_secs = parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?;
        let busy_timeout_secs = parse_var("DB_BUSY_TIMEOUT_SECS", Self::DEFAULT_BUSY_TIMEOUT_SECS)?;

        if min_connections > max_connections {
            return Err("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            busy_timeout_secs,
        })
    }
}

impl UploadConfig {
    pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let max_upload_size = parse_var("MAX_UPLOAD_SIZE", Self::DEFAULT_MAX_UPLOAD_SIZE)?;

        if max_upload_size == 0 {
            return Err("MAX_UPLOAD_SIZE must be greater than zero".to_string());
        }

        Ok(Self { max_upload_size })
    }

    /// Request body limit for upload routes, leaving room for multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_upload_size + 1024 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: Self::DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Category Gallery API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Categories with base64-encoded cover and gallery images".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

/// Read an optional numeric environment variable, falling back to `default`
fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
