use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Which document store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firebase Realtime Database over REST
    Firebase,
    /// In-process map; data is lost on restart
    Memory,
}

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Root URL of the Realtime Database (e.g. https://<project>.firebaseio.com)
    pub database_url: Option<String>,
    /// Database secret or token sent as the `auth` query parameter
    pub database_secret: Option<String>,
}

/// Firebase Authentication configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Web API key of the Firebase project
    pub api_key: String,
    /// Identity Toolkit base URL
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            identity: IdentityConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
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

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "firebase" => Ok(Self::Firebase),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "STORE_BACKEND must be 'firebase' or 'memory', got '{}'",
                other
            )),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend =
            StoreBackend::parse(&env::var("STORE_BACKEND").unwrap_or_else(|_| "firebase".to_string()))?;

        let database_url = env::var("FIREBASE_DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty());

        if backend == StoreBackend::Firebase && database_url.is_none() {
            return Err("FIREBASE_DATABASE_URL must be set when STORE_BACKEND=firebase".to_string());
        }

        let database_secret = env::var("FIREBASE_DATABASE_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            backend,
            database_url,
            database_secret,
        })
    }
}

impl IdentityConfig {
    const DEFAULT_BASE_URL: &'static str = "https://identitytoolkit.googleapis.com/v1";

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("FIREBASE_API_KEY")
            .map_err(|_| "FIREBASE_API_KEY environment variable is required".to_string())?;

        let base_url = env::var("FIREBASE_IDENTITY_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "KindMeal API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for KindMeal food donations".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("firebase"), Ok(StoreBackend::Firebase));
        assert_eq!(StoreBackend::parse(" Memory "), Ok(StoreBackend::Memory));
        assert!(StoreBackend::parse("postgres").is_err());
    }

    #[test]
    fn test_swagger_credentials() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: "KindMeal API".to_string(),
            version: "0.1.0".to_string(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("pw".to_string());
        assert_eq!(swagger.credentials(), Some("admin:pw".to_string()));
    }
}
