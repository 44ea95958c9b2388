use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub api_host: String,
    pub api_port: u16,
    pub secret_key: String,
    pub token_ttl_hours: i64,
    pub confirmation_max_age_hours: i64,
    pub mail_from: String,
    pub mail_gateway_url: Option<String>,
    pub mail_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Config {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "catalogue.db".to_string()),

            api_host: env::var("API_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            secret_key: env::var("SECRET_KEY")
                .expect("SECRET_KEY must be set"),

            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),

            confirmation_max_age_hours: env::var("CONFIRMATION_MAX_AGE_HOURS")
                .unwrap_or_else(|_| "72".to_string())
                .parse()
                .unwrap_or(72),

            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@catalogue.local".to_string()),

            mail_gateway_url: env::var("MAIL_GATEWAY_URL").ok(),

            mail_timeout_seconds: env::var("MAIL_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}
