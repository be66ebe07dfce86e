use serde::Deserialize;

/// Bootstrap administrator account. Compiled in — the demo ships with exactly
/// one admin and no way to create more at runtime.
pub const ADMIN_EMAIL: &str = "admin@easyearn.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_FULL_NAME: &str = "Super Admin";

/// Mobile-money number shown on the activation screen.
pub const PAYMENT_NUMBER: &str = "+8801860333750";

/// Flat activation fee in BDT. Instructional only: the submitted transaction
/// id is recorded but never checked against this amount.
pub const ACTIVATION_FEE_BDT: i64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| "easyearn.json".into()),
        }
    }
}
