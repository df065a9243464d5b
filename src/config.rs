use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub app_base_url: String,
    pub public_rps: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            email_api_url: get_env("EMAIL_API_URL")?,
            email_api_key: get_env("EMAIL_API_KEY")?,
            email_from: get_env("EMAIL_FROM")?,
            app_base_url: get_env("APP_BASE_URL")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
