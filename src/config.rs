use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Config {
    pub application: Application,
    pub database: Database,
    pub auth: Auth,
    pub admin: Admin,
    pub email: Email,
    pub sync: Sync,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Application {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub base_url: String,
    pub allow_registration: bool,
    pub run_migration: bool,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Auth {
    pub secret: SecretString,
    pub iss: SecretString,
    pub aud: SecretString,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub login_code_ttl_minutes: i64,
}

/// Shared secrets for the admin pipelines. Injected through the config
/// object so handlers never read process environment directly.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct Admin {
    pub secret: SecretString,
    pub cron_token: SecretString,
    pub internal_base_url: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Email {
    pub base_url: String,
    pub sender: String,
    pub send_token: SecretString,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Sync {
    pub mangadex_url: String,
    pub tmdb_url: String,
    pub tmdb_api_key: SecretString,
    pub storage_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: u32,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Database {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,
}

impl Database {
    pub fn without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        let base_path =
            std::env::current_dir().expect("Failed to determine the current directory.");
        let config_directory = base_path.join("configuration");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse APP_ENVIRONMENT.");

        let environment_filename = format!("{}.yaml", environment.as_str());

        Figment::new()
            .merge(Yaml::file(config_directory.join("base.yaml")))
            .merge(Yaml::file(config_directory.join(environment_filename)))
            .merge(Env::raw().split("__"))
            .extract()
    }
}
