use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tasklane_core::AppError;
use tracing_subscriber::EnvFilter;

/// Process mode selected by the first command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    Serve,
    Migrate,
    SeedDev,
}

impl ApiCommand {
    fn parse(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("seed-dev") => Ok(Self::SeedDev),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'migrate' or 'seed-dev'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_inactivity_minutes: i64,
    pub rbac_bootstrap_on_start: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let command = ApiCommand::parse(env::args().nth(1).as_deref())?;

        let database_url = required_env("DATABASE_URL")?;
        let database_max_connections = parsed_env("DATABASE_MAX_CONNECTIONS", 10)?;
        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parsed_env("API_PORT", 3001)?;

        let cookie_secure = flag_env("SESSION_COOKIE_SECURE", false);
        let session_inactivity_minutes = parsed_env("SESSION_INACTIVITY_MINUTES", 30)?;
        if session_inactivity_minutes <= 0 {
            return Err(AppError::Validation(
                "SESSION_INACTIVITY_MINUTES must be positive".to_owned(),
            ));
        }

        let rbac_bootstrap_on_start = flag_env("RBAC_BOOTSTRAP_ON_START", true);

        Ok(Self {
            command,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            session_inactivity_minutes,
            rbac_bootstrap_on_start,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_value(name, value.trim()),
        _ => Ok(default),
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

fn flag_env(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| parse_flag(value.as_str(), default))
        .unwrap_or(default)
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
