use anyhow::anyhow;
use std::time::Duration;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub db_connection_string: String,
    pub db_name: String,

    pub rabbitmq_connection_string: String,
    pub rabbitmq_exchange_name: String,

    pub device_offline_timeout: Duration,
    pub presence_sweep_interval: Duration,
    pub heartbeat_interval: Duration,

    /// Informational only, best effort
    pub client_ip_address: Option<String>,
    pub client_hostname: Option<String>,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        #[cfg(debug_assertions)]
        {
            // Ignore error because .env file is not required
            // as long as env variables are set.
            let _ = dotenvy::dotenv();
        }

        let log_directory = Self::env_var("ORDO_NOTIFIER_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("ORDO_NOTIFIER_LOG_FILENAME")?;
        let db_connection_string = Self::env_var("ORDO_NOTIFIER_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("ORDO_NOTIFIER_DB_NAME")?;
        let rabbitmq_connection_string =
            Self::env_var("ORDO_NOTIFIER_RABBITMQ_CONNECTION_STRING")?;
        let rabbitmq_exchange_name = Self::env_var("ORDO_NOTIFIER_RABBITMQ_EXCHANGE_NAME")?;
        let device_offline_timeout =
            Self::env_var_seconds("ORDO_NOTIFIER_DEVICE_OFFLINE_TIMEOUT_SECONDS")?;
        let presence_sweep_interval =
            Self::env_var_seconds("ORDO_NOTIFIER_PRESENCE_SWEEP_INTERVAL_SECONDS")?;
        let heartbeat_interval = Self::env_var_seconds("ORDO_NOTIFIER_HEARTBEAT_INTERVAL_SECONDS")?;
        let client_ip_address = std::env::var("ORDO_NOTIFIER_IP_ADDRESS").ok();
        let client_hostname = std::env::var("ORDO_NOTIFIER_HOSTNAME").ok();

        Ok(Self {
            log_directory,
            log_filename,
            db_connection_string,
            db_name,
            rabbitmq_connection_string,
            rabbitmq_exchange_name,
            device_offline_timeout,
            presence_sweep_interval,
            heartbeat_interval,
            client_ip_address,
            client_hostname,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }

    fn env_var_seconds(name: &'static str) -> anyhow::Result<Duration> {
        let seconds: u64 = Self::env_var(name)?
            .parse()
            .map_err(|_| anyhow!("environment variable {name} is not a number of seconds"))?;

        Ok(Duration::from_secs(seconds))
    }
}
