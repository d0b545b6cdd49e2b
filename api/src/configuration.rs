use crate::coordinator::NotificationMode;
use crate::domain::autoresponse::Branding;
use anyhow::Context;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::Client;
use config::FileFormat;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use telemetry::TelemetrySettings;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_relay: EmailRelaySettings,
    pub submission: SubmissionSettings,
    pub branding: Branding,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Which persistence strategy the coordinator is built with.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    DocumentStore,
    RelayOnly,
    Mock,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: BackendKind,
    pub use_local: bool,
    pub local_endpoint: String,
    pub table_name: String,
    pub newsletter_collection: String,
    pub contact_collection: String,
}

#[derive(Deserialize, Clone)]
pub struct EmailRelaySettings {
    pub base_url: String,
    pub newsletter_endpoint: String,
    pub contact_endpoint: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailRelaySettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct SubmissionSettings {
    pub duplicate_check: bool,
    pub notification: NotificationMode,
    /// Blank disables the admin copy on directly sent notifications.
    pub admin_email: String,
}

pub async fn get_configuration() -> Result<Settings, anyhow::Error> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Failed to parse APP_ENVIRONMENT")?;

    let base_path =
        std::env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut builder = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ));

    // Production deployments may ship their settings as an SSM parameter
    // instead of files.
    if let Environment::Production = environment {
        if let Ok(parameter_name) = std::env::var("CONFIG_PARAMETER_NAME") {
            let yaml = fetch_parameter(&parameter_name).await?;
            builder = builder.add_source(config::File::from_str(&yaml, FileFormat::Yaml));
        }
    }

    // E.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
    let settings = builder
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

#[derive(Debug)]
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

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a support environment. Use either local or production",
                other
            )),
        }
    }
}

pub fn region_provider() -> RegionProviderChain {
    RegionProviderChain::default_provider().or_else(Region::new("us-east-1"))
}

#[tracing::instrument(name = "Fetching configuration from SSM")]
async fn fetch_parameter(name: &str) -> Result<String, anyhow::Error> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider())
        .load()
        .await;
    let ssm_client = Client::new(&sdk_config);

    let output = ssm_client
        .get_parameter()
        .name(name)
        .send()
        .await
        .context("Parameter retrieval not successful")?;

    output
        .parameter
        .and_then(|p| p.value)
        .context("Configuration parameter has no value")
}
