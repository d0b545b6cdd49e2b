use crate::adapters::dynamodb_document_store::DynamoDbDocumentStore;
use crate::adapters::formspree_email_relay::FormspreeEmailRelay;
use crate::adapters::in_memory_document_store::InMemoryDocumentStore;
use crate::configuration::{region_provider, BackendKind, DatabaseSettings, Settings};
use crate::coordinator::{check_availability, Backend, Coordinator, CoordinatorOptions};
use crate::domain::EmailRelay;
use crate::routes::{health_check, submit_contact, subscribe};
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::Data;
use actix_web::{web, App, HttpMessage, HttpServer};
use aws_config::BehaviorVersion;
use std::net::TcpListener;
use std::sync::Arc;
use telemetry::CustomLevelRootSpanBuilder;
use tracing_actix_web::{RequestId, TracingLogger};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let coordinator = build_coordinator(&configuration).await?;
        Self::with_coordinator(&configuration, coordinator)
    }

    /// Serve an already assembled coordinator, e.g. one backed by a store the
    /// caller keeps a handle to.
    pub fn with_coordinator(
        configuration: &Settings,
        coordinator: Arc<Coordinator>,
    ) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))?;
        let port = listener.local_addr()?.port();

        let server = run(listener, coordinator)?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Builds the backend selected by configuration and wraps it in a coordinator.
pub async fn build_coordinator(configuration: &Settings) -> Result<Arc<Coordinator>, anyhow::Error> {
    let backend = match configuration.database.backend {
        BackendKind::DocumentStore => {
            let client = dynamodb_client(&configuration.database).await;
            Backend::DocumentStore(Arc::new(DynamoDbDocumentStore::new(
                client,
                configuration.database.table_name.clone(),
            )))
        }
        BackendKind::RelayOnly => Backend::RelayOnly,
        BackendKind::Mock => Backend::Mock(Arc::new(InMemoryDocumentStore::new())),
    };

    coordinator_with_backend(configuration, backend)
}

/// Wires a backend, the relay and the one-off availability check into the
/// coordinator shared by every worker.
pub fn coordinator_with_backend(
    configuration: &Settings,
    backend: Backend,
) -> Result<Arc<Coordinator>, anyhow::Error> {
    let availability = check_availability(configuration);
    if !availability.is_available() {
        tracing::warn!(
            availability = ?availability,
            "Submissions will fail until the backend is configured"
        );
    }

    let relay_settings = &configuration.email_relay;
    let relay: Arc<dyn EmailRelay> = Arc::new(FormspreeEmailRelay::new(
        relay_settings.base_url.clone(),
        relay_settings.newsletter_endpoint.clone(),
        relay_settings.contact_endpoint.clone(),
        relay_settings.timeout(),
    )?);

    let submission = &configuration.submission;
    let options = CoordinatorOptions {
        duplicate_check: submission.duplicate_check,
        notification: submission.notification,
        admin_email: Some(submission.admin_email.trim().to_string()).filter(|e| !e.is_empty()),
        newsletter_collection: configuration.database.newsletter_collection.clone(),
        contact_collection: configuration.database.contact_collection.clone(),
        branding: configuration.branding.clone(),
    };

    Ok(Arc::new(Coordinator::new(
        backend,
        availability,
        relay,
        options,
    )))
}

async fn dynamodb_client(settings: &DatabaseSettings) -> aws_sdk_dynamodb::Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider())
        .load()
        .await;

    let conf_builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    let conf = match settings.use_local {
        true => conf_builder.endpoint_url(&settings.local_endpoint).build(),
        false => conf_builder.build(),
    };

    aws_sdk_dynamodb::Client::from_conf(conf)
}

pub fn run(listener: TcpListener, coordinator: Arc<Coordinator>) -> Result<Server, anyhow::Error> {
    let coordinator: Data<Coordinator> = Data::from(coordinator);

    let server = HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let request_id = req.extensions().get::<RequestId>().copied();
                let res = srv.call(req);
                async move {
                    let mut res = res.await?;
                    if let Some(request_id) = request_id {
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            res.headers_mut()
                                .insert(HeaderName::from_static("x-request-id"), value);
                        }
                    }
                    Ok(res)
                }
            })
            // Outermost, so the `RequestId` read above is already set.
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .route("/health_check", web::get().to(health_check))
            .route("/newsletter", web::post().to(subscribe))
            .route("/contact", web::post().to(submit_contact))
            .app_data(coordinator.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
