use once_cell::sync::Lazy;
use std::sync::Arc;
use telemetry::{get_subscriber, init_subscriber};
use transluga::adapters::in_memory_document_store::InMemoryDocumentStore;
use transluga::configuration::{get_configuration, BackendKind, Settings};
use transluga::coordinator::Backend;
use transluga::domain::document_store::StoredDocument;
use transluga::startup::{build_coordinator, coordinator_with_backend, Application};
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter, std::io::stdout, None);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter, std::io::sink, None);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub relay_server: MockServer,
    pub store: Arc<InMemoryDocumentStore>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_newsletter(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/newsletter", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_contact(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/contact", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn subscribers(&self) -> Vec<StoredDocument> {
        self.store.documents("newsletter-subscribers").await
    }

    pub async fn contact_submissions(&self) -> Vec<StoredDocument> {
        self.store.documents("contact-submissions").await
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Launch the application on a random port with the relay pointed at a mock
/// server. The mock backend shares its store with the returned `TestApp`.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    // Launch a mock server to stand in for the form relay
    let relay_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration()
            .await
            .expect("Failed to read configuration.");
        c.application.port = 0;
        c.application.host = "127.0.0.1".to_string();
        c.email_relay.base_url = relay_server.uri();
        c.email_relay.timeout_milliseconds = 500;
        customise(&mut c);
        c
    };

    let store = Arc::new(InMemoryDocumentStore::new());
    let coordinator = match configuration.database.backend {
        BackendKind::Mock => {
            coordinator_with_backend(&configuration, Backend::Mock(store.clone()))
                .expect("Failed to build coordinator.")
        }
        _ => build_coordinator(&configuration)
            .await
            .expect("Failed to build coordinator."),
    };

    let application = Application::with_coordinator(&configuration, coordinator)
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        relay_server,
        store,
        api_client: reqwest::Client::new(),
    }
}
