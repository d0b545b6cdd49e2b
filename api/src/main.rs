use telemetry::{get_subscriber, init_subscriber, init_tracer};
use transluga::configuration::get_configuration;
use transluga::startup::Application;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().await?;

    let tracer = match configuration.telemetry.export_enabled() {
        true => Some(init_tracer(&configuration.telemetry)?),
        false => None,
    };

    let subscriber = get_subscriber(
        configuration.telemetry.dataset_name.clone(),
        "info".into(),
        std::io::stdout,
        tracer.as_ref(),
    );
    init_subscriber(subscriber);

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;

    if let Some(tracer) = tracer {
        for result in tracer.force_flush() {
            if let Err(e) = result {
                tracing::warn!(error.message = %e, "Failed to flush spans on shutdown");
            }
        }
    }

    Ok(())
}
