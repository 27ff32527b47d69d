use event_registration::configuration::get_configuration;
use event_registration::startup::Application;
use event_registration::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("event_registration".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
