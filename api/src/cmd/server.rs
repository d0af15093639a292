use trip_planner_api::tracing_config::{self, HoneycombConfig};

pub async fn run(
    mut config: trip_planner_api::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let honeycomb_config = HoneycombConfig::take_from(&mut config);
    tracing_config::configure(std::io::stdout, honeycomb_config)?;

    let server = trip_planner_api::create_server(config).await?;
    let result = server.run().await;

    tracing_config::teardown();

    result?;
    Ok(())
}
