use map_maker::location::markers_from_locations;
use map_maker::{ConnectionSettings, MapError, MapRenderer, StoreClient, TextSurface};
use std::process::ExitCode;

async fn run() -> Result<usize, MapError> {
    let settings = ConnectionSettings::from_env()?;
    log::info!(
        "Reading table '{}' from {}",
        settings.table,
        settings.server_url
    );

    let mut client = StoreClient::from_settings(&settings)?;
    if let Some(credentials) = &settings.credentials {
        client
            .login(&credentials.username, &credentials.password)
            .await?;
    }

    let locations = client
        .fetch_locations(&settings.table, &settings.fields)
        .await?;
    let markers = markers_from_locations(&locations);

    let stdout = std::io::stdout();
    let mut surface = TextSurface::new(stdout.lock());
    MapRenderer::new().render(&mut surface, &markers)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(drawn) => {
            log::info!("Drew {} marker(s)", drawn);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Map rendering failed: {}", e);
            eprintln!("map-maker: {}", e);
            ExitCode::FAILURE
        }
    }
}
