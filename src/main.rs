#[macro_use]
extern crate guard;

use actix_web::{
    dev::{Service, ServiceResponse},
    middleware, web, App, HttpServer,
};
use cryptoblog::api::{self, State};
use cryptoblog::config::{Config, StoreKind};
use cryptoblog::datastore::{memory::MemoryStore, PostStore};
use cryptoblog::metrics;
use futures::future::FutureExt;
use prometheus::core::Collector;
use tracing::{error, info, Level};

fn main() {
    let args: Vec<_> = std::env::args().collect();
    guard!(let [_, config_file_path, ..] = &args[..] else {
        eprintln!("First argument should be path to config file");
        std::process::exit(2)
    });

    let config = match Config::from_file(config_file_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(2)
        }
    };

    // Set up logger output
    let subscriber_builder = tracing_subscriber::fmt().with_max_level(Level::DEBUG);
    if config.human_logs {
        subscriber_builder.init();
    } else {
        subscriber_builder.json().init();
    }

    info!(store = ?config.store, "starting cryptoblog");

    if let Err(e) = actix_rt::System::new().block_on(run(config)) {
        error!("cryptoblog stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), anyhow::Error> {
    match config.store {
        StoreKind::Memory => {
            let ds = MemoryStore::new()?;
            serve(config, ds).await
        }
        StoreKind::Postgres => serve_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn serve_postgres(config: Config) -> Result<(), anyhow::Error> {
    use cryptoblog::datastore::postgres::{Dsn, PostgresStore};
    use std::time::Duration;

    // Build the postgres client
    let db = PostgresStore::new(
        Dsn::new(&config)?,
        config.db_pool_size,
        Duration::from_secs(config.db_connection_timeout),
    )?;
    serve(config, db).await
}

#[cfg(not(feature = "postgres"))]
async fn serve_postgres(_config: Config) -> Result<(), anyhow::Error> {
    anyhow::bail!("store = \"postgres\" needs cryptoblog built with `--features postgres`")
}

/// Serve the blog API and the metrics endpoint until either server stops.
async fn serve<DS>(config: Config, ds: DS) -> Result<(), anyhow::Error>
where
    DS: PostStore + Collector + 'static,
{
    prometheus::register(Box::new(ds.clone()))?;
    let state = State { ds };

    // Start the blog API server
    info!(addr = &config.listen_address[..], "starting blog API server");
    let max_body_size = config.max_body_size;
    let api_server = HttpServer::new(move || {
        App::new()
            // Middleware for Prometheus
            .wrap_fn(|request, srv| srv.call(request).map(increment_response_metrics))
            // enable logger
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            // limit size of the payload (global configuration)
            .app_data(api::json_config(max_body_size))
            .configure(api::posts::configure::<DS>)
            .default_service(web::route().to(api::not_found))
    })
    .bind(config.listen_address.as_str())?
    .run();

    // Start the metrics server
    info!(addr = &config.metrics_address[..], "starting metrics server");
    let metrics_server = HttpServer::new(|| {
        App::new().service(
            web::scope("/metrics")
                .service(web::resource("/").route(web::get().to(metrics::endpoint::gather)))
                .service(web::resource("").route(web::get().to(metrics::endpoint::gather))),
        )
    })
    .bind(config.metrics_address.as_str())?
    .run();

    futures::try_join!(api_server, metrics_server)?;
    Ok(())
}

/// If response is OK, increment the metrics for HTTP statuses.
fn increment_response_metrics<E, B>(
    response: Result<ServiceResponse<B>, E>,
) -> Result<ServiceResponse<B>, E> {
    match response {
        Ok(response) => {
            metrics::HTTP_RESPONSES
                .with_label_values(&[response.status().as_str()])
                .inc();
            Ok(response)
        }
        other => other,
    }
}
