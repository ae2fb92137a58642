use actix_cors::Cors;
use actix_service::Service;
use actix_web::{dev::ServiceResponse, middleware, web, App, HttpServer};
use futures::future::FutureExt;
use guard::guard;
use pulseboard::api::{self, handlers};
use pulseboard::config::{Config, Credentials};
use pulseboard::metrics;
use pulseboard::upstream::eval::{self, EvalClient};
use tracing::{info, Level};
use url::Url;

#[allow(clippy::cognitive_complexity)]
fn main() {
    let args: Vec<_> = std::env::args().collect();
    guard!(let [_, config_file_path, ..] = &args[..] else {
        eprintln!("First argument should be path to config file");
        return
    });

    let config = Config::from_file(config_file_path);

    // Set up logger output
    let subscriber_builder = tracing_subscriber::fmt().with_max_level(Level::DEBUG);
    if config.human_logs {
        subscriber_builder.init();
    } else {
        subscriber_builder.json().init();
    }

    info!("starting pulseboard");

    let mut sys = actix_rt::System::new("pulseboard");

    let upstream_url =
        Url::parse(&config.upstream_base_url).expect("upstream_base_url isn't a valid URL");
    let credentials = Credentials::from_env();

    // One token for the life of the process. A bootstrap token from the environment skips
    // the auth exchange; otherwise exchange credentials before accepting traffic.
    let token = match credentials.bootstrap_token.clone() {
        Some(token) => {
            info!("using bootstrap token from environment");
            token
        }
        None => {
            // block_on needs a 'static future, so it gets its own copies.
            let url = upstream_url.clone();
            let profile = config.auth_profile.clone();
            let creds = credentials.clone();
            let granted = sys
                .block_on(async move { eval::authenticate(&url, &profile, &creds).await })
                .expect("couldn't authenticate with the evaluation service");
            info!("authenticated with the evaluation service");
            granted
        }
    };

    // Start the aggregator API server. The upstream client is built per worker: awc
    // clients are tied to the worker's runtime.
    info!(
        addr = &config.listen_address[..],
        "starting aggregator API server"
    );
    let max_body_size = config.max_body_size;
    HttpServer::new(move || {
        App::new()
            // Middleware for Prometheus
            .wrap_fn(|request, srv| srv.call(request).map(increment_response_metrics))
            // The dashboard is served from a different origin
            .wrap(Cors::permissive())
            // enable logger
            .wrap(middleware::Logger::default())
            .data(api::State {
                upstream: EvalClient::new(upstream_url.clone(), token.clone()),
            })
            // limit size of the payload (global configuration)
            .app_data(
                web::JsonConfig::default()
                    .limit(max_body_size)
                    .error_handler(handlers::json_error_handler),
            )
            .configure(handlers::configure::<EvalClient>)
    })
    .bind(config.listen_address.clone())
    .expect("couldn't start aggregator HTTP server")
    .run();

    // Start the metrics server
    info!(addr = &config.metrics_address[..], "starting metrics server");
    HttpServer::new(|| {
        App::new().service(
            web::scope("/metrics")
                .service(web::resource("/").route(web::get().to(metrics::endpoint::gather)))
                .service(web::resource("").route(web::get().to(metrics::endpoint::gather))),
        )
    })
    .bind(config.metrics_address)
    .expect("couldn't start metrics server")
    .run();

    sys.run().expect("actix runtime terminated");
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
