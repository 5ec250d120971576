//! Pawn-shop administration backend: client and loan registries, a portfolio
//! dashboard and the five-step pawn application wizard.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::wizard::back_office::PawnBackOffice;

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
#[cfg(feature = "data")]
pub mod wizard;

/// Mounts every JSON API handler under the current scope.
#[cfg(feature = "server")]
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    use crate::routes::{client, dashboard, loan, valuation};

    cfg.service(client::list_clients)
        .service(client::create_client)
        .service(client::show_client)
        .service(client::update_client)
        .service(loan::list_loans)
        .service(loan::create_loan)
        .service(loan::show_loan)
        .service(loan::update_loan)
        .service(loan::update_loan_status)
        .service(loan::list_applications)
        .service(dashboard::show_dashboard)
        .service(valuation::show_valuation);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let back_office = web::Data::new(PawnBackOffice::from_config(repo.clone(), &server_config));

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Listening on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(web::scope("/api").configure(configure_api))
            .app_data(web::Data::new(repo.clone()))
            .app_data(back_office.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
