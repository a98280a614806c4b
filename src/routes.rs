use crate::{
    api::{attendance, report, subject},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let signup_limiter = Arc::new(build_limiter(config.rate_signup_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/signup")
                    .wrap(signup_limiter.clone())
                    .route(web::post().to(handlers::signup)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/subjects")
                    // /subjects
                    .service(
                        web::resource("")
                            .route(web::post().to(subject::create_subject))
                            .route(web::get().to(subject::list_subjects)),
                    )
                    // /subjects/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(subject::delete_subject)),
                    ),
            )
            .service(
                web::resource("/attendance").route(web::post().to(attendance::upsert_attendance)),
            )
            .service(web::resource("/report").route(web::get().to(report::report))),
    );
}
