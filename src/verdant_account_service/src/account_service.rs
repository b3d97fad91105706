use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header, request},
    routing::post,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use verdant_adapters::{
    config::AllowedOrigins,
    http::routes::{
        confirm_email, register_user, request_email_confirmation, request_password_reset,
        reset_password,
    },
};
use verdant_application::VerificationPolicy;
use verdant_core::{EmailClient, PasswordHasher, TokenGenerator, UserStore};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// Account service exposing registration, email verification and password
/// reset routes
pub struct AccountService {
    router: Router,
}

impl AccountService {
    /// Create a new AccountService from its ports and verification policy
    ///
    /// # Arguments
    /// * `user_store` - Store for user aggregates (must be Clone)
    /// * `password_hasher` - Hasher for new and reset passwords
    /// * `token_generator` - Source of confirmation keys
    /// * `email_client` - Client for sending confirmation messages
    /// * `policy` - Expiry thresholds and link base URL
    pub fn new<U, H, T, E>(
        user_store: U,
        password_hasher: H,
        token_generator: T,
        email_client: E,
        policy: VerificationPolicy,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
        T: TokenGenerator + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let policy = Arc::new(policy);

        let router = Router::new()
            .route("/users", post(register_user::<U, H, T, E>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                token_generator.clone(),
                email_client.clone(),
                policy.clone(),
            ))
            .route(
                "/users/email/confirmation",
                post(request_email_confirmation::<U, T, E>),
            )
            .with_state((
                user_store.clone(),
                token_generator.clone(),
                email_client.clone(),
                policy.clone(),
            ))
            // Confirming only needs the store and the expiry
            .route("/users/email/confirmation/confirm", post(confirm_email::<U>))
            .with_state((user_store.clone(), policy.clone()))
            .route(
                "/users/password-reset",
                post(request_password_reset::<U, T, E>),
            )
            .with_state((
                user_store.clone(),
                token_generator,
                email_client,
                policy.clone(),
            ))
            .route(
                "/users/password-reset/confirm",
                post(reset_password::<U, H>),
            )
            .with_state((user_store, password_hasher, policy));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AccountService into a router that can be nested into
    /// another application
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the account service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Account service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
