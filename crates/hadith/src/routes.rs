use crate::prelude::{eprintln, *};
use crate::service::Service;
use crate::store::Store;
use axum::{
    extract::{Path, Query, Request, State},
    middleware::{from_fn_with_state, Next},
    response::{Html, Response},
    routing::get,
    Json, Router,
};
use hadith_core::api;
use hadith_core::pagination::{PageRequest, Paginated};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Header carrying the shared secret when one is configured.
pub const SECRET_HEADER: &str = "x-aws-secret";

const WELCOME: &str = "<h1>Welcome to sunnah.com API.</h1>";

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "HADITH_PORT", default_value = "8084")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Shared secret expected in the `x-aws-secret` header. Unset disables the check.
    #[arg(long, env = "HADITH_API_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

pub struct AppState {
    pub service: Service,
    pub secret: Option<String>,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl PageQuery {
    fn request(&self) -> Result<PageRequest, Error> {
        Ok(PageRequest::from_query(
            self.page.as_deref(),
            self.limit.as_deref(),
        )?)
    }
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let store = Store::open(&global.database)
        .wrap_err_with(|| format!("Failed to open database {}", global.database))?;
    store.init_schema()?;

    if global.verbose {
        eprintln!("Using database {}", global.database);
    }

    let secret = options.secret.filter(|secret| !secret.is_empty());
    if secret.is_none() {
        log::warn!("No API secret configured, {SECRET_HEADER} is not checked");
    }

    let state = Arc::new(AppState {
        service: Service::new(store),
        secret,
    });

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("Hadith API listening on http://{}", addr);
    }
    log::info!("Listening on {addr}");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// Build the router: `/` is public, everything under `/v1` goes through the secret check.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new().route("/", get(home));

    let protected_routes = Router::new()
        .route("/v1/collections", get(collections))
        .route("/v1/collections/{collection}", get(collection))
        .route("/v1/collections/{collection}/books", get(books))
        .route("/v1/collections/{collection}/books/{book}", get(book))
        .route(
            "/v1/collections/{collection}/books/{book}/chapters",
            get(chapters),
        )
        .route(
            "/v1/collections/{collection}/books/{book}/chapters/{chapter}",
            get(chapter),
        )
        .route(
            "/v1/collections/{collection}/books/{book}/hadiths",
            get(hadiths),
        )
        .route(
            "/v1/collections/{collection}/hadiths/{number}",
            get(hadith),
        )
        .route("/v1/hadiths/random", get(random_hadith))
        .route("/v1/hadiths/{urn}", get(hadith_by_urn))
        .layer(from_fn_with_state(state.clone(), require_secret));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

async fn require_secret(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    if let Some(secret) = state.secret.as_deref() {
        let provided = request
            .headers()
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok());

        if provided != Some(secret) {
            return Err(Error::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Run a store-backed call on the blocking pool.
async fn blocking<T, F>(state: &SharedState, f: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Service) -> Result<T, Error> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| Error::Internal(format!("blocking task failed: {e}")))?
}

async fn home() -> Html<&'static str> {
    Html(WELCOME)
}

async fn not_found(request: Request) -> Error {
    Error::NotFound(request.uri().path().to_string())
}

async fn collections(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<api::Collection>>, Error> {
    let page = query.request()?;
    Ok(Json(blocking(&state, move |s| s.collections(page)).await?))
}

async fn collection(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<api::Collection>, Error> {
    Ok(Json(blocking(&state, move |s| s.collection(&name)).await?))
}

async fn books(
    State(state): State<SharedState>,
    Path(collection): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<api::Book>>, Error> {
    let page = query.request()?;
    Ok(Json(
        blocking(&state, move |s| s.books(&collection, page)).await?,
    ))
}

async fn book(
    State(state): State<SharedState>,
    Path((collection, book)): Path<(String, String)>,
) -> Result<Json<api::Book>, Error> {
    Ok(Json(
        blocking(&state, move |s| s.book(&collection, &book)).await?,
    ))
}

async fn chapters(
    State(state): State<SharedState>,
    Path((collection, book)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<api::Chapter>>, Error> {
    let page = query.request()?;
    Ok(Json(
        blocking(&state, move |s| s.chapters(&collection, &book, page)).await?,
    ))
}

async fn chapter(
    State(state): State<SharedState>,
    Path((collection, book, chapter)): Path<(String, String, String)>,
) -> Result<Json<api::Chapter>, Error> {
    Ok(Json(
        blocking(&state, move |s| s.chapter(&collection, &book, &chapter)).await?,
    ))
}

async fn hadiths(
    State(state): State<SharedState>,
    Path((collection, book)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<api::Hadith>>, Error> {
    let page = query.request()?;
    Ok(Json(
        blocking(&state, move |s| s.hadiths(&collection, &book, page)).await?,
    ))
}

async fn hadith(
    State(state): State<SharedState>,
    Path((collection, number)): Path<(String, String)>,
) -> Result<Json<api::Hadith>, Error> {
    Ok(Json(
        blocking(&state, move |s| s.hadith(&collection, &number)).await?,
    ))
}

async fn hadith_by_urn(
    State(state): State<SharedState>,
    Path(urn): Path<String>,
) -> Result<Json<api::Hadith>, Error> {
    let urn = urn
        .parse::<i64>()
        .map_err(|e| Error::InvalidParameter(format!("urn '{urn}': {e}")))?;
    Ok(Json(blocking(&state, move |s| s.hadith_by_urn(urn)).await?))
}

async fn random_hadith(State(state): State<SharedState>) -> Result<Json<api::Hadith>, Error> {
    Ok(Json(blocking(&state, |s| s.random_hadith()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(secret: Option<&str>) -> Router {
        router(Arc::new(AppState {
            service: Service::new(crate::store::seeded()),
            secret: secret.map(str::to_string),
        }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_home() {
        let (status, body) = get(app(None), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, WELCOME);
    }

    #[tokio::test]
    async fn test_collections_envelope() {
        let (status, json) = get_json(app(None), "/v1/collections?limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["limit"], 1);
        assert!(json["previous"].is_null());
        assert_eq!(json["next"], 2);
        assert_eq!(json["data"][0]["name"], "bukhari");
    }

    #[tokio::test]
    async fn test_invalid_pagination() {
        let (status, json) = get_json(app(None), "/v1/collections?limit=500").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], 422);
        assert_eq!(
            json["error"]["details"],
            "Invalid pagination parameters: invalid limit: 500"
        );

        let (status, _) = get_json(app(None), "/v1/collections?page=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_collection_not_found() {
        let (status, json) = get_json(app(None), "/v1/collections/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], 404);
    }

    #[tokio::test]
    async fn test_book_by_public_number() {
        let (status, json) =
            get_json(app(None), "/v1/collections/bukhari/books/introduction").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["bookNumber"], "introduction");
        assert_eq!(json["book"][0]["name"], "Introduction");
    }

    #[tokio::test]
    async fn test_chapter_route() {
        let (status, json) =
            get_json(app(None), "/v1/collections/bukhari/books/1/chapters/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chapterId"], "1.00");
        assert_eq!(json["bookNumber"], "1");
    }

    #[tokio::test]
    async fn test_hadiths_in_book() {
        let (status, json) =
            get_json(app(None), "/v1/collections/bukhari/books/1/hadiths").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["data"][0]["hadith"][0]["lang"], "en");
        assert_eq!(json["data"][0]["hadith"][1]["lang"], "ar");
    }

    #[tokio::test]
    async fn test_hadith_by_number() {
        let (status, json) = get_json(app(None), "/v1/collections/bukhari/hadiths/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hadith"][0]["urn"], 20);
        assert_eq!(json["hadith"][0]["grades"][0]["graded_by"], "Al-Albani");
    }

    #[tokio::test]
    async fn test_hadith_by_urn() {
        let (status, json) = get_json(app(None), "/v1/hadiths/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hadithNumber"], "1");

        let (status, _) = get_json(app(None), "/v1/hadiths/abc").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_random_hadith() {
        let (status, json) = get_json(app(None), "/v1/hadiths/random").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["collection"], "riyadussalihin");
    }

    #[tokio::test]
    async fn test_secret_required_when_configured() {
        let (status, json) = get_json(app(Some("s3cret")), "/v1/collections").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], 401);

        let request = Request::builder()
            .uri("/v1/collections")
            .header(SECRET_HEADER, "s3cret")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(Some("s3cret")), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_is_public() {
        let (status, _) = get(app(Some("s3cret")), "/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, json) = get_json(app(None), "/v2/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["details"], "Not found: /v2/nothing");
    }
}
