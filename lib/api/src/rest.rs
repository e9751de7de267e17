use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use harfzaar_core::Error;
use harfzaar_similarity::{PoemSearch, RhymeSearch};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request budget for embedding and store work
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a request needs, built once at startup
pub struct AppState {
    pub poems: PoemSearch,
    pub rhymes: RhymeSearch,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(poems: PoemSearch, rhymes: RhymeSearch) -> Self {
        Self {
            poems,
            rhymes,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Deserialize)]
struct PoemQuery {
    query: Option<String>,
}

#[derive(Deserialize)]
struct QaafiaQuery {
    #[serde(rename = "firstQaafia")]
    first: Option<String>,
    #[serde(rename = "secondQaafia")]
    second: Option<String>,
}

#[derive(Deserialize)]
struct PatternQuery {
    #[serde(rename = "raviPattern")]
    pattern: Option<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, config: ServerConfig) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::configure)
        })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
    }

    /// Register all routes; shared by the server and tests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(search_poems))
            .route("/qaafiaSearch", web::get().to(search_qaafia))
            .route("/search", web::get().to(keyword_search))
            .route("/qaafia/search", web::get().to(lookup_pattern))
            .route("/health", web::get().to(health));
    }
}

/// Run a pipeline call on the blocking pool under the request timeout.
async fn run_blocking<T, F>(state: &Arc<AppState>, job: F) -> harfzaar_core::Result<T>
where
    F: FnOnce(&AppState) -> harfzaar_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let timeout = state.request_timeout;
    let state = state.clone();
    let task = web::block(move || job(&state));

    match actix_web::rt::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(Error::Internal(format!("worker failed: {}", e))),
        Err(_) => Err(Error::Internal(format!(
            "request timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

fn error_response(err: &Error) -> HttpResponse {
    let message = match err {
        Error::InvalidInput(message) => message.clone(),
        Error::NoCommonSuffix { .. } => "No common ravi pattern found".to_string(),
        Error::NoMatches(_) => "No matching words found in the database".to_string(),
        Error::Internal(message) => message.clone(),
        other => other.to_string(),
    };
    let body = serde_json::json!({ "error": message });

    match err {
        Error::InvalidInput(_) | Error::NoCommonSuffix { .. } => {
            debug!("Rejected request: {}", err);
            HttpResponse::BadRequest().json(body)
        }
        Error::NoMatches(_) => HttpResponse::NotFound().json(body),
        _ => {
            warn!("Request failed: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

async fn search_poems(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PoemQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner().query.unwrap_or_default();

    match run_blocking(&state, move |s| s.poems.search(&query)).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn search_qaafia(
    state: web::Data<Arc<AppState>>,
    query: web::Query<QaafiaQuery>,
) -> ActixResult<HttpResponse> {
    let QaafiaQuery { first, second } = query.into_inner();
    let (first, second) = (first.unwrap_or_default(), second.unwrap_or_default());

    match run_blocking(&state, move |s| s.rhymes.search(&first, &second)).await {
        Ok(results) => {
            debug!(
                "Pattern '{}' produced {} matches",
                results.pattern,
                results.matches.len()
            );
            Ok(HttpResponse::Ok().json(results))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn keyword_search(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PoemQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner().query.unwrap_or_default();

    match run_blocking(&state, move |s| s.poems.keyword_search(&query)).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn lookup_pattern(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PatternQuery>,
) -> ActixResult<HttpResponse> {
    let pattern = query.into_inner().pattern.unwrap_or_default();

    match run_blocking(&state, move |s| s.rhymes.lookup_pattern(&pattern)).await {
        Ok(words) => Ok(HttpResponse::Ok().json(words)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn health(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "poems_indexed": state.poems.indexed(),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use harfzaar_core::{Filter, MemoryStore, Poem, PoemIndex, Result, RhymeWord, Vector, WordStore};
    use harfzaar_similarity::{Embedder, HashEmbedder};
    use serde_json::Value;

    const DIM: usize = 64;

    struct SlowEmbedder;

    impl Embedder for SlowEmbedder {
        fn embed(&self, _text: &str) -> Result<Vector> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Vector::new(vec![1.0; DIM]))
        }

        fn dimension(&self) -> usize {
            DIM
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    struct DownStore;

    impl WordStore for DownStore {
        fn find_words(&self, _filter: &dyn Filter<RhymeWord>) -> Result<Vec<RhymeWord>> {
            Err(Error::Storage("connection refused".to_string()))
        }

        fn word_count(&self) -> Result<usize> {
            Ok(0)
        }
    }

    fn state_with(embedder: Arc<dyn Embedder>, words: Arc<dyn WordStore>) -> AppState {
        let hasher = HashEmbedder::new(DIM);
        let poems = vec![
            Poem::new("a", "Judaai", "love and separation, hijr ki raat"),
            Poem::new("b", "Judaai", "love and separation once more"),
            Poem::new("c", "Bazaar", "prices of grain in the morning market"),
        ];
        let index = PoemIndex::from_entries(
            DIM,
            poems
                .iter()
                .map(|p| (p.id.clone(), hasher.embed(&p.embedding_text()).unwrap())),
        )
        .unwrap();
        let store = Arc::new(MemoryStore::new().with_poems(poems));

        AppState::new(
            PoemSearch::new(embedder.clone(), Arc::new(index), store),
            RhymeSearch::new(embedder, words),
        )
    }

    fn default_state() -> Arc<AppState> {
        let hasher = HashEmbedder::new(DIM);
        let words = ["arranged", "exchanged", "estranged"]
            .iter()
            .map(|w| {
                RhymeWord::new(*w, ["d", "ed", *w]).with_embedding(hasher.embed(w).unwrap())
            })
            .chain(std::iter::once(RhymeWord::new("danged", ["d", "ed", "anged"])))
            .collect::<Vec<_>>();
        Arc::new(state_with(
            Arc::new(hasher),
            Arc::new(MemoryStore::new().with_words(words)),
        ))
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(RestApi::configure),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_poem_search() {
        let (status, body) = get(default_state(), "/?query=love%20and%20separation").await;
        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results[0]["poetryTitle"], "Judaai");
        let judaai = results.iter().filter(|r| r["poetryTitle"] == "Judaai").count();
        assert_eq!(judaai, 1);
        assert!(results.len() <= 5);
    }

    #[actix_web::test]
    async fn test_poem_search_requires_query() {
        let (status, body) = get(default_state(), "/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query cannot be empty");
    }

    #[actix_web::test]
    async fn test_qaafia_search() {
        let (status, body) =
            get(default_state(), "/qaafiaSearch?firstQaafia=changed&secondQaafia=ranged").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["raviPattern"], "anged");
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m["word"] != "danged"));
        let scores: Vec<f64> = matches.iter().map(|m| m["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[actix_web::test]
    async fn test_qaafia_client_errors() {
        let (status, _) = get(default_state(), "/qaafiaSearch?firstQaafia=changed").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            get(default_state(), "/qaafiaSearch?firstQaafia=cat&secondQaafia=dog").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No common ravi pattern found");

        let (status, _) =
            get(default_state(), "/qaafiaSearch?firstQaafia=kitab&secondQaafia=jawab").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_qaafia_store_failure_is_500() {
        let state = Arc::new(state_with(Arc::new(HashEmbedder::new(DIM)), Arc::new(DownStore)));
        let (status, body) =
            get(state, "/qaafiaSearch?firstQaafia=changed&secondQaafia=ranged").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }

    #[actix_web::test]
    async fn test_request_timeout() {
        let state = Arc::new(
            state_with(Arc::new(SlowEmbedder), Arc::new(MemoryStore::new()))
                .with_request_timeout(Duration::from_millis(50)),
        );
        let (status, body) = get(state, "/?query=raat").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("timed out"));
    }

    #[actix_web::test]
    async fn test_keyword_search_and_pattern_lookup() {
        let (status, body) = get(default_state(), "/search?query=GRAIN").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["poetryTitle"], "Bazaar");

        let (status, body) = get(default_state(), "/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));

        let (status, body) = get(default_state(), "/qaafia/search?raviPattern=ed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);

        let (status, _) = get(default_state(), "/qaafia/search?raviPattern=anged").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_health() {
        let (status, body) = get(default_state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["poems_indexed"], 3);
    }
}
