//! A canned catalog backend: an axum router that answers every request from
//! a fixed route table and records what it was sent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct Recorded {
    /// Method and path with query, e.g. `GET /api/search?limit=50`
    pub target: String,
    pub body: String,
}

/// `(request line prefix, status, json body)`. First match wins.
pub type Route = (&'static str, u16, &'static str);

struct Canned {
    routes: Vec<Route>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct CannedServer {
    pub base_url: String,
    canned: Arc<Canned>,
    // Serves until the test drops it
    _runtime: Runtime,
}

impl CannedServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let canned = Arc::new(Canned {
            routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&canned));
        runtime.spawn(async move { axum::serve(listener, app).await });

        Self {
            base_url,
            canned,
            _runtime: runtime,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.canned.requests.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.target).collect()
    }
}

async fn respond(
    State(canned): State<Arc<Canned>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let target = format!("{} {}", method, uri);
    let (status, reply) = canned
        .routes
        .iter()
        .find(|(prefix, _, _)| target.starts_with(prefix))
        .map(|(_, status, reply)| (*status, *reply))
        .unwrap_or((404, r#"{"error": "Not Found"}"#));

    canned.requests.lock().unwrap().push(Recorded {
        target,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], reply).into_response()
}

pub const SEARCH_REPLY: &str = r#"[
    {"entry_id": 1, "title_name": "Cowboy Bebop", "score": 8.75, "medium_type": "anime",
     "type_name": "TV", "episodes": 26, "status_name": "Finished", "age_rating": "R",
     "premier_date_season": "spring", "premier_date_year": 1998},
    {"entry_id": 2, "title_name": "Berserk", "score": "9.47", "medium_type": "manga",
     "volumes": 42, "status_name": "Publishing"}
]"#;

pub const METADATA_REPLY: &str = r#"{
    "ItemType": [
        {"item_type_id": 1, "type_name": "Manga", "medium_type": "manga"},
        {"item_type_id": 4, "type_name": "TV", "medium_type": "anime"}
    ],
    "StatusType": [{"status_id": 1, "status_name": "Finished"}],
    "Genre": [{"genre_id": 1, "name": "Action"}, {"genre_id": 2, "name": "Drama"}]
}"#;
