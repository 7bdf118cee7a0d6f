use actix_web::{web, App, HttpResponse, HttpServer};
use recurrence_editor_api_structs::{expand_occurrences, get_series_status, RuleRequestBody};
use recurrence_editor_domain::{Occurrence, SeriesStatus};
use recurrence_editor_infra::{HttpOccurrenceService, InMemoryOccurrenceService, RecurrenceContext};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

pub const NOW: i64 = 1_710_504_000_000;

/// What the mock occurrence service answers and what it was asked
pub struct MockState {
    pub occurrences: Mutex<Vec<Occurrence>>,
    pub status: Mutex<SeriesStatus>,
    pub failing: Mutex<bool>,
    pub requests: Mutex<Vec<String>>,
}

impl MockState {
    pub fn set_occurrences(&self, occurrences: Vec<Occurrence>) {
        *self.occurrences.lock().unwrap() = occurrences;
    }

    pub fn set_status(&self, status: SeriesStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, body: RuleRequestBody) -> bool {
        self.requests.lock().unwrap().push(body.rule);
        !*self.failing.lock().unwrap()
    }
}

pub struct TestApp {
    pub address: String,
    pub state: web::Data<MockState>,
    pub ctx: RecurrenceContext,
}

async fn expand(
    body: web::Json<expand_occurrences::RequestBody>,
    state: web::Data<MockState>,
) -> HttpResponse {
    if !state.record(body.0) {
        return HttpResponse::InternalServerError().finish();
    }
    let occurrences = state.occurrences.lock().unwrap().clone();
    HttpResponse::Ok().json(expand_occurrences::APIResponse::new(occurrences))
}

async fn status(
    body: web::Json<get_series_status::RequestBody>,
    state: web::Data<MockState>,
) -> HttpResponse {
    if !state.record(body.0) {
        return HttpResponse::InternalServerError().finish();
    }
    let status = state.status.lock().unwrap().clone();
    HttpResponse::Ok().json(get_series_status::APIResponse::new(status))
}

// Launch a mock occurrence service as a background task and a context talking to it
pub async fn spawn_app() -> TestApp {
    let state = web::Data::new(MockState {
        occurrences: Mutex::new(Vec::new()),
        status: Mutex::new(SeriesStatus {
            valid: true,
            status_text: String::new(),
        }),
        failing: Mutex::new(false),
        requests: Mutex::new(Vec::new()),
    });

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .route(expand_occurrences::PATH, web::post().to(expand))
            .route(get_series_status::PATH, web::post().to(status))
    })
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let _ = actix_web::rt::spawn(server);

    let address = format!("http://127.0.0.1:{}", port);
    let mut ctx =
        RecurrenceContext::create_inmemory(NOW, Arc::new(InMemoryOccurrenceService::new()));
    ctx.occurrence_service = Arc::new(HttpOccurrenceService::new(address.clone()));

    TestApp {
        address,
        state,
        ctx,
    }
}
