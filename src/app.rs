#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::chart::{self, ChartOptions};
use crate::commission::{self, DailyCount};
use crate::query::filter_records;
use crate::record::{self, Record};
use crate::report;
use crate::sheets::{self, SheetsConfig};

/// Spreadsheet document backing the dashboard.
pub const SPREADSHEET_ID: &str = "1P_37Z1vRN97BtwNQtNlf5CHbhb1ee60i_yLlv2ichpo";

/// Shared application state: just the sheet connection parameters.
/// Every interaction re-fetches and recomputes, so no table data is cached.
pub struct AppState {
    sheets: SheetsConfig,
}

#[derive(Deserialize)]
struct LoginForm {
    user: String,
    password: String,
}

#[derive(Deserialize)]
struct DateRangeQuery {
    /// ISO date from the start date picker
    start: NaiveDate,

    /// ISO date from the end date picker
    end: NaiveDate,
}

#[derive(Serialize)]
struct ReportResponse {
    collaborator: String,
    total: i64,
    total_formatted: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    payment_tally: Vec<(String, usize)>,
    payment_summary: String,
    status_tally: Vec<(String, usize)>,
    status_summary: String,
    daily: Vec<DailyCount>,
    dropped_rows: usize,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

/// Start the dashboard web server.
///
/// # Arguments
/// * `addr` - Address to bind, e.g. `127.0.0.1:3000`
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Runs until the process exits
pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sheets = SheetsConfig::from_env(SPREADSHEET_ID, sheets::DEFAULT_RANGE)?;
    let app_state = Arc::new(AppState { sheets });

    // Build router
    let app = Router::new()
        .route("/", get(serve_login_page))
        .route("/login", post(handle_login))
        .route("/logout", get(handle_logout))
        .route("/dashboard", get(serve_dashboard))
        .route("/api/report", get(get_report))
        .route("/chart/daily.png", get(chart_daily))
        .route("/chart/payments.png", get(chart_payments))
        .route("/chart/status.png", get(chart_status))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve the login page HTML
async fn serve_login_page() -> Html<&'static str> {
    Html(include_str!("./static/login.html"))
}

/// Serve the dashboard page, or bounce to the login page without a session.
async fn serve_dashboard(jar: CookieJar) -> Response {
    match session_collaborator(&jar) {
        Some(_) => Html(include_str!("./static/dashboard.html")).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// Handle login form submissions.
///
/// Re-fetches the sheet, normalizes it and checks the submitted pair
/// against the credential columns. A match binds the matching row's
/// collaborator id to a fresh session cookie; a miss leaves the visitor
/// logged out with a rejection message.
async fn handle_login(
    jar: CookieJar,
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let normalized = match load_records(&state).await {
        Ok(normalized) => normalized,
        Err(response) => return response,
    };

    match auth::authenticate(&normalized.records, &form.user, &form.password) {
        Some(collaborator_id) => {
            log::info!("login for collaborator {}", collaborator_id);
            let session_id = auth::create_session(&collaborator_id);
            let cookie = Cookie::new("session", session_id);
            (jar.add(cookie), Redirect::to("/dashboard")).into_response()
        }
        None => (StatusCode::UNAUTHORIZED, "Thông tin đăng nhập không đúng!").into_response(),
    }
}

/// Handle logout: drop the session and clear the cookie.
async fn handle_logout(jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get("session") {
        auth::destroy_session(cookie.value());
    }
    let cookie = Cookie::new("session", "");
    (jar.add(cookie), Redirect::to("/"))
}

/// Build the filtered report for the session's collaborator.
///
/// Each call runs the full cycle: fetch, normalize, filter by collaborator
/// and range, compute the tiered commission, tally the status labels.
async fn get_report(
    jar: CookieJar,
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let Some(collaborator_id) = session_collaborator(&jar) else {
        return unauthorized();
    };

    let normalized = match load_records(&state).await {
        Ok(normalized) => normalized,
        Err(response) => return response,
    };

    let filtered = filter_records(&normalized.records, &collaborator_id, range.start, range.end);
    if filtered.is_empty() {
        return Json(MessageResponse {
            message: "Không có dữ liệu để hiển thị.".to_string(),
        })
        .into_response();
    }

    let commission = commission::compute(&filtered, range.start, range.end);
    let payment_tally = report::tally(&filtered, |r| &r.payment_state);
    let status_tally = report::tally(&filtered, |r| &r.status);

    Json(ReportResponse {
        collaborator: collaborator_id,
        total: commission.total,
        total_formatted: report::format_vnd(commission.total),
        columns: report::DISPLAY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: report::trimmed_rows(&filtered),
        payment_summary: report::tally_summary(
            "Tổng số lượng theo trạng thái thanh toán",
            &payment_tally,
            "đơn",
        ),
        payment_tally,
        status_summary: report::tally_summary(
            "Tổng số lượng theo trạng thái hồ sơ",
            &status_tally,
            "hồ sơ",
        ),
        status_tally,
        daily: commission.daily,
        dropped_rows: normalized.dropped_rows,
    })
    .into_response()
}

/// Daily paid-order line chart for the selected range.
async fn chart_daily(
    jar: CookieJar,
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let Some(collaborator_id) = session_collaborator(&jar) else {
        return unauthorized();
    };
    let normalized = match load_records(&state).await {
        Ok(normalized) => normalized,
        Err(response) => return response,
    };
    let filtered = filter_records(&normalized.records, &collaborator_id, range.start, range.end);
    let commission = commission::compute(&filtered, range.start, range.end);

    let options = ChartOptions {
        title: "Đơn đã thanh toán mỗi ngày".to_string(),
        ..ChartOptions::default()
    };
    match chart::render_daily_line_chart(&commission.daily, &options) {
        Ok(png) => png_response(png),
        Err(e) => chart_error(e.as_ref()),
    }
}

/// Payment-state breakdown bar chart.
async fn chart_payments(
    jar: CookieJar,
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    tally_chart(jar, state, range, "Trạng thái thanh toán", |r| {
        &r.payment_state
    })
    .await
}

/// Case-status breakdown bar chart.
async fn chart_status(
    jar: CookieJar,
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    tally_chart(jar, state, range, "Trạng thái hồ sơ", |r| &r.status).await
}

async fn tally_chart<F>(
    jar: CookieJar,
    state: Arc<AppState>,
    range: DateRangeQuery,
    title: &str,
    field: F,
) -> Response
where
    F: Fn(&Record) -> &str,
{
    let Some(collaborator_id) = session_collaborator(&jar) else {
        return unauthorized();
    };
    let normalized = match load_records(&state).await {
        Ok(normalized) => normalized,
        Err(response) => return response,
    };
    let filtered = filter_records(&normalized.records, &collaborator_id, range.start, range.end);
    let pairs = report::tally(&filtered, field);

    let options = ChartOptions {
        title: title.to_string(),
        ..ChartOptions::default()
    };
    match chart::render_bar_chart(&pairs, &options) {
        Ok(png) => png_response(png),
        Err(e) => chart_error(e.as_ref()),
    }
}

/// Fetch and normalize the sheet, mapping failures to user-visible
/// responses: fetch problems are reported as a bad gateway, a table with
/// missing columns aborts with the column names (no partial data).
async fn load_records(state: &AppState) -> Result<record::Normalized, Response> {
    let table = match sheets::fetch_table(&state.sheets).await {
        Ok(table) => table,
        Err(e) => {
            log::error!("sheet fetch failed: {}", e);
            return Err(
                (StatusCode::BAD_GATEWAY, format!("Không thể tải dữ liệu: {}", e)).into_response(),
            );
        }
    };

    record::normalize(&table).map_err(|e| {
        log::error!("sheet rejected: {}", e);
        (StatusCode::BAD_GATEWAY, format!("Dữ liệu không hợp lệ: {}", e)).into_response()
    })
}

fn session_collaborator(jar: &CookieJar) -> Option<String> {
    jar.get("session")
        .and_then(|cookie| auth::validate_session(cookie.value()))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Vui lòng đăng nhập để sử dụng").into_response()
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}

fn chart_error(e: &dyn std::error::Error) -> Response {
    log::error!("chart rendering failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Chart rendering failed").into_response()
}
