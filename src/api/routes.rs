//! API Routes
//!
//! HTTP endpoint definitions. Write routes take HTML-form bodies and
//! redirect back to the overview; read routes return JSON.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::SESSION_LIFETIME_DAYS;
use crate::domain::{Account, AccountId, Customer, CustomerId, Money, Transaction};
use crate::error::{AppError, AppResult};
use crate::handlers::AdjustmentHandler;
use crate::reporting::{ReportingService, Summary};

use super::middleware::{request_is_authenticated, LOGIN_PATH};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct SessionLoginForm {
    #[serde(rename = "idToken", default)]
    pub id_token: Option<String>,
}

// Form fields arrive as optional raw strings and are checked in the handler,
// so a missing or malformed value becomes a JSON `invalid_request` rather
// than a bare extractor rejection.

#[derive(Debug, Deserialize)]
pub struct AddCustomerForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddAccountForm {
    pub customer_id: Option<String>,
    pub account_type: Option<String>,
    pub balance: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBalanceForm {
    pub account_id: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsQuery {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub report: Summary,
    pub is_authenticated: bool,
    pub repo_url: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub account_id: AccountId,
    pub balance: Money,
    pub transactions: Vec<Transaction>,
}

// =========================================================================
// Routers
// =========================================================================

/// Routes reachable without a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(home))
        .route("/login", get(login_page))
        .route("/sessionLogin", post(session_login))
        .route("/logout", post(logout))
        .route("/api/customers", get(list_customers))
        .route("/api/accounts", get(list_accounts))
        .route("/api/accounts/:account_id/transactions", get(list_transactions))
        .route("/api/report", get(report))
}

/// Ledger writes; wrapped in the session gate by `create_router`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/add_customer", post(add_customer))
        .route("/add_account", post(add_account))
        .route("/update_balance", post(update_balance))
}

// =========================================================================
// Pages and sessions
// =========================================================================

async fn health_check() -> &'static str {
    "OK"
}

/// Overview of the whole ledger
async fn home(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<OverviewResponse>> {
    let customers = state.store.list_customers().await?;
    let accounts = state.store.list_accounts(None).await?;
    let report = ReportingService::new(state.store.clone()).summarize().await?;

    Ok(Json(OverviewResponse {
        customers,
        accounts,
        report,
        is_authenticated: request_is_authenticated(&state, &headers),
        repo_url: state.config.repo_url.clone(),
    }))
}

async fn login_page() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><title>Sign in</title></head>
<body>
<form method="post" action="/sessionLogin">
  <input type="hidden" name="idToken" id="idToken">
  <button type="submit">Sign in</button>
</form>
</body>
</html>"#,
    )
}

/// Exchange an identity token for a session cookie
async fn session_login(
    State(state): State<AppState>,
    Form(form): Form<SessionLoginForm>,
) -> Response {
    let Some(id_token) = form.id_token.filter(|t| !t.trim().is_empty()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let cookie = match state.sessions.create_session_cookie(&id_token) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::warn!("Session login failed: {}", e);
            return Redirect::to(LOGIN_PATH).into_response();
        }
    };

    let max_age = SESSION_LIFETIME_DAYS * 24 * 60 * 60;
    let mut set_cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        state.config.session_cookie_name, cookie, max_age
    );
    if state.config.is_production() {
        set_cookie.push_str("; Secure");
    }

    tracing::info!("Session created");
    ([(header::SET_COOKIE, set_cookie)], Redirect::to("/")).into_response()
}

async fn logout(State(state): State<AppState>) -> Response {
    let expired = format!(
        "{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax",
        state.config.session_cookie_name
    );
    ([(header::SET_COOKIE, expired)], Redirect::to(LOGIN_PATH)).into_response()
}

// =========================================================================
// Ledger writes
// =========================================================================

async fn add_customer(
    State(state): State<AppState>,
    Form(form): Form<AddCustomerForm>,
) -> AppResult<Redirect> {
    let first_name = required(form.first_name, "first_name")?;
    let last_name = required(form.last_name, "last_name")?;
    let email = required(form.email, "email")?;

    let id = state
        .store
        .register_customer(&format!("{} {}", first_name, last_name), &email)
        .await?;

    tracing::info!(customer_id = id, "Customer added");
    Ok(Redirect::to("/"))
}

async fn add_account(
    State(state): State<AppState>,
    Form(form): Form<AddAccountForm>,
) -> AppResult<Redirect> {
    let customer_id = parse_id(&required(form.customer_id, "customer_id")?, "customer_id")?;
    let account_type = required(form.account_type, "account_type")?;
    let balance = match form.balance.as_deref().map(str::trim) {
        None | Some("") => Money::ZERO,
        Some(raw) => parse_money(raw, "balance")?,
    };

    let id = state
        .store
        .register_account(customer_id, &account_type, balance)
        .await?;

    tracing::info!(account_id = id, customer_id, "Account added");
    Ok(Redirect::to("/"))
}

async fn update_balance(
    State(state): State<AppState>,
    Form(form): Form<UpdateBalanceForm>,
) -> AppResult<Redirect> {
    let account_id = parse_id(&required(form.account_id, "account_id")?, "account_id")?;
    let amount = parse_money(&required(form.amount, "amount")?, "amount")?;

    let result = AdjustmentHandler::new(state.store.clone())
        .apply_adjustment(account_id, amount)
        .await?;

    tracing::info!(
        account_id,
        transaction_id = result.transaction_id,
        kind = %result.kind,
        "Balance updated"
    );
    Ok(Redirect::to("/"))
}

// =========================================================================
// JSON reads
// =========================================================================

async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.store.list_customers().await?))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountsQuery>,
) -> AppResult<Json<Vec<Account>>> {
    Ok(Json(state.store.list_accounts(query.customer_id).await?))
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> AppResult<Json<TransactionsResponse>> {
    let account = state.store.get_account(account_id).await?;
    let transactions = state.store.list_transactions(Some(account_id)).await?;

    Ok(Json(TransactionsResponse {
        account_id,
        balance: account.balance,
        transactions,
    }))
}

async fn report(State(state): State<AppState>) -> AppResult<Json<Summary>> {
    Ok(Json(ReportingService::new(state.store.clone()).summarize().await?))
}

// =========================================================================
// Form coercion
// =========================================================================

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::InvalidRequest(format!("{} is required", field)))
}

fn parse_id(raw: &str, field: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("{} must be an integer", field)))
}

fn parse_money(raw: &str, field: &str) -> AppResult<Money> {
    raw.parse()
        .map_err(|e| AppError::InvalidRequest(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_login_form_field_name() {
        let form: SessionLoginForm = serde_json::from_str(r#"{"idToken": "abc"}"#).unwrap();
        assert_eq!(form.id_token.as_deref(), Some("abc"));

        let empty: SessionLoginForm = serde_json::from_str("{}").unwrap();
        assert!(empty.id_token.is_none());
    }

    #[test]
    fn test_missing_field_is_invalid_request() {
        assert_eq!(required(Some("x".to_string()), "email").unwrap(), "x");
        assert!(matches!(
            required(None, "email"),
            Err(AppError::InvalidRequest(msg)) if msg == "email is required"
        ));
    }

    #[test]
    fn test_form_coercion() {
        assert_eq!(parse_id(" 7 ", "account_id").unwrap(), 7);
        assert!(matches!(
            parse_id("seven", "account_id"),
            Err(AppError::InvalidRequest(_))
        ));
        assert_eq!(parse_money("-150.0", "amount").unwrap().to_cents().unwrap(), -15000);
        assert!(parse_money("lots", "amount").is_err());
    }
}
