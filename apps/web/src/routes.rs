//! HTTP handlers.
//!
//! | Route                     | Handler          |
//! |---------------------------|------------------|
//! | `GET/POST /`, `/login`    | login            |
//! | `GET /logout`             | logout           |
//! | `GET/POST /registrar`     | register         |
//! | `GET /historico`          | history          |
//! | `GET /download`           | download         |
//! | `POST /vendas/{id}/excluir` | delete_sale    |
//! | `GET /health`             | health           |

use axum::extract::{Form, Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use barber_core::export::{export_file_name, write_sales_csv};
use barber_core::validation::{
    normalize_username, validate_amount, validate_client_name, validate_product_name,
    validate_sale_id,
};
use barber_core::{DateRange, Money, SaleDraft, SaleFilter, ValidationError};
use barber_db::{NewSale, SortOrder};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{append_set_cookie_header, clear_cookie, Session, SESSION_COOKIE};
use crate::error::WebResult;
use crate::render::{self, HistoryView, RegisterView};
use crate::AppState;

const LOGIN_FAILED: &str = "Usuário ou senha inválidos";

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub usuario: String,
    pub senha: String,
}

/// Raw register form, kept as text so it can be echoed back on error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    pub cliente: String,
    pub cabelo: String,
    pub barba: String,
    pub sobrancelha: String,
    pub desconto: String,
    pub produto_nome: String,
    pub produto_valor: String,
    /// Only honoured for admins.
    pub barbeiro: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub inicio: Option<String>,
    pub fim: Option<String>,
    pub barbeiro: Option<String>,
}

// =============================================================================
// Login
// =============================================================================

pub async fn login_form() -> Html<String> {
    Html(render::login_page(None).into_string())
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> WebResult<Response> {
    let user = match state.users.authenticate(&form.usuario, &form.senha) {
        Ok(user) => user,
        Err(_) => {
            warn!(usuario = %normalize_username(&form.usuario), "Login failed");
            let page = render::login_page(Some(LOGIN_FAILED));
            return Ok((StatusCode::UNAUTHORIZED, Html(page.into_string())).into_response());
        }
    };

    let token = state.sessions.issue(&user)?;
    let mut response = Redirect::to("/historico").into_response();
    append_set_cookie_header(&mut response, &state.sessions.cookie(&token))?;

    info!(usuario = %user.username, role = %user.role, "Login");
    Ok(response)
}

pub async fn logout() -> WebResult<Response> {
    let mut response = Redirect::to("/login").into_response();
    append_set_cookie_header(&mut response, &clear_cookie(SESSION_COOKIE))?;
    Ok(response)
}

// =============================================================================
// Register Sale
// =============================================================================

pub async fn register_form(session: Session, State(state): State<AppState>) -> Html<String> {
    let values = SaleForm::default();
    register_response(&session, &state, &values, None)
}

pub async fn register(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<SaleForm>,
) -> WebResult<Response> {
    let draft = match build_draft(&session, &state, &form) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(usuario = %session.username(), error = %err, "Sale rejected");
            let page = register_response(&session, &state, &form, Some(err.to_string()));
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let now = Local::now();
    let sale = state
        .db
        .sales()
        .insert(&NewSale::stamped(draft, now.naive_local(), now.with_timezone(&Utc)))
        .await?;

    info!(
        id = %sale.id,
        usuario = %session.username(),
        barbeiro = %sale.barber,
        total = %sale.total,
        "Sale registered"
    );
    Ok(Redirect::to("/historico").into_response())
}

fn register_response(
    session: &Session,
    state: &AppState,
    values: &SaleForm,
    error: Option<String>,
) -> Html<String> {
    let page = render::register_page(&RegisterView {
        user: &session.user,
        products: &state.products,
        barbers: state.users.all(),
        error,
        values,
    });
    Html(page.into_string())
}

/// Turns the submitted form into a draft.
///
/// Unparsable amounts count as zero; negative or oversized ones are refused. An admin
/// may credit any configured user, everyone else is credited themselves.
fn build_draft(
    session: &Session,
    state: &AppState,
    form: &SaleForm,
) -> Result<SaleDraft, ValidationError> {
    let amount = |field: &str, raw: &str| validate_amount(field, Money::parse_lenient(raw));

    let requested = form
        .barbeiro
        .as_deref()
        .map(normalize_username)
        .filter(|b| !b.is_empty());

    let barber = match requested {
        Some(barber) if session.role().is_admin() => {
            if state.users.get(&barber).is_none() {
                return Err(ValidationError::NotAllowed {
                    field: "barbeiro".to_string(),
                    allowed: state
                        .users
                        .all()
                        .into_iter()
                        .map(|u| u.username.clone())
                        .collect(),
                });
            }
            barber
        }
        _ => session.username().to_string(),
    };

    Ok(SaleDraft {
        client: validate_client_name(&form.cliente)?,
        barber,
        haircut: amount("cabelo", &form.cabelo)?,
        beard: amount("barba", &form.barba)?,
        eyebrow: amount("sobrancelha", &form.sobrancelha)?,
        product_name: validate_product_name(&form.produto_nome)?,
        product_price: amount("produto_valor", &form.produto_valor)?,
        discount: amount("desconto", &form.desconto)?,
    })
}

// =============================================================================
// History & Export
// =============================================================================

/// `today` is the shop's local date, read once per request.
fn history_filter(
    session: &Session,
    query: &HistoryQuery,
    today: NaiveDate,
) -> WebResult<SaleFilter> {
    let range = DateRange::from_query(query.inicio.as_deref(), query.fim.as_deref(), today)?;
    Ok(SaleFilter::scoped(
        session.username(),
        session.role(),
        range,
        query.barbeiro.as_deref(),
    ))
}

pub async fn history(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> WebResult<Html<String>> {
    let today = Local::now().date_naive();
    let filter = history_filter(&session, &query, today)?;

    let repo = state.db.sales();
    let sales = repo.list(&filter, SortOrder::Newest).await?;
    let scope = SaleFilter::totals_scope(session.username(), session.role());
    let totals = repo.totals(scope.as_deref(), today).await?;

    let (start, end) = filter.range.query_values();
    let barber = if session.role().is_admin() {
        filter.barber.clone().unwrap_or_default()
    } else {
        String::new()
    };

    let page = render::history_page(&HistoryView {
        user: &session.user,
        sales: &sales,
        totals,
        start,
        end,
        barber,
        barbers: state.users.all(),
    });
    Ok(Html(page.into_string()))
}

pub async fn download(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> WebResult<Response> {
    let filter = history_filter(&session, &query, Local::now().date_naive())?;
    let sales = state.db.sales().list(&filter, SortOrder::Oldest).await?;

    if sales.is_empty() {
        return Ok(Redirect::to("/historico").into_response());
    }

    let body = write_sales_csv(&sales)?;
    let file_name = export_file_name(session.username());
    info!(usuario = %session.username(), rows = sales.len(), "CSV export");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

// =============================================================================
// Admin
// =============================================================================

pub async fn delete_sale(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Redirect> {
    session.require_admin()?;
    validate_sale_id(&id)?;

    state.db.sales().soft_delete(&id, Utc::now()).await?;
    info!(id = %id, usuario = %session.username(), "Sale deleted");

    Ok(Redirect::to("/historico"))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let database = state.db.health_check().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let label = if database { "ok" } else { "degraded" };

    (
        status,
        Json(json!({
            "status": label,
            "database": database,
        })),
    )
}

// =============================================================================
// Router Tests
// =============================================================================
