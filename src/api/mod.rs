mod format;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::normalize::{
    age_on, amount_from_number, parse_build_year, parse_civil_status, parse_flag, parse_money,
};
use crate::core::{
    AcquisitionCosts, AnalysisError, AnalysisInput, AnalysisReport, CivilStatus, Equity,
    Household, LendingPolicy, Person, Property, assemble_report, run_analysis,
};
use crate::error::AppError;

pub use format::{ChfFormatter, format_chf};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum CliCivilStatus {
    #[default]
    Single,
    Married,
}

impl From<CliCivilStatus> for CivilStatus {
    fn from(value: CliCivilStatus) -> Self {
        match value {
            CliCivilStatus::Single => CivilStatus::Single,
            CliCivilStatus::Married => CivilStatus::Married,
        }
    }
}

impl From<CivilStatus> for CliCivilStatus {
    fn from(value: CivilStatus) -> Self {
        match value {
            CivilStatus::Single => CliCivilStatus::Single,
            CivilStatus::Married => CliCivilStatus::Married,
        }
    }
}

/// Raw field value as sent by the form: a number, a checkbox, or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl RawValue {
    fn amount(&self) -> f64 {
        match self {
            RawValue::Number(v) => amount_from_number(*v),
            RawValue::Flag(_) => 0.0,
            RawValue::Text(s) => parse_money(s),
        }
    }

    fn text(&self) -> String {
        match self {
            RawValue::Number(v) => v.to_string(),
            RawValue::Flag(v) => v.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }

    fn flag(&self) -> bool {
        match self {
            RawValue::Number(v) => *v != 0.0,
            RawValue::Flag(v) => *v,
            RawValue::Text(s) => parse_flag(s),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzePayload {
    purchase_price: Option<RawValue>,
    renovation_cost: Option<RawValue>,
    build_year: Option<RawValue>,

    transfer_tax: Option<RawValue>,
    notary_fee: Option<RawValue>,
    registry_fee: Option<RawValue>,
    mortgage_note_fee: Option<RawValue>,

    equity_cash: Option<RawValue>,
    #[serde(rename = "equity3a")]
    equity_3a: Option<RawValue>,
    #[serde(rename = "equityPK", alias = "equityPk")]
    equity_pk: Option<RawValue>,

    income1: Option<RawValue>,
    bonus1: Option<RawValue>,
    liabilities1: Option<RawValue>,
    birth_date1: Option<RawValue>,
    disability_pension1: Option<RawValue>,
    survivor_pension1: Option<RawValue>,
    old_age_pension1: Option<RawValue>,
    civil_status1: Option<RawValue>,
    dependent_children1: Option<RawValue>,

    has_partner: Option<RawValue>,
    income2: Option<RawValue>,
    bonus2: Option<RawValue>,
    liabilities2: Option<RawValue>,
    birth_date2: Option<RawValue>,
    disability_pension2: Option<RawValue>,
    survivor_pension2: Option<RawValue>,
    old_age_pension2: Option<RawValue>,
    civil_status2: Option<RawValue>,
    dependent_children2: Option<RawValue>,
}

impl AnalyzePayload {
    fn partner_fields(&self) -> [&Option<RawValue>; 9] {
        [
            &self.income2,
            &self.bonus2,
            &self.liabilities2,
            &self.birth_date2,
            &self.disability_pension2,
            &self.survivor_pension2,
            &self.old_age_pension2,
            &self.civil_status2,
            &self.dependent_children2,
        ]
    }
}

/// Analysis flags. Partner flags are optional; giving any of them, or
/// `--has-partner`, makes it a two-borrower household.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Purchase price in CHF")]
    pub price: f64,
    #[arg(long, default_value_t = 0.0)]
    pub renovation_cost: f64,
    #[arg(long, help = "Construction year; building age defaults to 20 years")]
    pub build_year: Option<i32>,
    #[arg(long, help = "Year the building age is measured against, defaults to today")]
    pub valuation_year: Option<i32>,

    #[arg(long, default_value_t = 0.0)]
    pub transfer_tax: f64,
    #[arg(long, default_value_t = 0.0)]
    pub notary_fee: f64,
    #[arg(long, default_value_t = 0.0)]
    pub registry_fee: f64,
    #[arg(long, default_value_t = 0.0)]
    pub mortgage_note_fee: f64,

    #[arg(long, default_value_t = 0.0)]
    pub equity_cash: f64,
    #[arg(long, default_value_t = 0.0, help = "Pillar 3a withdrawal")]
    pub equity_3a: f64,
    #[arg(long, default_value_t = 0.0, help = "Pension fund (PK) withdrawal")]
    pub equity_pk: f64,

    #[arg(long, default_value_t = 0.0, help = "Annual base income of the first borrower")]
    pub income1: f64,
    #[arg(long, default_value_t = 0.0)]
    pub bonus1: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual debt service of other loans")]
    pub liabilities1: f64,
    #[arg(long)]
    pub age1: Option<u32>,
    #[arg(long, default_value_t = 0.0)]
    pub disability_pension1: f64,
    #[arg(long, default_value_t = 0.0, help = "Paid to the household if this borrower dies")]
    pub survivor_pension1: f64,
    #[arg(long, default_value_t = 0.0)]
    pub old_age_pension1: f64,
    #[arg(long, value_enum, default_value_t = CliCivilStatus::Single)]
    pub civil_status1: CliCivilStatus,
    #[arg(long)]
    pub children1: bool,

    #[arg(long)]
    pub has_partner: bool,
    #[arg(long)]
    pub income2: Option<f64>,
    #[arg(long)]
    pub bonus2: Option<f64>,
    #[arg(long)]
    pub liabilities2: Option<f64>,
    #[arg(long)]
    pub age2: Option<u32>,
    #[arg(long)]
    pub disability_pension2: Option<f64>,
    #[arg(long)]
    pub survivor_pension2: Option<f64>,
    #[arg(long)]
    pub old_age_pension2: Option<f64>,
    #[arg(long, value_enum)]
    pub civil_status2: Option<CliCivilStatus>,
    #[arg(long)]
    pub children2: bool,
}

impl AnalyzeArgs {
    fn partner_supplied(&self) -> bool {
        self.has_partner
            || self.children2
            || self.age2.is_some()
            || self.civil_status2.is_some()
            || [
                self.income2,
                self.bonus2,
                self.liabilities2,
                self.disability_pension2,
                self.survivor_pension2,
                self.old_age_pension2,
            ]
            .iter()
            .any(Option::is_some)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub valuation_year: i32,
    pub affordability_limit_pct: f64,
    pub single_earner: bool,
    pub report: AnalysisReport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LeadPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct LeadResponse {
    status: &'static str,
    message: String,
    reference: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    policy: Arc<LendingPolicy>,
}

pub fn build_input(args: AnalyzeArgs) -> Result<AnalysisInput, String> {
    for (name, value) in [
        ("--price", args.price),
        ("--renovation-cost", args.renovation_cost),
        ("--transfer-tax", args.transfer_tax),
        ("--notary-fee", args.notary_fee),
        ("--registry-fee", args.registry_fee),
        ("--mortgage-note-fee", args.mortgage_note_fee),
        ("--equity-cash", args.equity_cash),
        ("--equity-3a", args.equity_3a),
        ("--equity-pk", args.equity_pk),
        ("--income1", args.income1),
        ("--bonus1", args.bonus1),
        ("--liabilities1", args.liabilities1),
        ("--disability-pension1", args.disability_pension1),
        ("--survivor-pension1", args.survivor_pension1),
        ("--old-age-pension1", args.old_age_pension1),
        ("--income2", args.income2.unwrap_or(0.0)),
        ("--bonus2", args.bonus2.unwrap_or(0.0)),
        ("--liabilities2", args.liabilities2.unwrap_or(0.0)),
        ("--disability-pension2", args.disability_pension2.unwrap_or(0.0)),
        ("--survivor-pension2", args.survivor_pension2.unwrap_or(0.0)),
        ("--old-age-pension2", args.old_age_pension2.unwrap_or(0.0)),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    let primary = Person {
        income: args.income1,
        bonus: args.bonus1,
        age: args.age1,
        liabilities_annual: args.liabilities1,
        disability_pension: args.disability_pension1,
        survivor_pension: args.survivor_pension1,
        old_age_pension: args.old_age_pension1,
        civil_status: args.civil_status1.into(),
        has_dependent_children: args.children1,
    };

    let household = if args.partner_supplied() {
        Household::couple(
            primary,
            Person {
                income: args.income2.unwrap_or(0.0),
                bonus: args.bonus2.unwrap_or(0.0),
                age: args.age2,
                liabilities_annual: args.liabilities2.unwrap_or(0.0),
                disability_pension: args.disability_pension2.unwrap_or(0.0),
                survivor_pension: args.survivor_pension2.unwrap_or(0.0),
                old_age_pension: args.old_age_pension2.unwrap_or(0.0),
                civil_status: args.civil_status2.unwrap_or_default().into(),
                has_dependent_children: args.children2,
            },
        )
    } else {
        Household::single(primary)
    };

    Ok(AnalysisInput {
        household,
        property: Property {
            purchase_price: args.price,
            renovation_cost: args.renovation_cost,
            build_year: args.build_year,
        },
        costs: AcquisitionCosts {
            transfer_tax: args.transfer_tax,
            notary_fee: args.notary_fee,
            registry_fee: args.registry_fee,
            mortgage_note_fee: args.mortgage_note_fee,
        },
        equity: Equity {
            cash: args.equity_cash,
            pillar_3a: args.equity_3a,
            pillar_pk: args.equity_pk,
        },
        valuation_year: args
            .valuation_year
            .unwrap_or_else(|| Local::now().year()),
    })
}

/// Runs the engine and packages the report with CHF display strings.
pub fn analyze_input(
    input: &AnalysisInput,
    policy: &LendingPolicy,
) -> Result<AnalyzeResponse, AnalysisError> {
    let result = run_analysis(input, policy)?;
    Ok(AnalyzeResponse {
        valuation_year: input.valuation_year,
        affordability_limit_pct: policy.affordability_limit_pct,
        single_earner: input.household.partner.is_none(),
        report: assemble_report(&result, Some(&ChfFormatter)),
    })
}

pub fn router(policy: LendingPolicy) -> Router {
    let state = AppState {
        policy: Arc::new(policy),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .route("/api/policy", get(policy_handler))
        .route("/api/lead", post(lead_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, policy: LendingPolicy) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(policy);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "mortgage analysis API listening");
    info!("local access: http://127.0.0.1:{port}/api/analyze");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn policy_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.policy.as_ref())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_get_handler(
    State(state): State<AppState>,
    payload: Result<Query<AnalyzePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => analyze_handler_impl(&state, payload),
        Err(rejection) => malformed_request(&rejection.body_text()),
    }
}

async fn analyze_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => analyze_handler_impl(&state, payload),
        Err(rejection) => malformed_request(&rejection.body_text()),
    }
}

fn malformed_request(detail: &str) -> Response {
    warn!(%detail, "malformed request rejected");
    error_response(StatusCode::BAD_REQUEST, detail)
}

fn analyze_handler_impl(state: &AppState, payload: AnalyzePayload) -> Response {
    let today = Local::now().date_naive();
    match analyze_payload(payload, today, &state.policy) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            warn!(%err, "analysis rejected");
            with_cache_control(err)
        }
    }
}

fn analyze_payload(
    payload: AnalyzePayload,
    today: NaiveDate,
    policy: &LendingPolicy,
) -> Result<AnalyzeResponse, AppError> {
    let input = api_request_from_payload(payload, today).map_err(AppError::Input)?;
    let response = analyze_input(&input, policy)?;
    info!(
        price = input.property.purchase_price,
        single_earner = response.single_earner,
        affordability_pct = response.report.costs.affordability_pct,
        band = ?response.report.costs.band,
        "analysis completed"
    );
    Ok(response)
}

async fn lead_handler(payload: Result<Json<LeadPayload>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request(&rejection.body_text()),
    };
    match acknowledge_lead(&payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn acknowledge_lead(payload: &LeadPayload) -> Result<LeadResponse, String> {
    let given = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let present = |field: &Option<String>| given(field).is_some();
    let has_email = present(&payload.email);
    let has_phone = present(&payload.phone);
    if !has_email && !has_phone {
        return Err("an email address or phone number is required".to_string());
    }
    // Name first, then whichever contact channel was given.
    let reference = given(&payload.name)
        .or_else(|| given(&payload.email))
        .or_else(|| given(&payload.phone))
        .unwrap_or_default();

    info!(
        has_name = present(&payload.name),
        has_email,
        has_phone,
        has_message = present(&payload.message),
        "advisor contact request received"
    );

    Ok(LeadResponse {
        status: "received",
        message: "Thank you! An advisor will review your details.".to_string(),
        reference,
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str, today: NaiveDate) -> Result<AnalysisInput, String> {
    let payload = serde_json::from_str::<AnalyzePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload, today)
}

fn api_request_from_payload(
    payload: AnalyzePayload,
    today: NaiveDate,
) -> Result<AnalysisInput, String> {
    let mut args = default_args_for_api();
    args.valuation_year = Some(today.year());

    if let Some(v) = &payload.purchase_price {
        args.price = v.amount();
    }
    if let Some(v) = &payload.renovation_cost {
        args.renovation_cost = v.amount();
    }
    if let Some(v) = &payload.build_year {
        args.build_year = parse_build_year(&v.text());
    }

    if let Some(v) = &payload.transfer_tax {
        args.transfer_tax = v.amount();
    }
    if let Some(v) = &payload.notary_fee {
        args.notary_fee = v.amount();
    }
    if let Some(v) = &payload.registry_fee {
        args.registry_fee = v.amount();
    }
    if let Some(v) = &payload.mortgage_note_fee {
        args.mortgage_note_fee = v.amount();
    }

    if let Some(v) = &payload.equity_cash {
        args.equity_cash = v.amount();
    }
    if let Some(v) = &payload.equity_3a {
        args.equity_3a = v.amount();
    }
    if let Some(v) = &payload.equity_pk {
        args.equity_pk = v.amount();
    }

    if let Some(v) = &payload.income1 {
        args.income1 = v.amount();
    }
    if let Some(v) = &payload.bonus1 {
        args.bonus1 = v.amount();
    }
    if let Some(v) = &payload.liabilities1 {
        args.liabilities1 = v.amount();
    }
    if let Some(v) = &payload.birth_date1 {
        args.age1 = age_on(&v.text(), today);
    }
    if let Some(v) = &payload.disability_pension1 {
        args.disability_pension1 = v.amount();
    }
    if let Some(v) = &payload.survivor_pension1 {
        args.survivor_pension1 = v.amount();
    }
    if let Some(v) = &payload.old_age_pension1 {
        args.old_age_pension1 = v.amount();
    }
    if let Some(v) = &payload.civil_status1 {
        args.civil_status1 = parse_civil_status(&v.text()).into();
    }
    if let Some(v) = &payload.dependent_children1 {
        args.children1 = v.flag();
    }

    let partner_supplied = payload
        .partner_fields()
        .iter()
        .any(|field| matches!(field, Some(v) if !v.is_blank()));
    args.has_partner = payload
        .has_partner
        .as_ref()
        .map(RawValue::flag)
        .unwrap_or(partner_supplied);

    if args.has_partner {
        args.income2 = Some(payload.income2.as_ref().map_or(0.0, RawValue::amount));
        args.bonus2 = payload.bonus2.as_ref().map(RawValue::amount);
        args.liabilities2 = payload.liabilities2.as_ref().map(RawValue::amount);
        args.age2 = payload
            .birth_date2
            .as_ref()
            .and_then(|v| age_on(&v.text(), today));
        args.disability_pension2 = payload.disability_pension2.as_ref().map(RawValue::amount);
        args.survivor_pension2 = payload.survivor_pension2.as_ref().map(RawValue::amount);
        args.old_age_pension2 = payload.old_age_pension2.as_ref().map(RawValue::amount);
        args.civil_status2 = payload
            .civil_status2
            .as_ref()
            .map(|v| parse_civil_status(&v.text()).into());
        args.children2 = payload
            .dependent_children2
            .as_ref()
            .is_some_and(RawValue::flag);
    }

    build_input(args)
}

fn default_args_for_api() -> AnalyzeArgs {
    AnalyzeArgs {
        price: 0.0,
        renovation_cost: 0.0,
        build_year: None,
        valuation_year: None,
        transfer_tax: 0.0,
        notary_fee: 0.0,
        registry_fee: 0.0,
        mortgage_note_fee: 0.0,
        equity_cash: 0.0,
        equity_3a: 0.0,
        equity_pk: 0.0,
        income1: 0.0,
        bonus1: 0.0,
        liabilities1: 0.0,
        age1: None,
        disability_pension1: 0.0,
        survivor_pension1: 0.0,
        old_age_pension1: 0.0,
        civil_status1: CliCivilStatus::Single,
        children1: false,
        has_partner: false,
        income2: None,
        bonus2: None,
        liabilities2: None,
        age2: None,
        disability_pension2: None,
        survivor_pension2: None,
        old_age_pension2: None,
        civil_status2: None,
        children2: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AffordabilityBand, CoverageStatus};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    fn sample_args() -> AnalyzeArgs {
        let mut args = default_args_for_api();
        args.price = 1_000_000.0;
        args.valuation_year = Some(2026);
        args.build_year = Some(2026);
        args.equity_cash = 250_000.0;
        args.income1 = 120_000.0;
        args.age1 = Some(40);
        args.income2 = Some(80_000.0);
        args.age2 = Some(38);
        args
    }

    const REFERENCE_JSON: &str = r#"{
      "purchasePrice": "1'000'000",
      "renovationCost": "",
      "buildYear": "2026",
      "transferTax": "15'000",
      "notaryFee": 8000,
      "registryFee": "4000",
      "mortgageNoteFee": "3000",
      "equityCash": "150'000",
      "equity3a": "40'000",
      "equityPK": "60'000",
      "income1": "120'000",
      "birthDate1": "1986-05-01",
      "civilStatus1": "married",
      "income2": "80'000",
      "birthDate2": "1988-03-15",
      "civilStatus2": "verheiratet",
      "dependentChildren2": true
    }"#;

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router(LendingPolicy::default())
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, body)
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let input = api_request_from_json(REFERENCE_JSON, today()).expect("json should parse");

        assert_approx(input.property.purchase_price, 1_000_000.0);
        assert_approx(input.property.renovation_cost, 0.0);
        assert_eq!(input.property.build_year, Some(2026));
        assert_approx(input.costs.total(), 30_000.0);
        assert_approx(input.equity.total(), 250_000.0);
        assert_eq!(input.valuation_year, 2026);

        let primary = &input.household.primary;
        assert_approx(primary.income, 120_000.0);
        assert_eq!(primary.age, Some(40));
        assert_eq!(primary.civil_status, CivilStatus::Married);

        let partner = input.household.partner.as_ref().expect("partner present");
        assert_approx(partner.income, 80_000.0);
        assert_eq!(partner.age, Some(38));
        assert_eq!(partner.civil_status, CivilStatus::Married);
        assert!(partner.has_dependent_children);
    }

    #[test]
    fn missing_partner_fields_make_single_earner() {
        let json = r#"{ "purchasePrice": 500000, "income1": 90000, "income2": "" }"#;
        let input = api_request_from_json(json, today()).expect("json should parse");
        assert!(input.household.partner.is_none());
    }

    #[test]
    fn explicit_has_partner_wins_over_field_presence() {
        let json = r#"{ "purchasePrice": 500000, "income1": 90000, "hasPartner": true }"#;
        let input = api_request_from_json(json, today()).expect("json should parse");
        let partner = input.household.partner.expect("explicit partner");
        assert_approx(partner.income, 0.0);

        let json = r#"{ "purchasePrice": 500000, "income2": 90000, "hasPartner": "false" }"#;
        let input = api_request_from_json(json, today()).expect("json should parse");
        assert!(input.household.partner.is_none());
    }

    #[test]
    fn invalid_values_default_to_zero_or_unknown() {
        let json = r#"{
          "purchasePrice": "abc",
          "income1": -5000,
          "birthDate1": "not a date",
          "buildYear": "unknown"
        }"#;
        let input = api_request_from_json(json, today()).expect("json should parse");
        assert_approx(input.property.purchase_price, 0.0);
        assert_approx(input.household.primary.income, 0.0);
        assert_eq!(input.household.primary.age, None);
        assert_eq!(input.property.build_year, None);
    }

    #[test]
    fn build_input_rejects_negative_cli_amounts() {
        let mut args = sample_args();
        args.equity_3a = -1.0;
        let err = build_input(args).expect_err("must reject negative equity");
        assert!(err.contains("--equity-3a"));
    }

    #[test]
    fn build_input_treats_partner_flags_as_second_borrower() {
        let input = build_input(sample_args()).expect("valid args");
        assert!(input.household.partner.is_some());

        let mut args = sample_args();
        args.income2 = None;
        args.age2 = None;
        let input = build_input(args).expect("valid args");
        assert!(input.household.partner.is_none());
    }

    #[test]
    fn analyze_input_reports_reference_household() {
        let input = build_input(sample_args()).expect("valid args");
        let response = analyze_input(&input, &LendingPolicy::default()).expect("valid");

        assert_approx(response.report.acquisition.mortgage.value, 750_000.0);
        assert_eq!(
            response.report.acquisition.mortgage.formatted.as_deref(),
            Some("CHF 750'000")
        );
        assert_approx(response.report.costs.affordability_pct, 26.53);
        assert_eq!(response.report.costs.band, AffordabilityBand::Good);
        assert!(!response.single_earner);
    }

    #[test]
    fn lead_requires_contact_details() {
        let err = acknowledge_lead(&LeadPayload::default()).expect_err("must require contact");
        assert!(err.contains("email"));

        let payload = LeadPayload {
            email: Some("a@example.ch".to_string()),
            ..LeadPayload::default()
        };
        let ack = acknowledge_lead(&payload).expect("valid lead");
        assert_eq!(ack.status, "received");
        assert_eq!(ack.reference, "a@example.ch");

        let named = LeadPayload {
            name: Some("  Anna Muster ".to_string()),
            phone: Some("079 000 00 00".to_string()),
            ..LeadPayload::default()
        };
        assert_eq!(acknowledge_lead(&named).expect("valid lead").reference, "Anna Muster");

        let name_only = LeadPayload {
            name: Some("Anna Muster".to_string()),
            ..LeadPayload::default()
        };
        assert!(acknowledge_lead(&name_only).is_err());
    }

    #[tokio::test]
    async fn post_analyze_returns_report() {
        let (status, body) = send(post_json("/api/analyze", REFERENCE_JSON)).await;
        assert_eq!(status, StatusCode::OK);

        let report = &body["report"];
        assert_eq!(report["acquisition"]["mortgage"]["value"], 750_000.0);
        assert_eq!(
            report["acquisition"]["mortgage"]["formatted"],
            "CHF 750'000"
        );
        assert_eq!(report["costs"]["band"], "good");
        assert!(report["death"]["capitalGap"]["value"].is_number());
        assert!(report["unemployment"].get("capitalGap").is_none());
        assert!(report["retirement"]["fundingStatus"].is_string());
        assert_eq!(body["singleEarner"], false);
        assert_eq!(body["affordabilityLimitPct"], 33.33);
    }

    #[tokio::test]
    async fn get_analyze_accepts_query_strings() {
        let (status, body) =
            send(get("/api/analyze?purchasePrice=800000&equityCash=200000&income1=150000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["singleEarner"], true);
        assert_eq!(body["report"]["acquisition"]["mortgage"]["value"], 600_000.0);
    }

    #[tokio::test]
    async fn price_below_minimum_is_unprocessable() {
        let (status, body) =
            send(post_json("/api/analyze", r#"{ "purchasePrice": "9'999" }"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|msg| msg.contains("purchase price"))
        );
    }

    #[tokio::test]
    async fn policy_health_lead_and_fallback_routes() {
        let (status, body) = send(get("/api/policy")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["affordabilityLimitPct"], 33.33);

        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(post_json("/api/lead", r#"{ "phone": "079 000 00 00" }"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "received");
        assert_eq!(body["reference"], "079 000 00 00");

        let (status, _) = send(post_json("/api/lead", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_errors_with_no_store() {
        let (status, body) = send(post_json("/api/analyze", "{ not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(post_json("/api/analyze", "42")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(post_json("/api/lead", r#"{ "email": 42 }"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let missing_content_type = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .body(Body::from(REFERENCE_JSON))
            .expect("valid request");
        let (status, body) = send(missing_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[test]
    fn coverage_status_serializes_camel_case() {
        let json = serde_json::to_string(&CoverageStatus::InsuranceGap).expect("serializes");
        assert_eq!(json, "\"insuranceGap\"");
    }
}
