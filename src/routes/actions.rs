// src/routes/actions.rs
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dtos::{
    inventory::{CreateInventoryRecordRequest, ReportQuery},
    location::{CreateLocationRequest, DeleteLocationRequest, LocationProductRequest, UpdateLocationRequest},
    product::{CreateProductRequest, DeleteProductRequest, UpdateProductRequest},
    response::Envelope,
    supplier::{CreateSupplierRequest, DeleteSupplierRequest, UpdateSupplierRequest},
};
use crate::error::AppError;
use crate::export::export_file_name;
use crate::handlers::{export, inventory, location, location_product, product, supplier};
use crate::state::AppState;
use crate::store::schema::now_local;

/// Query string of `GET /exec`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQuery {
    pub action: Option<String>,
    pub location_id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Body of `POST /exec`, selected by its `action` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PostRequest {
    AddProduct(CreateProductRequest),
    EditProduct(UpdateProductRequest),
    DeleteProduct(DeleteProductRequest),
    AddSupplier(CreateSupplierRequest),
    EditSupplier(UpdateSupplierRequest),
    DeleteSupplier(DeleteSupplierRequest),
    AddLocation(CreateLocationRequest),
    EditLocation(UpdateLocationRequest),
    DeleteLocation(DeleteLocationRequest),
    AddLocationProduct(LocationProductRequest),
    DeleteLocationProduct(LocationProductRequest),
    AddInventoryRecord(CreateInventoryRecordRequest),
}

const POST_ACTIONS: [&str; 12] = [
    "addProduct",
    "editProduct",
    "deleteProduct",
    "addSupplier",
    "editSupplier",
    "deleteSupplier",
    "addLocation",
    "editLocation",
    "deleteLocation",
    "addLocationProduct",
    "deleteLocationProduct",
    "addInventoryRecord",
];

#[derive(Debug)]
pub enum ActionOutput {
    Data(Value),
    Csv { file_name: String, body: String },
}

impl IntoResponse for ActionOutput {
    fn into_response(self) -> Response {
        match self {
            ActionOutput::Data(data) => (StatusCode::OK, Json(Envelope::success(data))).into_response(),
            ActionOutput::Csv { file_name, body } => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
                ],
                body,
            )
                .into_response(),
        }
    }
}

fn data<T: Serialize>(value: T) -> Result<ActionOutput, AppError> {
    serde_json::to_value(value)
        .map(ActionOutput::Data)
        .map_err(|e| AppError::internal(format!("Failed to serialize response: {e}")))
}

fn message(text: &str) -> Result<ActionOutput, AppError> {
    Ok(ActionOutput::Data(json!({ "message": text })))
}

/// Store access is blocking file I/O, so every action runs off the async workers.
async fn run_blocking<F>(work: F) -> Result<ActionOutput, AppError>
where
    F: FnOnce() -> Result<ActionOutput, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Action task failed: {e}")))?
}

pub async fn exec_get(
    State(state): State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Result<ActionOutput, AppError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    run_blocking(move || dispatch_get(&state, query, now_local())).await
}

pub async fn exec_post(State(state): State<AppState>, body: String) -> Result<ActionOutput, AppError> {
    let request = parse_post(&body)?;
    run_blocking(move || dispatch_post(&state, request, now_local())).await
}

fn dispatch_get(state: &AppState, query: ActionQuery, now: NaiveDateTime) -> Result<ActionOutput, AppError> {
    let store = state.store.as_ref();
    let settings = state.settings.as_ref();
    let report = ReportQuery {
        year: query.year,
        month: query.month,
    };
    let action = query.action.as_deref().map(str::trim).unwrap_or_default();
    tracing::debug!(action, "GET action");

    match action {
        "getLocations" => data(location::get_locations(store, now.date(), &settings.category_order)?),
        "getProducts" => data(product::list_products(store)?),
        "getProductsByLocation" => {
            let location_id = query.location_id.as_deref().map(str::trim).unwrap_or_default();
            data(product::products_by_location(store, location_id)?)
        }
        "getSuppliers" => data(supplier::list_suppliers(store)?),
        "getLocationsMaster" => data(location::list_locations(store)?),
        "getInventoryRecordsJson" => {
            let (year, month) = inventory::resolve_month(report, now.date())?;
            data(inventory::report_rows(store, year, month)?)
        }
        "exportInventoryRecordsCsv" => {
            let (year, month) = inventory::resolve_month(report, now.date())?;
            Ok(ActionOutput::Csv {
                file_name: export_file_name(year, month, now, "csv"),
                body: export::export_csv(store, report, now)?,
            })
        }
        "exportInventoryRecordsExcel" => data(export::export_excel(store, settings, report, now)?),
        "exportInventoryRecordsPdf" => data(export::export_pdf(store, settings, report, now)?),
        "" => Err(AppError::validation("action is required")),
        other => Err(AppError::validation(format!("Unknown action: {other}"))),
    }
}

fn parse_post(body: &str) -> Result<PostRequest, AppError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?;
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::validation("action is required"))?
        .to_string();
    if !POST_ACTIONS.contains(&action.as_str()) {
        return Err(AppError::validation(format!("Unknown action: {action}")));
    }
    serde_json::from_value(value).map_err(|e| AppError::validation(format!("Invalid {action} request: {e}")))
}

fn dispatch_post(state: &AppState, request: PostRequest, now: NaiveDateTime) -> Result<ActionOutput, AppError> {
    let store = state.store.as_ref();
    match request {
        PostRequest::AddProduct(req) => data(product::create_product(store, req)?),
        PostRequest::EditProduct(req) => data(product::update_product(store, req)?),
        PostRequest::DeleteProduct(req) => {
            product::delete_product(store, req)?;
            message("Product deleted")
        }
        PostRequest::AddSupplier(req) => data(supplier::create_supplier(store, req)?),
        PostRequest::EditSupplier(req) => data(supplier::update_supplier(store, req)?),
        PostRequest::DeleteSupplier(req) => {
            supplier::delete_supplier(store, req)?;
            message("Supplier deleted")
        }
        PostRequest::AddLocation(req) => data(location::create_location(store, req)?),
        PostRequest::EditLocation(req) => data(location::update_location(store, req)?),
        PostRequest::DeleteLocation(req) => {
            location::delete_location(store, req)?;
            message("Location deleted")
        }
        PostRequest::AddLocationProduct(req) => data(location_product::add_location_product(store, req)?),
        PostRequest::DeleteLocationProduct(req) => {
            location_product::delete_location_product(store, req)?;
            message("Location product deleted")
        }
        PostRequest::AddInventoryRecord(req) => data(inventory::add_inventory_record(store, req, now)?),
    }
}
