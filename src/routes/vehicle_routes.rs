use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateWarrantyRequest, VehicleResponse, WarrantyQuery, WarrantyResponse,
};
use crate::dto::ApiResponse;
use crate::models::TransitionRequest;
use crate::repositories::VehicleFilters;
use crate::services::AllowedMoves;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/vin/:vin", get(get_vehicle_by_vin))
        .route("/:id", get(get_vehicle))
        .route("/:id/moves", get(get_allowed_moves))
        .route("/:id/transition", post(transition_vehicle))
        .route("/:id/receive", post(receive_vehicle))
        .route("/:id/warranty", get(get_warranty).put(update_warranty))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.vehicles.clone())
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let response = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let response = controller(&state).list(filters).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_vehicle_by_vin(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VehicleResponse>, AppError> {
    let response = controller(&state).get_by_vin(&vin).await?;
    Ok(Json(response))
}

async fn get_allowed_moves(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AllowedMoves>, AppError> {
    let response = controller(&state).allowed_moves(id).await?;
    Ok(Json(response))
}

async fn transition_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let response = controller(&state).transition(id, request).await?;
    Ok(Json(response))
}

async fn receive_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let response = controller(&state).receive(id).await?;
    Ok(Json(response))
}

async fn get_warranty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<WarrantyQuery>,
) -> Result<Json<WarrantyResponse>, AppError> {
    let response = controller(&state).warranty(id, query).await?;
    Ok(Json(response))
}

async fn update_warranty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWarrantyRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let response = controller(&state).update_warranty(id, request).await?;
    Ok(Json(response))
}
