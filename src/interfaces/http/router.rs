//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{BookingService, ParkingSpaceService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::storage::InMemoryStore;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::modules::{
    bookings, health, metrics as metrics_module, parking_spaces, users, vehicles,
};

/// Unified state for the whole router. Axum hands each handler its own
/// narrower state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub booking_service: Arc<BookingService>,
    pub parking_service: Arc<ParkingSpaceService>,
    pub metrics_handle: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for bookings::BookingAppState {
    fn from_ref(s: &AppState) -> Self {
        bookings::BookingAppState {
            service: Arc::clone(&s.booking_service),
        }
    }
}

impl FromRef<AppState> for parking_spaces::ParkingAppState {
    fn from_ref(s: &AppState) -> Self {
        parking_spaces::ParkingAppState {
            service: Arc::clone(&s.parking_service),
        }
    }
}

impl FromRef<AppState> for vehicles::VehicleAppState {
    fn from_ref(s: &AppState) -> Self {
        vehicles::VehicleAppState {
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<AppState> for users::UserAppState {
    fn from_ref(s: &AppState) -> Self {
        users::UserAppState {
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            store: Arc::clone(&s.store),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for metrics_module::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics_module::MetricsState {
            handle: s.metrics_handle.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::complete_booking,
        bookings::handlers::get_booking,
        bookings::handlers::list_bookings,
        // Parking spaces
        parking_spaces::handlers::register_parking_space,
        parking_spaces::handlers::list_parking_spaces,
        parking_spaces::handlers::get_parking_space,
        parking_spaces::handlers::update_parking_space,
        parking_spaces::handlers::delete_parking_space,
        parking_spaces::handlers::close_slot,
        parking_spaces::handlers::open_slot,
        // Vehicles
        vehicles::handlers::register_vehicle,
        vehicles::handlers::get_vehicle,
        vehicles::handlers::list_vehicles,
        // Users
        users::handlers::register_user,
        users::handlers::get_user,
        users::handlers::list_users,
    ),
    components(schemas(
        ApiResponse<EmptyData>,
        EmptyData,
        bookings::dto::CreateBookingRequest,
        bookings::dto::BookingDto,
        parking_spaces::dto::RegisterParkingSpaceRequest,
        parking_spaces::dto::UpdateParkingSpaceRequest,
        parking_spaces::dto::ParkingSpaceDto,
        parking_spaces::dto::SlotDto,
        vehicles::dto::RegisterVehicleRequest,
        vehicles::dto::VehicleDto,
        users::dto::RegisterUserRequest,
        users::dto::UserDto,
        health::handlers::HealthResponse,
    )),
    tags(
        (name = "Bookings", description = "Booking lifecycle"),
        (name = "Parking spaces", description = "Parking space and slot management"),
        (name = "Vehicles", description = "Vehicle registration"),
        (name = "Users", description = "User registry"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Parking Booking Service API",
        description = "Slot availability and booking lifecycle for parking spaces"
    )
)]
pub struct ApiDoc;

/// Build the API router with all routes, layers and Swagger UI.
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handlers::health_check))
        .route(
            "/metrics",
            get(metrics_module::handlers::prometheus_metrics),
        )
        .route(
            "/api/v1/bookings",
            post(bookings::handlers::create_booking).get(bookings::handlers::list_bookings),
        )
        .route(
            "/api/v1/bookings/{booking_id}",
            get(bookings::handlers::get_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/cancel",
            post(bookings::handlers::cancel_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/complete",
            post(bookings::handlers::complete_booking),
        )
        .route(
            "/api/v1/parking-spaces",
            post(parking_spaces::handlers::register_parking_space)
                .get(parking_spaces::handlers::list_parking_spaces),
        )
        .route(
            "/api/v1/parking-spaces/{parking_id}",
            get(parking_spaces::handlers::get_parking_space)
                .patch(parking_spaces::handlers::update_parking_space)
                .delete(parking_spaces::handlers::delete_parking_space),
        )
        .route(
            "/api/v1/parking-spaces/{parking_id}/slots/{slot_id}/close",
            post(parking_spaces::handlers::close_slot),
        )
        .route(
            "/api/v1/parking-spaces/{parking_id}/slots/{slot_id}/open",
            post(parking_spaces::handlers::open_slot),
        )
        .route(
            "/api/v1/vehicles",
            post(vehicles::handlers::register_vehicle).get(vehicles::handlers::list_vehicles),
        )
        .route(
            "/api/v1/vehicles/{vehicle_id}",
            get(vehicles::handlers::get_vehicle),
        )
        .route(
            "/api/v1/users",
            post(users::handlers::register_user).get(users::handlers::list_users),
        )
        .route("/api/v1/users/{user_id}", get(users::handlers::get_user))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(
            metrics_module::middleware::http_metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
