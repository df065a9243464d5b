use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::course_dto::{
        CourseListQuery, CourseResponse, CreateCoursePayload, UpdateCoursePayload,
        UpdateCourseStatusPayload,
    },
    error::Result,
    extractors::ValidJson,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/courses",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Search in name and description"),
        ("refresh" = Option<bool>, Query, description = "Bypass the cached list and store a fresh one")
    ),
    responses(
        (status = 200, description = "List of courses", body = Json<Vec<CourseResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<impl IntoResponse> {
    // Filtered reads never consult or populate the snapshot.
    let courses = if query.is_filtered() {
        state.course_service.list_filtered(query).await?
    } else {
        let service = state.course_service.clone();
        let loader = move || async move { service.list_all().await };
        if query.wants_refresh() {
            state.course_cache.refresh(loader).await?
        } else {
            state.course_cache.get_or_refresh(loader).await?
        }
    };

    let body: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = Json<CourseResponse>),
        (status = 404, description = "Course not found")
    )
)]
#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.get_by_id(id).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCoursePayload,
    responses(
        (status = 201, description = "Course created", body = Json<CourseResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateCoursePayload>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.create(payload).await?;
    state.course_cache.invalidate().await;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCoursePayload,
    responses(
        (status = 200, description = "Course updated", body = Json<CourseResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Course not found")
    )
)]
#[axum::debug_handler]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateCoursePayload>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.update(id, payload).await?;
    state.course_cache.invalidate().await;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    patch,
    path = "/api/courses/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Json<CourseResponse>),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Transition rejected")
    )
)]
#[axum::debug_handler]
pub async fn update_course_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateCourseStatusPayload>,
) -> Result<impl IntoResponse> {
    let course = state
        .course_service
        .update_status(id, payload.status)
        .await?;
    state.course_cache.invalidate().await;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Candidates still attached")
    )
)]
#[axum::debug_handler]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.course_service.delete(id).await?;
    state.course_cache.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}
