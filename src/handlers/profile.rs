use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    common::{
        csrf::CsrfToken,
        error::{AppError, ErrorResponse},
        location::CourseKey,
        token::AuthHeader,
    },
    controllers::{self, grades},
    handlers::courseware::CoursePath,
    templates::{GradebookTemplate, ProfileTemplate},
    AppState,
};

#[derive(Deserialize)]
pub struct ProfilePath {
    pub org: String,
    pub course: String,
    pub run: String,
    pub student_id: Option<u32>,
}

fn page_not_found() -> AppError {
    AppError::not_found("Page not found")
}

#[utoipa::path(
    get,
    path = "/courses/{org}/{course}/{run}/gradebook",
    description = "Grades of the first students of the platform. Only members of the course_admin group see it, everyone else gets a 404.",
    params(
        ("org" = String, Path, description = "Course organisation"),
        ("course" = String, Path, description = "Course number"),
        ("run" = String, Path, description = "Course run"),
        ("Authorization" = String, Header, description = "JWT"),
    ),
    responses(
        (status = 200, description = "Gradebook page", body = String, content_type = "text/html"),
        (status = 404, description = "Not a course admin; course not found", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn gradebook(
    State(state): State<AppState>,
    auth: Option<AuthHeader>,
    Path(path): Path<CoursePath>,
) -> Result<Response, AppError> {
    let user_id = auth.map(|a| a.claims.id);
    if !controllers::groups::user_is_course_admin(&state, user_id).await? {
        return Err(page_not_found());
    }

    let key = path.course_key()?;
    let loaded = controllers::courses::load_course(&state, &key)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    let students = controllers::users::get_gradebook(&state, &loaded).await?;
    let columns = grades::graded_columns(&loaded.tree);
    let html = GradebookTemplate {
        students: &students,
        columns: &columns,
        course: &loaded.course,
    }
    .render()?;
    Ok(Html(html).into_response())
}

#[utoipa::path(
    get,
    path = "/courses/{org}/{course}/{run}/profile/{student_id}",
    description = "Profile and grades of the logged in user. Course admins may pass student_id to see another student.",
    params(
        ("org" = String, Path, description = "Course organisation"),
        ("course" = String, Path, description = "Course number"),
        ("run" = String, Path, description = "Course run"),
        ("student_id" = Option<u32>, Path, description = "Another student's id, admins only"),
        ("Authorization" = String, Header, description = "JWT"),
    ),
    responses(
        (status = 200, description = "Profile page", body = String, content_type = "text/html"),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Not a course admin; unknown student; course not found", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    csrf: CsrfToken,
    auth_header: AuthHeader,
    Path(path): Path<ProfilePath>,
) -> Result<Response, AppError> {
    let key = CourseKey::new(&path.org, &path.course, &path.run)
        .map_err(|_| AppError::not_found("Course not found"))?;

    let student_id = match path.student_id {
        None => auth_header.claims.id,
        Some(student_id) => {
            if !controllers::groups::user_is_course_admin(&state, Some(auth_header.claims.id)).await? {
                return Err(page_not_found());
            }
            student_id
        }
    };

    let student = controllers::users::get_user_info(&state, student_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let user_info = controllers::users::get_user_profile(&state, student.id)
        .await?
        .unwrap_or_default();

    let loaded = controllers::courses::load_course(&state, &key)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    let grade_sheet = grades::get_grade_sheet(
        &state,
        &loaded.key,
        &loaded.tree,
        &loaded.course.cutoffs(),
        student.id,
    )
    .await?;

    let html = ProfileTemplate {
        name: &user_info.name,
        username: &student.username,
        location: &user_info.location,
        language: &user_info.language,
        email: &student.email,
        course: &loaded.course,
        csrf: &csrf.token,
        grade_sheet: &grade_sheet,
    }
    .render()?;
    Ok((csrf.jar, Html(html)).into_response())
}
