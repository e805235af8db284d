use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_LOCATION, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    common::{
        csrf::CsrfToken,
        error::{AppError, ErrorResponse},
        location::{CourseKey, Location},
        urls,
    },
    controllers::{
        self,
        content::{self, PathError},
        courses::LoadedCourse,
    },
    templates::{AccordionTemplate, CoursesTemplate, CoursewareTemplate, InfoTemplate, SequenceTemplate},
    AppState,
};

#[derive(Deserialize)]
pub struct CoursePath {
    pub org: String,
    pub course: String,
    pub run: String,
}

impl CoursePath {
    /// Malformed course ids are reported the same way as unknown courses.
    pub fn course_key(&self) -> Result<CourseKey, AppError> {
        CourseKey::new(&self.org, &self.course, &self.run)
            .map_err(|_| AppError::not_found("Course not found"))
    }
}

#[derive(Deserialize)]
pub struct CoursewarePath {
    pub org: String,
    pub course: String,
    pub run: String,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub position: Option<String>,
}

#[utoipa::path(
    get,
    path = "/courses",
    description = "Lists every course. Sets the CSRF cookie if the client has none.",
    responses(
        (status = 200, description = "Courses page", body = String, content_type = "text/html"),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn courses(State(state): State<AppState>, csrf: CsrfToken) -> Result<Response, AppError> {
    let courses = controllers::courses::get_all_courses(&state).await?;
    let html = CoursesTemplate {
        courses: &courses,
        csrf: &csrf.token,
    }
    .render()?;
    Ok((csrf.jar, Html(html)).into_response())
}

/// Draws the navigation accordion for the given position in the course.
fn render_accordion(
    loaded: &LoadedCourse,
    chapter: Option<&str>,
    section: Option<&str>,
    csrf: &str,
) -> Result<String, AppError> {
    let toc = content::toc_for_course(&loaded.tree, chapter, section);
    let course_id = loaded.key.id();
    let html = AccordionTemplate {
        active_chapter: content::active_chapter(&toc),
        toc: &toc,
        course_name: &loaded.course.title,
        course_id: &course_id,
        csrf,
    }
    .render()?;
    Ok(html)
}

fn render_courseware(
    loaded: &LoadedCourse,
    chapter: Option<&str>,
    section: Option<&str>,
    position: Option<usize>,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    let accordion = render_accordion(loaded, chapter, section, &csrf.token)?;

    // Only a full chapter/section pair points at a module to show
    let mut module_html = String::new();
    if let (Some(chapter), Some(section)) = (chapter, section) {
        let item = content::get_section(&loaded.tree, chapter, section).ok_or_else(|| {
            AppError::not_found(format!("No section {} in chapter {}", section, chapter))
        })?;
        let view = content::section_view(&loaded.tree, item, position);
        module_html = SequenceTemplate { section: &view }.render()?;
    }

    let html = CoursewareTemplate {
        csrf: &csrf.token,
        accordion,
        course_title: &loaded.course.title,
        course: &loaded.course,
        init: "",
        content: module_html,
    }
    .render()?;
    Ok((csrf.jar, Html(html)).into_response())
}

#[utoipa::path(
    get,
    path = "/courses/{org}/{course}/{run}/courseware/{chapter}/{section}/{position}",
    description = "Courseware page: the accordion plus, when chapter and section are both given, the section's content. \
        The page is the same for every visitor. Chapter and section use '_' in place of spaces; the trailing segments are optional.",
    params(
        ("org" = String, Path, description = "Course organisation"),
        ("course" = String, Path, description = "Course number"),
        ("run" = String, Path, description = "Course run"),
        ("chapter" = Option<String>, Path, description = "Chapter display name"),
        ("section" = Option<String>, Path, description = "Section display name"),
        ("position" = Option<usize>, Path, description = "1-based unit inside the section"),
    ),
    responses(
        (status = 200, description = "Courseware page", body = String, content_type = "text/html"),
        (status = 404, description = "Unknown course; unknown section", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn index(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Path(path): Path<CoursewarePath>,
) -> Result<Response, AppError> {
    let key = CoursePath {
        org: path.org,
        course: path.course,
        run: path.run,
    }
    .course_key()?;
    let chapter = urls::clean(path.chapter.as_deref());
    let section = urls::clean(path.section.as_deref());
    let position = path.position.as_deref().and_then(|p| p.parse::<usize>().ok());

    tracing::debug!(course_id = %key, "Rendering courseware");

    let loaded = controllers::courses::load_course(&state, &key)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    render_courseware(&loaded, chapter.as_deref(), section.as_deref(), position, csrf)
}

#[utoipa::path(
    get,
    path = "/jump_to/{location}",
    description = "Shows the courseware page that contains a location such as i4x://org/course/problem/name. \
        Content-Location carries that page's own URL.",
    params(
        ("location" = String, Path, description = "Content location"),
    ),
    responses(
        (status = 200, description = "Courseware page", body = String, content_type = "text/html"),
        (status = 404, description = "Invalid location; no data at this location; location is not in any class", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn jump_to(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Path(location): Path<String>,
) -> Result<Response, AppError> {
    let location = Location::parse(&location).map_err(|_| AppError::not_found("Invalid location"))?;
    let location = location.to_string();

    let not_in_class = || AppError::not_found(format!("This location is not in any class: {}", location));
    let no_data = || AppError::not_found(format!("No data at this location: {}", location));

    let item = controllers::courses::get_item(&state, &location)
        .await?
        .ok_or_else(no_data)?;
    let key = CourseKey::parse(&item.course_id).map_err(|_| not_in_class())?;
    let loaded = controllers::courses::load_course(&state, &key)
        .await?
        .ok_or_else(not_in_class)?;

    let path = content::path_to_location(&loaded.tree, &location).map_err(|why| match why {
        PathError::ItemNotFound => no_data(),
        PathError::NoPathToItem => not_in_class(),
    })?;

    let mut response = render_courseware(
        &loaded,
        path.chapter.as_deref(),
        path.section.as_deref(),
        path.position,
        csrf,
    )?;
    if let Ok(url) = HeaderValue::from_str(&path.courseware_url()) {
        response.headers_mut().insert(CONTENT_LOCATION, url);
    }
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/courses/{org}/{course}/{run}/info",
    description = "The course's info page",
    params(
        ("org" = String, Path, description = "Course organisation"),
        ("course" = String, Path, description = "Course number"),
        ("run" = String, Path, description = "Course run"),
    ),
    responses(
        (status = 200, description = "Course info page", body = String, content_type = "text/html"),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn course_info(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Path(path): Path<CoursePath>,
) -> Result<Response, AppError> {
    let key = path.course_key()?;
    let course = controllers::courses::get_course(&state, &key)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    let html = InfoTemplate {
        csrf: &csrf.token,
        course: &course,
        info_html: course.info_html.as_deref().unwrap_or_default(),
    }
    .render()?;
    Ok((csrf.jar, Html(html)).into_response())
}
