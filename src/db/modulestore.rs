//! Reads course content out of the `courses` and `course_items` tables.

use crate::{
    controllers::{content::CourseItem, courses::Course},
    AppState,
};

const COURSE_COLUMNS: &str = "id, title, info_html, self_paced, start, grade_cutoffs";
const ITEM_COLUMNS: &str = "location, course_id, category, display_name, parent_location, position, html, format, graded, due, max_score";

pub async fn fetch_all_courses(state: &AppState) -> anyhow::Result<Vec<Course>> {
    let query = format!("SELECT {} FROM courses ORDER BY id", COURSE_COLUMNS);
    let courses = sqlx::query_as::<_, Course>(&query)
        .fetch_all(&state.pool)
        .await?;
    Ok(courses)
}

pub async fn fetch_course(state: &AppState, course_id: &str) -> anyhow::Result<Option<Course>> {
    let query = format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS);
    let course = sqlx::query_as::<_, Course>(&query)
        .bind(course_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(course)
}

pub async fn fetch_course_items(state: &AppState, course_id: &str) -> anyhow::Result<Vec<CourseItem>> {
    let query = format!("SELECT {} FROM course_items WHERE course_id = ?", ITEM_COLUMNS);
    let items = sqlx::query_as::<_, CourseItem>(&query)
        .bind(course_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(items)
}

pub async fn fetch_item(state: &AppState, location: &str) -> anyhow::Result<Option<CourseItem>> {
    let query = format!("SELECT {} FROM course_items WHERE location = ?", ITEM_COLUMNS);
    let item = sqlx::query_as::<_, CourseItem>(&query)
        .bind(location)
        .fetch_optional(&state.pool)
        .await?;
    Ok(item)
}
