use crate::{controllers::grades::StudentScore, AppState};

pub async fn fetch_student_scores(
    state: &AppState,
    student_id: u32,
    course_id: &str,
) -> anyhow::Result<Vec<StudentScore>> {
    let scores = sqlx::query_as::<_, StudentScore>(
        "SELECT module_location, grade, max_grade FROM student_modules
         WHERE student_id = ? AND course_id = ?",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(scores)
}
