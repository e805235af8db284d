use chrono::{DateTime, Utc};

use crate::AppState;

// Both updates join through the enrollment instead of selecting from it in a
// subquery: MySQL refuses a subquery on a table the same UPDATE writes to.

pub async fn reset_start_date(
    state: &AppState,
    user_id: u32,
    course_id: &str,
    start_date: DateTime<Utc>,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        "UPDATE schedules s
         JOIN course_enrollments e ON s.enrollment_id = e.id
         JOIN courses c ON e.course_id = c.id
         SET s.start_date = ?
         WHERE e.user_id = ? AND e.course_id = ? AND c.self_paced = TRUE",
    )
    .bind(start_date)
    .bind(user_id)
    .bind(course_id)
    .execute(&state.pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn reset_start_date_to_availability(
    state: &AppState,
    user_id: u32,
    course_id: &str,
) -> anyhow::Result<u64> {
    // Deliberately not a bare GREATEST(e.created, c.start): MySQL returns NULL
    // for that when the course has no start, this keeps the enrollment date
    let result = sqlx::query(
        "UPDATE schedules s
         JOIN course_enrollments e ON s.enrollment_id = e.id
         JOIN courses c ON e.course_id = c.id
         SET s.start_date = GREATEST(e.created, COALESCE(c.start, e.created))
         WHERE e.user_id = ? AND e.course_id = ? AND c.self_paced = TRUE",
    )
    .bind(user_id)
    .bind(course_id)
    .execute(&state.pool)
    .await?;
    Ok(result.rows_affected())
}
