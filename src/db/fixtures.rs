//! Rows for tests that run against a migrated database.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::MySqlPool;

use crate::controllers::content::{fixtures::sample_items, CourseItem};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn insert_user(pool: &MySqlPool, id: u32, username: &str) {
    sqlx::query("INSERT INTO users (id, username, email) VALUES (?, ?, ?)")
        .bind(id)
        .bind(username)
        .bind(format!("{}@example.com", username))
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_profile(pool: &MySqlPool, user_id: u32, name: &str) {
    sqlx::query("INSERT INTO user_profiles (user_id, name, location, language) VALUES (?, ?, 'Boston', 'English')")
        .bind(user_id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn add_to_group(pool: &MySqlPool, user_id: u32, group: &str) {
    sqlx::query("INSERT IGNORE INTO user_test_groups (name) VALUES (?)")
        .bind(group)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO user_test_group_users (group_id, user_id)
         SELECT id, ? FROM user_test_groups WHERE name = ?",
    )
    .bind(user_id)
    .bind(group)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_course(
    pool: &MySqlPool,
    course_id: &str,
    self_paced: bool,
    start: Option<DateTime<Utc>>,
) {
    sqlx::query(
        "INSERT INTO courses (id, title, info_html, self_paced, start, grade_cutoffs)
         VALUES (?, 'Circuits and Electronics', '<p>Welcome to 6.002x</p>', ?, ?, NULL)",
    )
    .bind(course_id)
    .bind(self_paced)
    .bind(start)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_items(pool: &MySqlPool, items: &[CourseItem]) {
    for item in items {
        sqlx::query(
            "INSERT INTO course_items
             (location, course_id, category, display_name, parent_location, position, html, format, graded, due, max_score)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.location)
        .bind(&item.course_id)
        .bind(&item.category)
        .bind(&item.display_name)
        .bind(&item.parent_location)
        .bind(item.position)
        .bind(&item.html)
        .bind(&item.format)
        .bind(item.graded)
        .bind(item.due)
        .bind(item.max_score)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// The sample course with its whole content tree.
pub async fn insert_sample_course(pool: &MySqlPool, course_id: &str) {
    insert_course(pool, course_id, false, None).await;
    insert_items(pool, &sample_items()).await;
}

pub async fn insert_score(pool: &MySqlPool, student_id: u32, course_id: &str, location: &str, grade: f64) {
    sqlx::query(
        "INSERT INTO student_modules (student_id, course_id, module_location, grade, max_grade)
         VALUES (?, ?, ?, ?, NULL)",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(location)
    .bind(grade)
    .execute(pool)
    .await
    .unwrap();
}

/// Returns the enrollment id.
pub async fn enroll(pool: &MySqlPool, user_id: u32, course_id: &str, created: DateTime<Utc>) -> u64 {
    sqlx::query("INSERT INTO course_enrollments (user_id, course_id, created) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(course_id)
        .bind(created)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_id()
}

pub async fn insert_schedule(pool: &MySqlPool, enrollment_id: u64, start_date: DateTime<Utc>) {
    sqlx::query("INSERT INTO schedules (enrollment_id, start_date) VALUES (?, ?)")
        .bind(enrollment_id)
        .bind(start_date)
        .execute(pool)
        .await
        .unwrap();
}

/// `None` when the enrollment has no schedule row.
pub async fn schedule_start(pool: &MySqlPool, enrollment_id: u64) -> Option<DateTime<Utc>> {
    sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
        "SELECT start_date FROM schedules WHERE enrollment_id = ?",
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
    .unwrap()
    .flatten()
}

pub async fn count_schedules(pool: &MySqlPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schedules")
        .fetch_one(pool)
        .await
        .unwrap()
}
