use crate::controllers::users::{StudentRow, UserInfo, UserProfile};
use crate::AppState;

pub async fn fetch_user(state: &AppState, user_id: u32) -> anyhow::Result<Option<UserInfo>> {
    let user = sqlx::query_as::<_, UserInfo>("SELECT id, username, email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(user)
}

pub async fn fetch_profile(state: &AppState, user_id: u32) -> anyhow::Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT name, location, language FROM user_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?;
    Ok(profile)
}

pub async fn fetch_students(state: &AppState, limit: u32) -> anyhow::Result<Vec<StudentRow>> {
    let students = sqlx::query_as::<_, StudentRow>(
        "SELECT u.id, u.username, u.email, p.name AS realname
         FROM users u
         LEFT JOIN user_profiles p ON p.user_id = u.id
         ORDER BY u.id
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;
    Ok(students)
}
