use crate::AppState;

pub async fn fetch_group_names(state: &AppState, user_id: u32) -> anyhow::Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT g.name FROM user_test_groups g
         JOIN user_test_group_users gu ON gu.group_id = g.id
         WHERE gu.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(names)
}
