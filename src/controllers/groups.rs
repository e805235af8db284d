use redis::Commands;

use crate::{db, AppState};

pub const COURSE_ADMIN_GROUP: &str = "course_admin";

// One hour
const GROUP_CACHE_EXPIRATION: u64 = 60 * 60;

pub fn group_cache_key(user_id: u32) -> String {
    format!("user_group_names_{}", user_id)
}

/// Names of the test groups a user belongs to, memoized in redis for an hour.
/// Anonymous users belong to no group.
pub async fn user_groups(state: &AppState, user_id: Option<u32>) -> anyhow::Result<Vec<String>> {
    let Some(user_id) = user_id else {
        return Ok(Vec::new());
    };
    let cache_key = group_cache_key(user_id);

    if let Some(Ok(mut conn)) = state.redis.as_ref().map(|pool| pool.get()) {
        if let Ok(val) = conn.get::<&str, String>(&cache_key) {
            if let Ok(names) = serde_json::from_str::<Vec<String>>(&val) {
                return Ok(names);
            }
        }
    }

    let names = db::groupdb::fetch_group_names(state, user_id).await?;

    if let Some(Ok(mut conn)) = state.redis.as_ref().map(|pool| pool.get()) {
        let names_str = serde_json::to_string(&names)?;
        // A failed cache write only costs a query next time
        let _: redis::RedisResult<()> = conn.set_ex(&cache_key, names_str, GROUP_CACHE_EXPIRATION);
    }
    Ok(names)
}

pub fn is_course_admin(groups: &[String]) -> bool {
    groups.iter().any(|group| group == COURSE_ADMIN_GROUP)
}

pub async fn user_is_course_admin(state: &AppState, user_id: Option<u32>) -> anyhow::Result<bool> {
    let groups = user_groups(state, user_id).await?;
    Ok(is_course_admin(&groups))
}
