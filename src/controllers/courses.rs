use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::location::CourseKey,
    controllers::{
        content::{CourseItem, CourseTree},
        grades::{default_cutoffs, GradeCutoffs},
    },
    db, AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub info_html: Option<String>,
    pub self_paced: bool,
    pub start: Option<DateTime<Utc>>,
    pub grade_cutoffs: Option<String>,
}

impl Course {
    /// Cutoffs are stored as a JSON object like `{"A": 0.9, "B": 0.8}`.
    pub fn cutoffs(&self) -> GradeCutoffs {
        match self.grade_cutoffs.as_deref().map(serde_json::from_str::<GradeCutoffs>) {
            Some(Ok(cutoffs)) if !cutoffs.is_empty() => cutoffs,
            Some(Err(why)) => {
                tracing::warn!("Course {} has malformed grade cutoffs: {}", self.id, why);
                default_cutoffs()
            }
            _ => default_cutoffs(),
        }
    }
}

/// A course together with its whole content tree.
pub struct LoadedCourse {
    pub key: CourseKey,
    pub course: Course,
    pub tree: CourseTree,
}

pub async fn get_all_courses(state: &AppState) -> anyhow::Result<Vec<Course>> {
    let courses = db::modulestore::fetch_all_courses(state).await?;
    Ok(courses)
}

pub async fn get_course(state: &AppState, key: &CourseKey) -> anyhow::Result<Option<Course>> {
    db::modulestore::fetch_course(state, &key.id()).await
}

pub async fn get_item(state: &AppState, location: &str) -> anyhow::Result<Option<CourseItem>> {
    db::modulestore::fetch_item(state, location).await
}

pub async fn load_course(state: &AppState, key: &CourseKey) -> anyhow::Result<Option<LoadedCourse>> {
    let Some(course) = db::modulestore::fetch_course(state, &key.id()).await? else {
        return Ok(None);
    };
    let items = db::modulestore::fetch_course_items(state, &course.id).await?;
    let tree = CourseTree::new(&key.to_location(), items);
    Ok(Some(LoadedCourse {
        key: key.clone(),
        course,
        tree,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(cutoffs: Option<&str>) -> Course {
        Course {
            id: "MITx/6.002x/2012_Fall".to_string(),
            title: "Circuits".to_string(),
            info_html: None,
            self_paced: false,
            start: None,
            grade_cutoffs: cutoffs.map(str::to_string),
        }
    }

    #[test]
    fn test_cutoffs() {
        let cutoffs = course(Some(r#"{"A": 0.9, "B": 0.75}"#)).cutoffs();
        assert_eq!(cutoffs.get("A"), Some(&0.9));
        assert_eq!(cutoffs.len(), 2);

        assert_eq!(course(None).cutoffs(), default_cutoffs());
        assert_eq!(course(Some("not json")).cutoffs(), default_cutoffs());
        assert_eq!(course(Some("{}")).cutoffs(), default_cutoffs());
    }
}
