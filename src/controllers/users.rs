use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    controllers::{courses::LoadedCourse, grades::{self, GradeSheet}},
    db, AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserInfo {
    pub id: u32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserProfile {
    pub name: String,
    pub location: String,
    pub language: String,
}

/// A gradebook row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentRow {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub realname: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentGradeInfo {
    pub username: String,
    pub id: u32,
    pub email: String,
    pub realname: String,
    pub grade_info: GradeSheet,
}

pub async fn get_user_info(state: &AppState, user_id: u32) -> anyhow::Result<Option<UserInfo>> {
    db::userdb::fetch_user(state, user_id).await
}

pub async fn get_user_profile(state: &AppState, user_id: u32) -> anyhow::Result<Option<UserProfile>> {
    db::userdb::fetch_profile(state, user_id).await
}

pub async fn get_gradebook(state: &AppState, course: &LoadedCourse) -> anyhow::Result<Vec<StudentGradeInfo>> {
    let students = db::userdb::fetch_students(state, state.config.gradebook_max_students).await?;
    let cutoffs = course.course.cutoffs();

    let mut student_info = Vec::with_capacity(students.len());
    for student in students {
        let grade_info =
            grades::get_grade_sheet(state, &course.key, &course.tree, &cutoffs, student.id).await?;
        student_info.push(StudentGradeInfo {
            username: student.username,
            id: student.id,
            email: student.email,
            realname: student.realname.unwrap_or_default(),
            grade_info,
        });
    }
    Ok(student_info)
}
