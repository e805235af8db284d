//! Page templates, compiled from `templates/` by askama.

use askama::Template;

use crate::controllers::{
    content::{SectionView, TocChapter},
    courses::Course,
    grades::GradeSheet,
    users::StudentGradeInfo,
};

#[derive(Template)]
#[template(path = "courses.html")]
pub struct CoursesTemplate<'a> {
    pub courses: &'a [Course],
    pub csrf: &'a str,
}

#[derive(Template)]
#[template(path = "accordion.html")]
pub struct AccordionTemplate<'a> {
    pub active_chapter: usize,
    pub toc: &'a [TocChapter],
    pub course_name: &'a str,
    pub course_id: &'a str,
    pub csrf: &'a str,
}

#[derive(Template)]
#[template(path = "courseware.html")]
pub struct CoursewareTemplate<'a> {
    pub csrf: &'a str,
    pub accordion: String,
    pub course_title: &'a str,
    pub course: &'a Course,
    pub init: &'a str,
    pub content: String,
}

#[derive(Template)]
#[template(path = "sequence.html")]
pub struct SequenceTemplate<'a> {
    pub section: &'a SectionView,
}

#[derive(Template)]
#[template(path = "info.html")]
pub struct InfoTemplate<'a> {
    pub csrf: &'a str,
    pub course: &'a Course,
    pub info_html: &'a str,
}

#[derive(Template)]
#[template(path = "gradebook.html")]
pub struct GradebookTemplate<'a> {
    pub students: &'a [StudentGradeInfo],
    pub columns: &'a [String],
    pub course: &'a Course,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub location: &'a str,
    pub language: &'a str,
    pub email: &'a str,
    pub course: &'a Course,
    pub csrf: &'a str,
    pub grade_sheet: &'a GradeSheet,
}
