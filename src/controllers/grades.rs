use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::{location::CourseKey, urls::format_url_param},
    controllers::content::{format_due, CourseTree, PROBLEM},
    db, AppState,
};

pub type GradeCutoffs = BTreeMap<String, f64>;

pub fn default_cutoffs() -> GradeCutoffs {
    BTreeMap::from([("Pass".to_string(), 0.5)])
}

/// A student's recorded result for one problem.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentScore {
    pub module_location: String,
    pub grade: Option<f64>,
    pub max_grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SectionGrade {
    pub display_name: String,
    pub url_name: String,
    pub format: String,
    pub due: String,
    pub graded: bool,
    pub earned: f64,
    pub possible: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChapterGrade {
    pub display_name: String,
    pub url_name: String,
    pub sections: Vec<SectionGrade>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GradeSummary {
    pub earned: f64,
    pub possible: f64,
    pub percent: f64,
    pub grade: Option<String>,
}

impl GradeSummary {
    pub fn letter(&self) -> &str {
        self.grade.as_deref().unwrap_or("")
    }

    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.percent * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GradeSheet {
    pub courseware_summary: Vec<ChapterGrade>,
    pub grade_summary: GradeSummary,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The letter of the highest cutoff reached by `percent`.
pub fn letter_grade(cutoffs: &GradeCutoffs, percent: f64) -> Option<String> {
    cutoffs
        .iter()
        .filter(|(_, threshold)| percent >= **threshold)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(letter, _)| letter.clone())
}

pub fn grade_sheet(tree: &CourseTree, scores: &[StudentScore], cutoffs: &GradeCutoffs) -> GradeSheet {
    let scores: HashMap<&str, &StudentScore> = scores
        .iter()
        .map(|s| (s.module_location.as_str(), s))
        .collect();

    let mut total_earned = 0.0;
    let mut total_possible = 0.0;
    let mut courseware_summary = Vec::new();

    for chapter in tree.chapters() {
        let mut sections = Vec::new();
        for section in tree.children(&chapter.location) {
            let mut earned = 0.0;
            let mut possible = 0.0;
            for problem in tree
                .descendants(&section.location)
                .into_iter()
                .filter(|item| item.category == PROBLEM)
            {
                let score = scores.get(problem.location.as_str());
                earned += score.and_then(|s| s.grade).unwrap_or(0.0);
                possible += score
                    .and_then(|s| s.max_grade)
                    .or(problem.max_score)
                    .unwrap_or(0.0);
            }
            if section.graded {
                total_earned += earned;
                total_possible += possible;
            }
            sections.push(SectionGrade {
                display_name: section.display_name.clone(),
                url_name: format_url_param(&section.display_name),
                format: section.format.clone().unwrap_or_default(),
                due: format_due(section.due),
                graded: section.graded,
                earned,
                possible,
            });
        }
        courseware_summary.push(ChapterGrade {
            display_name: chapter.display_name.clone(),
            url_name: format_url_param(&chapter.display_name),
            sections,
        });
    }

    let percent = if total_possible > 0.0 {
        round2(total_earned / total_possible)
    } else {
        0.0
    };

    GradeSheet {
        courseware_summary,
        grade_summary: GradeSummary {
            earned: total_earned,
            possible: total_possible,
            percent,
            grade: letter_grade(cutoffs, percent),
        },
    }
}

/// Names of the graded sections, in the order a grade sheet lists them.
pub fn graded_columns(tree: &CourseTree) -> Vec<String> {
    tree.chapters()
        .flat_map(|chapter| tree.children(&chapter.location))
        .filter(|section| section.graded)
        .map(|section| section.display_name.clone())
        .collect()
}

pub async fn get_grade_sheet(
    state: &AppState,
    course_key: &CourseKey,
    tree: &CourseTree,
    cutoffs: &GradeCutoffs,
    student_id: u32,
) -> anyhow::Result<GradeSheet> {
    let scores = db::gradedb::fetch_student_scores(state, student_id, &course_key.id()).await?;
    Ok(grade_sheet(tree, &scores, cutoffs))
}
