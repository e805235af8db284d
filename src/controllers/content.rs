//! Navigation over a course's content tree.
//!
//! The tree is loaded whole from the module store (see `db::modulestore`)
//! and then walked in memory to build the table of contents, find sections
//! and resolve where a location sits inside its course.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::{
    location::Location,
    urls::{format_url_param, format_url_params},
};

pub const CHAPTER: &str = "chapter";
pub const PROBLEM: &str = "problem";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseItem {
    pub location: String,
    pub course_id: String,
    pub category: String,
    pub display_name: String,
    pub parent_location: Option<String>,
    pub position: i32,
    pub html: Option<String>,
    pub format: Option<String>,
    pub graded: bool,
    pub due: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
}

pub struct CourseTree {
    root: String,
    items: HashMap<String, CourseItem>,
    children: HashMap<String, Vec<String>>,
}

impl CourseTree {
    pub fn new(root: &Location, items: Vec<CourseItem>) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for item in &items {
            if let Some(parent) = &item.parent_location {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(item.location.clone());
            }
        }
        let items: HashMap<String, CourseItem> = items
            .into_iter()
            .map(|item| (item.location.clone(), item))
            .collect();
        for locations in children.values_mut() {
            locations.sort_by(|a, b| {
                let pa = items.get(a).map(|i| i.position).unwrap_or_default();
                let pb = items.get(b).map(|i| i.position).unwrap_or_default();
                pa.cmp(&pb).then_with(|| a.cmp(b))
            });
        }
        Self {
            root: root.to_string(),
            items,
            children,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn item(&self, location: &str) -> Option<&CourseItem> {
        self.items.get(location)
    }

    pub fn children<'a>(&'a self, location: &str) -> impl Iterator<Item = &'a CourseItem> + 'a {
        self.children
            .get(location)
            .into_iter()
            .flatten()
            .filter_map(|loc| self.items.get(loc))
    }

    pub fn chapters(&self) -> impl Iterator<Item = &CourseItem> + '_ {
        self.children(&self.root)
            .filter(|item| item.category == CHAPTER)
    }

    /// Depth-first, in position order, not including `location` itself.
    pub fn descendants(&self, location: &str) -> Vec<&CourseItem> {
        let mut out = Vec::new();
        let mut stack: Vec<&CourseItem> = self.children(location).collect();
        stack.reverse();
        while let Some(item) = stack.pop() {
            out.push(item);
            let mut kids: Vec<&CourseItem> = self.children(&item.location).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// The item's own html followed by the html of everything beneath it.
    pub fn rendered_html(&self, location: &str) -> String {
        let mut html = self
            .item(location)
            .and_then(|item| item.html.clone())
            .unwrap_or_default();
        for item in self.descendants(location) {
            if let Some(fragment) = &item.html {
                html.push_str(fragment);
            }
        }
        html
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TocSection {
    pub display_name: String,
    pub url_name: String,
    pub format: String,
    pub due: String,
    pub graded: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TocChapter {
    pub display_name: String,
    pub url_name: String,
    pub active: bool,
    pub sections: Vec<TocSection>,
}

pub fn format_due(due: Option<DateTime<Utc>>) -> String {
    due.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

pub fn toc_for_course(tree: &CourseTree, chapter: Option<&str>, section: Option<&str>) -> Vec<TocChapter> {
    tree.chapters()
        .map(|ch| {
            let chapter_active = chapter == Some(ch.display_name.as_str());
            let sections = tree
                .children(&ch.location)
                .map(|s| TocSection {
                    display_name: s.display_name.clone(),
                    url_name: format_url_param(&s.display_name),
                    format: s.format.clone().unwrap_or_default(),
                    due: format_due(s.due),
                    graded: s.graded,
                    active: chapter_active && section == Some(s.display_name.as_str()),
                })
                .collect();
            TocChapter {
                display_name: ch.display_name.clone(),
                url_name: format_url_param(&ch.display_name),
                active: chapter_active,
                sections,
            }
        })
        .collect()
}

/// Index of the last active chapter, 1 when none is active.
pub fn active_chapter(toc: &[TocChapter]) -> usize {
    let mut active = 1;
    for (i, chapter) in toc.iter().enumerate() {
        if chapter.active {
            active = i;
        }
    }
    active
}

pub fn get_section<'a>(tree: &'a CourseTree, chapter: &str, section: &str) -> Option<&'a CourseItem> {
    let chapter = tree.chapters().find(|ch| ch.display_name == chapter)?;
    tree.children(&chapter.location)
        .find(|s| s.display_name == section)
}

#[derive(Debug, Serialize)]
pub struct UnitView {
    pub display_name: String,
    pub html: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub display_name: String,
    pub position: usize,
    pub units: Vec<UnitView>,
}

/// Lays out a section's children as units, `position` (1-based) picking the
/// one shown first. Out-of-range positions are clamped.
pub fn section_view(tree: &CourseTree, section: &CourseItem, position: Option<usize>) -> SectionView {
    let children: Vec<&CourseItem> = tree.children(&section.location).collect();
    let position = position.unwrap_or(1).clamp(1, children.len().max(1));
    let units = children
        .iter()
        .enumerate()
        .map(|(i, unit)| UnitView {
            display_name: unit.display_name.clone(),
            html: tree.rendered_html(&unit.location),
            active: i + 1 == position,
        })
        .collect();
    SectionView {
        display_name: section.display_name.clone(),
        position,
        units,
    }
}

#[derive(Debug, PartialEq)]
pub enum PathError {
    ItemNotFound,
    NoPathToItem,
}

#[derive(Debug, PartialEq)]
pub struct CoursePath {
    pub course_id: String,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub position: Option<usize>,
}

impl CoursePath {
    /// The courseware page that shows this path.
    pub fn courseware_url(&self) -> String {
        let names: Vec<&str> = [self.chapter.as_deref(), self.section.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let mut url = format!("/courses/{}/courseware", self.course_id);
        for segment in format_url_params(&names) {
            url.push('/');
            url.push_str(&segment);
        }
        if let (Some(_), Some(position)) = (&self.section, self.position) {
            url.push_str(&format!("/{}", position));
        }
        url
    }
}

/// Works out which chapter, section and position within the section a
/// location is displayed at.
pub fn path_to_location(tree: &CourseTree, location: &str) -> Result<CoursePath, PathError> {
    let item = tree.item(location).ok_or(PathError::ItemNotFound)?;

    // Walk parents up to the course root
    let mut chain = vec![item];
    let mut current = item;
    while current.location != tree.root() {
        let parent = current
            .parent_location
            .as_deref()
            .and_then(|p| tree.item(p))
            .ok_or(PathError::NoPathToItem)?;
        if chain.iter().any(|seen| seen.location == parent.location) {
            return Err(PathError::NoPathToItem);
        }
        chain.push(parent);
        current = parent;
    }
    chain.reverse();

    let chapter = chain.get(1).copied();
    if chapter.is_some_and(|ch| ch.category != CHAPTER) {
        return Err(PathError::NoPathToItem);
    }
    let section = chain.get(2).copied();
    let position = match (section, chain.get(3)) {
        (Some(section), Some(unit)) => tree
            .children(&section.location)
            .position(|child| child.location == unit.location)
            .map(|i| i + 1),
        _ => None,
    };

    Ok(CoursePath {
        course_id: item.course_id.clone(),
        chapter: chapter.map(|ch| ch.display_name.clone()),
        section: section.map(|s| s.display_name.clone()),
        position,
    })
}
