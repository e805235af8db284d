//! Addresses of course content.
//!
//! Every piece of content lives at a [`Location`] such as
//! `i4x://MITx/6.002x/problem/Sample_Problem`, and a course is named by a
//! [`CourseKey`] of the form `org/course/run`.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<tag>[A-Za-z0-9]+)://?(?P<org>[^/@]+)/(?P<course>[^/@]+)/(?P<category>[^/@]+)/(?P<name>[^/@]+)(?:@(?P<revision>[^/@]+))?/?$",
    )
    .unwrap()
});

static KEY_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.~\-]+$").unwrap());

#[derive(Debug, PartialEq)]
pub struct InvalidLocation(pub String);

impl Display for InvalidLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid location: {}", self.0)
    }
}

impl std::error::Error for InvalidLocation {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub tag: String,
    pub org: String,
    pub course: String,
    pub category: String,
    pub name: String,
    pub revision: Option<String>,
}

impl Location {
    pub fn parse(value: &str) -> Result<Self, InvalidLocation> {
        let caps = LOCATION_RE
            .captures(value.trim())
            .ok_or_else(|| InvalidLocation(value.to_owned()))?;
        Ok(Self {
            tag: caps["tag"].to_owned(),
            org: caps["org"].to_owned(),
            course: caps["course"].to_owned(),
            category: caps["category"].to_owned(),
            name: caps["name"].to_owned(),
            revision: caps.name("revision").map(|m| m.as_str().to_owned()),
        })
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}/{}",
            self.tag, self.org, self.course, self.category, self.name
        )?;
        if let Some(revision) = &self.revision {
            write!(f, "@{}", revision)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    pub org: String,
    pub course: String,
    pub run: String,
}

impl CourseKey {
    pub fn new(org: &str, course: &str, run: &str) -> Result<Self, InvalidLocation> {
        if [org, course, run].iter().all(|part| KEY_PART_RE.is_match(part)) {
            Ok(Self {
                org: org.to_owned(),
                course: course.to_owned(),
                run: run.to_owned(),
            })
        } else {
            Err(InvalidLocation(format!("{}/{}/{}", org, course, run)))
        }
    }

    /// Parses the `org/course/run` form stored alongside content rows.
    pub fn parse(course_id: &str) -> Result<Self, InvalidLocation> {
        let mut parts = course_id.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(org), Some(course), Some(run), None) => Self::new(org, course, run),
            _ => Err(InvalidLocation(course_id.to_owned())),
        }
    }

    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.org, self.course, self.run)
    }

    /// The location of the course's root content item.
    pub fn to_location(&self) -> Location {
        Location {
            tag: "i4x".to_owned(),
            org: self.org.clone(),
            course: self.course.clone(),
            category: "course".to_owned(),
            name: self.run.clone(),
            revision: None,
        }
    }
}

impl Display for CourseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
