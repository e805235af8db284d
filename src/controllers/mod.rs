pub mod content;
pub mod courses;
pub mod grades;
pub mod groups;
pub mod schedules;
pub mod users;
