pub mod courseware;
pub mod profile;
pub mod schedules;
