#[cfg(test)]
pub mod fixtures;
pub mod gradedb;
pub mod groupdb;
pub mod modulestore;
pub mod scheduledb;
pub mod userdb;
