use chrono::Utc;

use crate::{common::{location::CourseKey, logging::PrefixedLogger}, db, AppState};

/// What a self-paced schedule's start date is moved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetTo {
    /// The moment of the reset.
    Now,
    /// When the learner first got access to course material: the later of
    /// their enrollment date and the course start.
    AvailabilityDate,
}

impl From<bool> for ResetTo {
    fn from(use_availability_date: bool) -> Self {
        if use_availability_date {
            Self::AvailabilityDate
        } else {
            Self::Now
        }
    }
}

/// Moves self-paced schedules, logging under its own name.
pub struct ScheduleResetter {
    log: PrefixedLogger,
}

impl Default for ScheduleResetter {
    fn default() -> Self {
        Self {
            log: PrefixedLogger::for_type::<Self>(),
        }
    }
}

impl ScheduleResetter {
    /// Resets the user's schedule for a self-paced course, e.g. when they ask
    /// for it or their enrollment mode changes. Existing schedules only, none
    /// are created. Returns how many schedules were updated.
    pub async fn reset_self_paced_schedule(
        &self,
        state: &AppState,
        user_id: u32,
        course_key: &CourseKey,
        reset_to: ResetTo,
    ) -> anyhow::Result<u64> {
        let course_id = course_key.id();

        let updated = match reset_to {
            ResetTo::Now => {
                db::scheduledb::reset_start_date(state, user_id, &course_id, Utc::now()).await?
            }
            ResetTo::AvailabilityDate => {
                db::scheduledb::reset_start_date_to_availability(state, user_id, &course_id)
                    .await?
            }
        };

        if updated == 0 {
            self.log.debug(format_args!(
                "no self-paced schedule for user {} in {}",
                user_id, course_id
            ));
        } else {
            self.log.info(format_args!(
                "reset {} schedule(s) for user {} in {} to {:?}",
                updated, user_id, course_id, reset_to
            ));
        }
        Ok(updated)
    }
}
