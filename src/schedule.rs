use crate::models::{AppData, DayPeriod, Schedule, ScheduleStatus, ScheduleView};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("schedule {0} not found")]
    NotFound(u64),
    #[error("schedule {id} is already {status}")]
    AlreadyResolved { id: u64, status: ScheduleStatus },
    #[error("a schedule cannot be moved back to pending")]
    InvalidTarget,
}

/// Resolves a pending schedule to completed or missed. The transition
/// clears the schedule's active alert and touches no other field; a
/// schedule that already reached a terminal status is left alone.
pub fn apply_status(
    data: &mut AppData,
    id: u64,
    status: ScheduleStatus,
    reason: Option<String>,
) -> Result<(), TransitionError> {
    if status == ScheduleStatus::Pending {
        return Err(TransitionError::InvalidTarget);
    }

    let schedule = data
        .schedules
        .iter_mut()
        .find(|schedule| schedule.id == id)
        .ok_or(TransitionError::NotFound(id))?;

    if schedule.status != ScheduleStatus::Pending {
        return Err(TransitionError::AlreadyResolved {
            id,
            status: schedule.status,
        });
    }

    schedule.status = status;
    if status == ScheduleStatus::Missed {
        schedule.missed_reason = reason.filter(|reason| !reason.trim().is_empty());
    }
    data.active_alerts.remove(&id);
    Ok(())
}

/// Removes a schedule and its active alert. Returns false when the id is
/// unknown, leaving the list untouched.
pub fn remove_schedule(data: &mut AppData, id: u64) -> bool {
    let before = data.schedules.len();
    data.schedules.retain(|schedule| schedule.id != id);
    if data.schedules.len() == before {
        return false;
    }
    data.active_alerts.remove(&id);
    true
}

/// Manual alert trigger: marks the first pending, not-yet-alerted schedule
/// as alerted and adds it to the active set. There is no timer anywhere;
/// this is the only way an alert comes into existence.
pub fn trigger_next_alert(data: &mut AppData) -> Option<u64> {
    let schedule = data
        .schedules
        .iter_mut()
        .find(|schedule| schedule.status == ScheduleStatus::Pending && !schedule.alerted)?;
    schedule.alerted = true;
    let id = schedule.id;
    data.active_alerts.insert(id);
    Some(id)
}

/// Medication names are looked up by id when building responses; a
/// deleted medication leaves its schedules behind (no cascade), so the
/// lookup falls back to a placeholder.
pub fn medication_name(data: &AppData, medication_id: u64) -> String {
    data.medications
        .iter()
        .find(|medication| medication.id == medication_id)
        .map(|medication| medication.name.clone())
        .unwrap_or_else(|| "(removed)".to_string())
}

pub fn classify_time(time: &str) -> DayPeriod {
    let hour = time
        .split(':')
        .next()
        .and_then(|hour| hour.parse::<u32>().ok());
    match hour {
        Some(hour) if (5..12).contains(&hour) => DayPeriod::Morning,
        Some(hour) if (12..18).contains(&hour) => DayPeriod::Afternoon,
        _ => DayPeriod::Night,
    }
}

pub fn schedule_view(data: &AppData, schedule: &Schedule) -> ScheduleView {
    ScheduleView {
        id: schedule.id,
        medication_id: schedule.medication_id,
        medication_name: medication_name(data, schedule.medication_id),
        date: schedule.date,
        time: schedule.time.clone(),
        status: schedule.status,
        alerted: schedule.alerted,
        alert_active: data.active_alerts.contains(&schedule.id),
        period: classify_time(&schedule.time),
    }
}

/// Entries for one date, or all of them when no date is given.
pub fn views_for_date(data: &AppData, date: Option<NaiveDate>) -> Vec<ScheduleView> {
    data.schedules
        .iter()
        .filter(|schedule| date.is_none_or(|date| schedule.date == date))
        .map(|schedule| schedule_view(data, schedule))
        .collect()
}

pub fn alert_views(data: &AppData) -> Vec<ScheduleView> {
    data.schedules
        .iter()
        .filter(|schedule| data.active_alerts.contains(&schedule.id))
        .map(|schedule| schedule_view(data, schedule))
        .collect()
}
