//! Event store service
//!
//! Owns published event semantics: creation always lands at `planned`,
//! request-driven sync overwrites the field snapshot, calendar listings
//! exclude canceled events and use a full range-overlap window, and
//! removal cascades dependents before the event row.

use chrono::{NaiveDate, NaiveTime};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::department::Department;
use crate::models::event::{CreateEventData, Event, EventFields};
use crate::services::conflict;
use crate::services::department::DepartmentService;
use crate::utils::errors::Result;

/// A published event annotated with its resolved departments, primary
/// first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithDepartments {
    #[serde(flatten)]
    pub event: Event,
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    departments: DepartmentService,
}

impl EventService {
    pub fn new(db: DatabaseService, departments: DepartmentService) -> Self {
        Self { db, departments }
    }

    /// Create a published event (status forced to `planned`)
    pub async fn create(&self, data: &CreateEventData) -> Result<Event> {
        let event = self.db.events.create(data).await?;
        info!(event_id = event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// Overwrite an existing event with a request's field snapshot
    pub async fn update_from_request(&self, event_id: i64, fields: &EventFields) -> Result<Event> {
        let mut tx = self.db.begin().await?;
        let event = self
            .db
            .events
            .update_from_request_with(&mut *tx, event_id, fields)
            .await?;
        tx.commit().await?;
        info!(event_id = event_id, "Event synced from request");
        Ok(event)
    }

    /// List non-canceled events, optionally inside a date window, with
    /// departments resolved
    pub async fn find_all(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<EventWithDepartments>> {
        let events = self.db.events.find_all(start_date, end_date).await?;
        let resolutions = try_join_all(events.iter().map(|event| {
            self.departments
                .resolve(event.department_id, event.department_ids.as_deref())
        }))
        .await?;

        Ok(events
            .into_iter()
            .zip(resolutions)
            .map(|(event, departments)| EventWithDepartments { event, departments })
            .collect())
    }

    /// Get one event with departments resolved
    pub async fn find_one(&self, id: i64) -> Result<Option<EventWithDepartments>> {
        let Some(event) = self.db.events.find_by_id(id).await? else {
            return Ok(None);
        };
        let departments = self
            .departments
            .resolve(event.department_id, event.department_ids.as_deref())
            .await?;

        Ok(Some(EventWithDepartments { event, departments }))
    }

    /// Find planned events conflicting with the given date/time window.
    ///
    /// The date prefilter matches events with either range endpoint inside
    /// the window; the time filter applies the strict overlap test.
    pub async fn get_conflicting_events(
        &self,
        date_start: NaiveDate,
        date_end: NaiveDate,
        time_start: NaiveTime,
        time_end: NaiveTime,
        exclude_event_id: Option<i64>,
    ) -> Result<Vec<Event>> {
        let candidates = self
            .db
            .events
            .find_conflict_candidates(date_start, date_end)
            .await?;
        let conflicts =
            conflict::filter_overlapping(candidates, time_start, time_end, exclude_event_id);
        debug!(
            count = conflicts.len(),
            date_start = %date_start,
            date_end = %date_end,
            "Conflict check completed"
        );

        Ok(conflicts)
    }

    /// Whether any planned event conflicts with the window
    pub async fn check_time_conflict(
        &self,
        date_start: NaiveDate,
        date_end: NaiveDate,
        time_start: NaiveTime,
        time_end: NaiveTime,
        exclude_event_id: Option<i64>,
    ) -> Result<bool> {
        let conflicts = self
            .get_conflicting_events(date_start, date_end, time_start, time_end, exclude_event_id)
            .await?;

        Ok(!conflicts.is_empty())
    }

    /// Clear the request back-reference, leaving the event intact
    pub async fn clear_request_link(&self, event_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;
        self.db
            .events
            .clear_request_link_with(&mut *tx, event_id)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Delete an event and its dependents: subscriptions, then change
    /// logs, then the event row
    pub async fn remove(&self, event_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;
        self.db
            .subscriptions
            .delete_by_event_with(&mut *tx, event_id)
            .await?;
        self.db
            .change_logs
            .delete_by_event_with(&mut *tx, event_id)
            .await?;
        self.db.events.delete_with(&mut *tx, event_id).await?;
        tx.commit().await?;
        info!(event_id = event_id, "Event removed with dependents");

        Ok(())
    }
}
