use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{EndpointDraft, EndpointPatch, EndpointRecord, ProjectState, SyncStatus};
use crate::sync::{SyncError, SyncGateway};
use crate::validation::{self, ValidationError};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("endpoint {0} not found")]
    NotFound(Uuid),
    #[error("a sync operation is already in progress")]
    SyncInProgress,
    #[error("invalid endpoint: {0}")]
    Invalid(#[from] ValidationError),
    #[error("{0} cannot be changed")]
    ImmutableField(&'static str),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Pull,
    Push,
}

/// State-change notification published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    EndpointAdded { id: Uuid },
    EndpointUpdated { id: Uuid },
    EndpointDeleted { id: Uuid },
    SelectionChanged { id: Option<Uuid> },
    CollectionReplaced { count: usize },
    SyncStarted { direction: SyncDirection },
    SyncFinished { direction: SyncDirection, ok: bool },
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::EndpointAdded { .. } => "endpointAdded",
            StoreEvent::EndpointUpdated { .. } => "endpointUpdated",
            StoreEvent::EndpointDeleted { .. } => "endpointDeleted",
            StoreEvent::SelectionChanged { .. } => "selectionChanged",
            StoreEvent::CollectionReplaced { .. } => "collectionReplaced",
            StoreEvent::SyncStarted { .. } => "syncStarted",
            StoreEvent::SyncFinished { .. } => "syncFinished",
        }
    }
}

/// In-memory collection of endpoint records with selection and sync state.
///
/// Every operation is all-or-nothing: a failed call leaves the collection,
/// the selection and the sync status exactly as they were.
pub struct ProjectStore {
    state: RwLock<ProjectState>,
    syncing: AtomicBool,
    last_synced_at: Mutex<Option<DateTime<Utc>>>,
    events: broadcast::Sender<StoreEvent>,
}

/// Holds the sync gate closed; reopens it when dropped, whatever the outcome.
struct SyncGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(ProjectState::default()),
            syncing: AtomicBool::new(false),
            last_synced_at: Mutex::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> ProjectState {
        self.state.read().clone()
    }

    pub fn endpoints(&self) -> Vec<EndpointRecord> {
        self.state.read().endpoints.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: Uuid) -> Result<EndpointRecord, StoreError> {
        self.state
            .read()
            .find(id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn selected_endpoint_id(&self) -> Option<Uuid> {
        self.state.read().selected_endpoint_id
    }

    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            is_syncing: self.syncing.load(Ordering::Acquire),
            last_synced_at: *self.last_synced_at.lock(),
        }
    }

    /// Validate and append a record, returning its newly assigned id.
    pub fn add_endpoint(&self, draft: EndpointDraft) -> Result<Uuid, StoreError> {
        validation::validate_draft(&draft)?;
        Ok(self.insert(draft))
    }

    /// Append a record without validating it.
    pub fn add_endpoint_unchecked(&self, draft: EndpointDraft) -> Uuid {
        self.insert(draft)
    }

    pub fn add_blank_endpoint(&self) -> Uuid {
        self.insert(EndpointDraft::blank())
    }

    fn insert(&self, draft: EndpointDraft) -> Uuid {
        let id = {
            let mut state = self.state.write();
            let id = loop {
                let id = Uuid::now_v7();
                if state.find(id).is_none() {
                    break id;
                }
            };
            state.endpoints.push(draft.into_record(id, Utc::now()));
            id
        };

        tracing::debug!("Endpoint {id} added");
        self.notify(StoreEvent::EndpointAdded { id });
        id
    }

    /// Merge `patch` into the record with `id`. The merged record must still be valid.
    pub fn update_endpoint(&self, id: Uuid, patch: &EndpointPatch) -> Result<EndpointRecord, StoreError> {
        self.apply_update(id, patch, true)
    }

    /// Merge `patch` without validating the result. Immutable fields are still rejected.
    pub fn update_endpoint_unchecked(
        &self,
        id: Uuid,
        patch: &EndpointPatch,
    ) -> Result<EndpointRecord, StoreError> {
        self.apply_update(id, patch, false)
    }

    fn apply_update(
        &self,
        id: Uuid,
        patch: &EndpointPatch,
        validate: bool,
    ) -> Result<EndpointRecord, StoreError> {
        if let Some(field) = patch.immutable_field() {
            return Err(StoreError::ImmutableField(field));
        }

        let updated = {
            let mut state = self.state.write();
            let record = state
                .endpoints
                .iter_mut()
                .find(|ep| ep.id == id)
                .ok_or(StoreError::NotFound(id))?;

            let updated = patch.apply(record);
            if validate {
                validation::validate_record(&updated)?;
            }
            *record = updated.clone();
            updated
        };

        tracing::debug!("Endpoint {id} updated");
        self.notify(StoreEvent::EndpointUpdated { id });
        Ok(updated)
    }

    pub fn select_endpoint(&self, id: Uuid) -> Result<(), StoreError> {
        {
            let mut state = self.state.write();
            if state.find(id).is_none() {
                return Err(StoreError::NotFound(id));
            }
            state.selected_endpoint_id = Some(id);
        }

        self.notify(StoreEvent::SelectionChanged { id: Some(id) });
        Ok(())
    }

    /// Remove a record. Clears the selection if it pointed at the removed record.
    pub fn delete_endpoint(&self, id: Uuid) -> Result<EndpointRecord, StoreError> {
        let (removed, selection_cleared) = {
            let mut state = self.state.write();
            let index = state
                .endpoints
                .iter()
                .position(|ep| ep.id == id)
                .ok_or(StoreError::NotFound(id))?;
            let removed = state.endpoints.remove(index);
            let selection_cleared = state.selected_endpoint_id == Some(id);
            if selection_cleared {
                state.selected_endpoint_id = None;
            }
            (removed, selection_cleared)
        };

        tracing::debug!("Endpoint {id} deleted");
        self.notify(StoreEvent::EndpointDeleted { id });
        if selection_cleared {
            self.notify(StoreEvent::SelectionChanged { id: None });
        }
        Ok(removed)
    }

    /// Replace the whole collection with the remote one and clear the selection.
    ///
    /// Rejected with [`StoreError::SyncInProgress`] while another pull or push
    /// is in flight. Returns the number of records received.
    pub async fn pull_from_remote(&self, gateway: &SyncGateway, locator: &str) -> Result<usize, StoreError> {
        let guard = self.begin_sync()?;
        self.notify(StoreEvent::SyncStarted {
            direction: SyncDirection::Pull,
        });
        tracing::info!("Pulling endpoints from {locator} via {}", gateway.backend_id());

        let outcome = match gateway.pull(locator).await {
            Ok(records) => {
                let count = records.len();
                {
                    let mut state = self.state.write();
                    state.endpoints = records;
                    state.selected_endpoint_id = None;
                }
                *self.last_synced_at.lock() = Some(Utc::now());
                tracing::info!("Pulled {count} endpoints from {locator}");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Pull from {locator} failed: {e}");
                Err(StoreError::Sync(e))
            }
        };

        drop(guard);
        self.notify(StoreEvent::SyncFinished {
            direction: SyncDirection::Pull,
            ok: outcome.is_ok(),
        });
        if let Ok(count) = &outcome {
            self.notify(StoreEvent::CollectionReplaced { count: *count });
            self.notify(StoreEvent::SelectionChanged { id: None });
        }
        outcome
    }

    /// Submit the current collection. Shares the sync gate with pulls.
    pub async fn push_to_remote(&self, gateway: &SyncGateway, locator: &str) -> Result<bool, StoreError> {
        let guard = self.begin_sync()?;
        self.notify(StoreEvent::SyncStarted {
            direction: SyncDirection::Push,
        });

        let records = self.endpoints();
        tracing::info!(
            "Pushing {} endpoints to {locator} via {}",
            records.len(),
            gateway.backend_id()
        );

        let outcome = match gateway.push(locator, &records).await {
            Ok(accepted) => {
                if accepted {
                    *self.last_synced_at.lock() = Some(Utc::now());
                } else {
                    tracing::warn!("Push to {locator} was not accepted");
                }
                Ok(accepted)
            }
            Err(e) => {
                tracing::warn!("Push to {locator} failed: {e}");
                Err(StoreError::Sync(e))
            }
        };

        drop(guard);
        self.notify(StoreEvent::SyncFinished {
            direction: SyncDirection::Push,
            ok: matches!(outcome, Ok(true)),
        });
        outcome
    }

    fn begin_sync(&self) -> Result<SyncGuard<'_>, StoreError> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StoreError::SyncInProgress)?;
        Ok(SyncGuard {
            flag: &self.syncing,
        })
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
