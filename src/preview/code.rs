use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::generation::GenerationGateway;
use crate::models::EndpointRecord;

/// Shown before any code has been generated for an endpoint.
pub const EMPTY_CODE_HINT: &str = "// Select a language to generate client code...";

/// The client code currently displayed for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSlot {
    pub sequence: u64,
    pub language: String,
    pub pending: bool,
    pub code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Identity of one outstanding code generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub endpoint_id: Uuid,
    pub sequence: u64,
}

/// Per-endpoint client code previews with last-request-wins reconciliation.
///
/// Every request takes a sequence number from a single monotonic counter.
/// A response is applied only if its sequence is still the latest issued for
/// its endpoint, so a slow earlier request can never overwrite a newer one.
pub struct CodePreviews {
    next_sequence: AtomicU64,
    slots: DashMap<Uuid, CodeSlot>,
}

impl Default for CodePreviews {
    fn default() -> Self {
        Self::new()
    }
}

impl CodePreviews {
    pub fn new() -> Self {
        Self {
            next_sequence: AtomicU64::new(1),
            slots: DashMap::new(),
        }
    }

    /// Issue a new request for `endpoint_id`, superseding any in flight.
    pub fn begin(&self, endpoint_id: Uuid, language: &str) -> PreviewTicket {
        let mut slot = self.slots.entry(endpoint_id).or_insert_with(|| CodeSlot {
            sequence: 0,
            language: String::new(),
            pending: false,
            code: None,
            updated_at: Utc::now(),
        });

        // Taken under the slot lock so issue order and slot order agree.
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        slot.sequence = sequence;
        slot.language = language.to_string();
        slot.pending = true;
        slot.updated_at = Utc::now();

        PreviewTicket {
            endpoint_id,
            sequence,
        }
    }

    /// Apply a response. Returns false, leaving the slot untouched, if the
    /// ticket has been superseded.
    pub fn complete(&self, ticket: PreviewTicket, code: String) -> bool {
        let Some(mut slot) = self.slots.get_mut(&ticket.endpoint_id) else {
            return false;
        };

        if slot.sequence != ticket.sequence {
            tracing::debug!(
                "Discarding stale code preview #{} for {} (latest is #{})",
                ticket.sequence,
                ticket.endpoint_id,
                slot.sequence
            );
            return false;
        }

        slot.code = Some(code);
        slot.pending = false;
        slot.updated_at = Utc::now();
        true
    }

    /// Generate code for a ticket obtained from [`begin`](Self::begin).
    /// Failures are replaced by the placeholder text.
    pub async fn fulfil(
        &self,
        ticket: PreviewTicket,
        gateway: &GenerationGateway,
        record: &EndpointRecord,
        language: &str,
    ) -> bool {
        let code = gateway.client_code_or_placeholder(record, language).await;
        self.complete(ticket, code)
    }

    /// Begin and fulfil in one step. Returns whether the result was applied.
    pub async fn request(
        &self,
        gateway: &GenerationGateway,
        record: &EndpointRecord,
        language: &str,
    ) -> bool {
        let ticket = self.begin(record.id, language);
        self.fulfil(ticket, gateway, record, language).await
    }

    pub fn current(&self, endpoint_id: Uuid) -> Option<CodeSlot> {
        self.slots.get(&endpoint_id).map(|slot| slot.value().clone())
    }

    pub fn forget(&self, endpoint_id: Uuid) {
        self.slots.remove(&endpoint_id);
    }

    /// Drop slots for endpoints that no longer exist.
    pub fn retain_endpoints(&self, live: &[Uuid]) {
        self.slots.retain(|id, _| live.contains(id));
    }
}
