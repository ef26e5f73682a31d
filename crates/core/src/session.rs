//! View-state slots driven by fetch/delete operations.
//!
//! Each slot moves `Idle -> Loading -> {Success, Failed}` and starts over on the next
//! trigger. Entering `Loading` discards the previous result or message. Errors are reduced
//! to their message here and go no further.

use crate::client::AdvisorClient;
use crate::domain::analysis::AnalysisView;
use crate::domain::history::HistoryView;
use crate::history::aggregate;
use crate::normalize::normalize;
use crate::validate::validate;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const CANCELLED: &str = "Request was cancelled";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Success(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn settle<E: ToString>(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => LoadState::Success(v),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }
}

struct Slot {
    ticket: u64,
    state: LoadState<AnalysisView>,
}

/// The single analysis view slot.
///
/// Loads may overlap. Each load takes a ticket when it enters `Loading`; its result is
/// applied only if no newer load has started since, so the slot always ends up showing the
/// most recently triggered request regardless of completion order.
pub struct AnalysisSession {
    client: AdvisorClient,
    slot: Mutex<Slot>,
}

impl AnalysisSession {
    pub fn new(client: AdvisorClient) -> Self {
        Self {
            client,
            slot: Mutex::new(Slot {
                ticket: 0,
                state: LoadState::Idle,
            }),
        }
    }

    pub fn state(&self) -> LoadState<AnalysisView> {
        self.lock().state.clone()
    }

    /// Validates, fetches and normalizes. Returns `false` when the outcome was discarded
    /// because a newer load started while this one was in flight.
    pub async fn load(&self, client_id: &str) -> bool {
        let ticket = {
            let mut slot = self.lock();
            slot.ticket += 1;
            slot.state = LoadState::Loading;
            slot.ticket
        };
        let guard = InFlight {
            slot: &self.slot,
            ticket,
        };

        let result = match validate(client_id) {
            Ok(id) => self.client.fetch_analysis(&id).await.map(|raw| normalize(&raw)),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &result {
            tracing::warn!(client_id, error = %err, "analysis load failed");
        }

        let mut slot = self.lock();
        if slot.ticket != ticket {
            tracing::warn!(
                client_id,
                ticket,
                latest = slot.ticket,
                "discarding stale analysis response"
            );
            return false;
        }
        slot.state = LoadState::settle(result);
        drop(slot);
        drop(guard);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Moves the slot out of `Loading` if the load future is dropped before it settles.
struct InFlight<'a> {
    slot: &'a Mutex<Slot>,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.ticket == self.ticket && slot.state.is_loading() {
            slot.state = LoadState::Failed(CANCELLED.to_string());
        }
    }
}

/// The user-facing "are you sure?" step that gates a delete.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Declined at the confirmation step; nothing was sent.
    Cancelled,
    /// Deleted, and the history was reloaded.
    Deleted,
    /// The backend refused or could not be reached; the list on screen is unchanged.
    Failed,
}

pub struct HistorySession {
    client: AdvisorClient,
    state: LoadState<HistoryView>,
    delete_error: Option<String>,
}

impl HistorySession {
    pub fn new(client: AdvisorClient) -> Self {
        Self {
            client,
            state: LoadState::Idle,
            delete_error: None,
        }
    }

    pub fn state(&self) -> &LoadState<HistoryView> {
        &self.state
    }

    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    pub async fn refresh(&mut self) {
        self.delete_error = None;
        let pending = Pending::begin(&mut self.state);
        let result = self.client.fetch_history().await.map(|index| {
            let (records, stats) = aggregate(&index);
            HistoryView { records, stats }
        });
        match &result {
            Ok(view) => tracing::info!(
                records = view.stats.total_analyses,
                clients = view.stats.unique_clients(),
                "history loaded"
            ),
            Err(err) => tracing::warn!(error = %err, "history load failed"),
        }
        pending.settle(result);
    }

    /// Confirm, delete, then reload. The reload only starts once the delete has succeeded;
    /// nothing is removed locally ahead of the backend.
    pub async fn delete(
        &mut self,
        confirm: &dyn Confirm,
        client_id: &str,
        timestamp: &str,
    ) -> DeleteOutcome {
        let prompt = format!("Delete the analysis for client {client_id} from {timestamp}?");
        if !confirm.confirm(&prompt) {
            return DeleteOutcome::Cancelled;
        }

        match self.client.delete_record(client_id, timestamp).await {
            Ok(()) => {
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                self.delete_error = Some(err.to_string());
                DeleteOutcome::Failed
            }
        }
    }
}

/// Borrowed `Loading` state that must be settled; dropping it unsettled marks it cancelled.
struct Pending<'a, T> {
    state: &'a mut LoadState<T>,
}

impl<'a, T> Pending<'a, T> {
    fn begin(state: &'a mut LoadState<T>) -> Self {
        *state = LoadState::Loading;
        Self { state }
    }

    fn settle<E: ToString>(self, result: Result<T, E>) {
        *self.state = LoadState::settle(result);
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            *self.state = LoadState::Failed(CANCELLED.to_string());
        }
    }
}
