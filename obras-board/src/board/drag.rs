//! Drag-and-drop protocol
//!
//! Turns one drop gesture into a local and remote state change:
//!
//! 1. ignore drops without a destination or onto the card's own slot
//! 2. splice the card into its new slot, allocate its position and
//!    publish the resulting board to the cache before any remote call
//! 3. cross-list drops: move the card remotely; on failure skip to 6
//! 4. cross-list drops: apply the destination list's label rules
//! 5. store the allocated position (or the whole renumbered list when
//!    the allocation collapsed)
//! 6. always refetch the board and replace the cached snapshot
//!
//! Remote failures are caught where they happen, logged and toasted with
//! the generic failure message; nothing is rolled back locally because
//! step 6 restores whatever the backend actually recorded. Drops on one
//! handler are serialized.

use super::backend::BoardBackend;
use super::cache::BoardCache;
use super::model::{Board, Card, ListRole};
use super::position::{allocate_position, renumbered_positions, Allocation};
use super::rules::{plan_label_changes, LabelPlan};
use crate::config::TOAST_MOVE_SUCCESS;
use crate::error::{AppError, Result};
use crate::services::toasts::{Toast, ToastSink};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// A slot in a list as reported by the drag-and-drop layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropLocation {
    pub list_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(list_id: impl Into<String>, index: usize) -> Self {
        Self {
            list_id: list_id.into(),
            index,
        }
    }
}

/// End of a drag gesture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropEvent {
    pub card_id: String,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { card_id: String },
    Applying { card_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOptions {
    pub notify_completion: bool,
    pub compact_on_collapse: bool,
    pub toast_on_success: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            notify_completion: true,
            compact_on_collapse: true,
            toast_on_success: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragReport {
    pub card_id: String,
    pub destination_list_id: String,
    /// Position given to the card in the optimistic snapshot
    pub position: f64,
    pub moved_across_lists: bool,
    /// The destination list was renumbered instead of subdivided
    pub compacted: bool,
    /// At least one remote step failed
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing to do; no remote call was made
    NoOp,
    /// The local board did not match the drop; cache left untouched
    Aborted,
    Applied(DragReport),
}

/// Optimistic result of a drop, computed against a cached snapshot
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub board: Board,
    /// The card as it was before the drop
    pub card: Card,
    pub destination_role: ListRole,
    pub allocation: Allocation,
    pub compacted: bool,
    /// (card id, position) pairs to store remotely
    pub placements: Vec<(String, f64)>,
}

impl PlannedMove {
    pub fn position(&self) -> f64 {
        self.placements
            .iter()
            .find(|(id, _)| *id == self.card.id)
            .map(|(_, position)| *position)
            .unwrap_or(self.allocation.position)
    }
}

/// Splice a card from `source` into `destination` on a copy of `board`.
pub fn plan_move(
    board: &Board,
    card_id: &str,
    source: &DropLocation,
    destination: &DropLocation,
    compact_on_collapse: bool,
) -> std::result::Result<PlannedMove, String> {
    let source_index = board
        .list_index(&source.list_id)
        .ok_or_else(|| format!("source list {} is not on the board", source.list_id))?;
    let destination_index = board
        .list_index(&destination.list_id)
        .ok_or_else(|| format!("destination list {} is not on the board", destination.list_id))?;

    let mut next = board.clone();

    match next.lists[source_index].cards.get(source.index) {
        Some(card) if card.id == card_id => {}
        Some(card) => {
            return Err(format!(
                "slot {} of list {} holds card {}, not {}",
                source.index, source.list_id, card.id, card_id
            ))
        }
        None => {
            return Err(format!(
                "list {} has no slot {}",
                source.list_id, source.index
            ))
        }
    }

    let original = next.lists[source_index].cards.remove(source.index);
    let mut moved = original.clone();
    moved.list_id = destination.list_id.clone();

    let destination_list = &mut next.lists[destination_index];
    let destination_role = destination_list.role;
    let cards = &mut destination_list.cards;
    let index = destination.index.min(cards.len());
    cards.insert(index, moved);

    let allocation = allocate_position(cards, index);
    let compacted = compact_on_collapse && !allocation.in_order;

    let placements = if compacted {
        let renumbered = renumbered_positions(cards.len());
        for (card, position) in cards.iter_mut().zip(renumbered) {
            card.position = position;
        }
        cards.iter().map(|card| (card.id.clone(), card.position)).collect()
    } else {
        cards[index].position = allocation.position;
        vec![(cards[index].id.clone(), allocation.position)]
    };

    Ok(PlannedMove {
        board: next,
        card: original,
        destination_role,
        allocation,
        compacted,
        placements,
    })
}

pub struct DragHandler<B: BoardBackend> {
    backend: Arc<B>,
    cache: BoardCache,
    toasts: Arc<dyn ToastSink>,
    options: RwLock<DragOptions>,
    state: Mutex<DragState>,
    in_flight: Mutex<()>,
}

impl<B: BoardBackend> DragHandler<B> {
    pub fn new(backend: Arc<B>, cache: BoardCache, toasts: Arc<dyn ToastSink>) -> Self {
        Self {
            backend,
            cache,
            toasts,
            options: RwLock::new(DragOptions::default()),
            state: Mutex::new(DragState::Idle),
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_options(self, options: DragOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Takes effect from the next drop
    pub fn set_options(&self, options: DragOptions) {
        *self.options.write().unwrap_or_else(|e| e.into_inner()) = options;
    }

    pub fn options(&self) -> DragOptions {
        *self.options.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// True while a drop is being applied; hosts disable dragging meanwhile
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub async fn state(&self) -> DragState {
        self.state.lock().await.clone()
    }

    /// Idle -> Dragging. Purely local; rejected while a drop is in flight.
    pub async fn begin_drag(&self, card_id: &str) -> Result<()> {
        if self.is_busy() {
            return Err(AppError::DragInProgress);
        }

        *self.state.lock().await = DragState::Dragging {
            card_id: card_id.to_string(),
        };
        Ok(())
    }

    /// Abandon a drag that never reached a drop
    pub async fn cancel_drag(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, DragState::Dragging { .. }) {
            *state = DragState::Idle;
        }
    }

    pub async fn handle_drag_end(&self, work_site_id: i64, drop: DropEvent) -> DragOutcome {
        let _in_flight = self.in_flight.lock().await;
        let outcome = self.apply_drop(work_site_id, &drop).await;
        *self.state.lock().await = DragState::Idle;
        outcome
    }

    async fn apply_drop(&self, work_site_id: i64, drop: &DropEvent) -> DragOutcome {
        let destination = match &drop.destination {
            Some(destination) if *destination != drop.source => destination,
            _ => {
                tracing::debug!("Drop of card {} changed nothing", drop.card_id);
                return DragOutcome::NoOp;
            }
        };

        *self.state.lock().await = DragState::Applying {
            card_id: drop.card_id.clone(),
        };

        let Some(board) = self.cache.get(work_site_id).await else {
            tracing::error!(
                "Dropped card {} but the board of work site {} is not loaded",
                drop.card_id,
                work_site_id
            );
            return DragOutcome::Aborted;
        };

        let planned = match plan_move(
            &board,
            &drop.card_id,
            &drop.source,
            destination,
            self.options().compact_on_collapse,
        ) {
            Ok(planned) => planned,
            Err(reason) => {
                tracing::error!("Aborting drop of card {}: {}", drop.card_id, reason);
                return DragOutcome::Aborted;
            }
        };

        let position = planned.position();
        let PlannedMove {
            board: optimistic,
            card,
            destination_role,
            compacted,
            placements,
            ..
        } = planned;

        self.cache.replace(work_site_id, optimistic).await;

        let across_lists = drop.source.list_id != destination.list_id;
        tracing::info!(
            "Moving card {} to list {} at index {} (position {})",
            card.id,
            destination.list_id,
            destination.index,
            position
        );

        let mut failed = false;

        let moved = if across_lists {
            match self.backend.move_card(&card.id, &destination.list_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Failed to move card {}: {}", card.id, e);
                    self.report_failure(&mut failed);
                    false
                }
            }
        } else {
            true
        };

        if moved {
            if across_lists && destination_role != ListRole::None {
                if let Err(e) = self.apply_label_rules(work_site_id, &card, destination_role).await {
                    tracing::error!("Failed to update labels of card {}: {}", card.id, e);
                    self.report_failure(&mut failed);
                }
            }

            if let Err(e) = self.store_positions(&destination.list_id, &placements).await {
                tracing::error!("Failed to store position of card {}: {}", card.id, e);
                self.report_failure(&mut failed);
            }
        }

        if let Err(e) = self
            .cache
            .invalidate_and_refetch(work_site_id, &*self.backend)
            .await
        {
            tracing::error!("Failed to refetch board of work site {}: {}", work_site_id, e);
            if !failed {
                self.report_failure(&mut failed);
            }
        }

        if !failed && self.options().toast_on_success {
            self.toasts.show(Toast::success(TOAST_MOVE_SUCCESS));
        }

        DragOutcome::Applied(DragReport {
            card_id: card.id,
            destination_list_id: destination.list_id.clone(),
            position,
            moved_across_lists: across_lists,
            compacted,
            failed,
        })
    }

    fn report_failure(&self, failed: &mut bool) {
        self.toasts.show(Toast::failure());
        *failed = true;
    }

    /// Returns the first failure after attempting every change
    async fn apply_label_rules(&self, work_site_id: i64, card: &Card, role: ListRole) -> Result<()> {
        let (plan, mut first_error) = match self.backend.list_labels().await {
            Ok(catalog) => (plan_label_changes(role, &card.labels, &catalog), None),
            Err(e) => (
                LabelPlan {
                    notify_completion: role == ListRole::Completed,
                    ..LabelPlan::default()
                },
                Some(e),
            ),
        };

        for label in &plan.add {
            if let Err(e) = self.backend.add_label_to_card(&card.id, &label.id).await {
                tracing::warn!("Could not add label {} to card {}: {}", label.title, card.id, e);
                first_error.get_or_insert(e);
            }
        }

        for label in &plan.remove {
            if let Err(e) = self.backend.remove_label_from_card(&card.id, &label.id).await {
                tracing::warn!("Could not remove label {} from card {}: {}", label.title, card.id, e);
                first_error.get_or_insert(e);
            }
        }

        if plan.notify_completion && self.options().notify_completion {
            self.backend
                .notify_card_completed(work_site_id, &card.title)
                .await;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn store_positions(&self, list_id: &str, placements: &[(String, f64)]) -> Result<()> {
        for (card_id, position) in placements {
            self.backend
                .set_card_position(card_id, list_id, *position)
                .await?;
        }
        Ok(())
    }
}
