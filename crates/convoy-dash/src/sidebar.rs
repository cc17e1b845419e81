//! Selection sidebar slot state.
//!
//! When the user selects a list item, the sidebar fetches its most recent
//! sub-resource (latest delivery attempt, or an event's sibling deliveries).
//! In-flight requests are never cancelled; instead each fetch carries a
//! monotonic generation, and a response only lands if its generation is
//! still the latest one issued for the slot. Stale responses are discarded,
//! so out-of-order completion cannot clobber a newer selection.

use convoy_core::types::DeliveryAttempt;

/// Per-selection fetch state, rendered explicitly (including failures).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

/// A sidebar slot: the currently selected item id, its fetch state, and the
/// generation counter that arbitrates concurrent responses.
#[derive(Debug, Default)]
pub struct SidebarSlot<T> {
    state: SlotState<T>,
    selected: Option<String>,
    generation: u64,
}

impl<T> SidebarSlot<T> {
    pub fn new() -> Self {
        Self {
            state: SlotState::Idle,
            selected: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    /// The id of the item the slot currently tracks.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Records a new selection and returns the generation the caller must
    /// hand back with the response.
    ///
    /// The slot moves to `Loading` immediately; any response stamped with an
    /// older generation is dead on arrival.
    pub fn begin(&mut self, item_id: impl Into<String>) -> u64 {
        self.generation += 1;
        self.selected = Some(item_id.into());
        self.state = SlotState::Loading;
        self.generation
    }

    /// Applies a fetch outcome if `generation` is still the latest issued.
    ///
    /// Returns whether the response was applied. Failures land as an
    /// explicit `Failed` state rather than being silently dropped.
    pub fn resolve(&mut self, generation: u64, outcome: Result<T, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale sidebar response"
            );
            return false;
        }
        self.state = match outcome {
            Ok(value) => SlotState::Loaded(value),
            Err(message) => SlotState::Failed(message),
        };
        true
    }

    /// Clears the slot (e.g. when the list it annotates is replaced).
    pub fn reset(&mut self) {
        self.selected = None;
        self.state = SlotState::Idle;
    }
}

/// The single most recent attempt, which is all the sidebar retains.
///
/// The API returns attempts oldest first.
pub fn latest_attempt(mut attempts: Vec<DeliveryAttempt>) -> Option<DeliveryAttempt> {
    attempts.pop()
}
