//! Event command handlers.

use anyhow::{Context, Result};
use convoy_core::types::{EventDelivery, Filter};
use convoy_core::{Fetcher, Gateway};
use convoy_dash::SidebarSlot;
use convoy_dash::sidebar::SlotState;

use super::render;

pub async fn list(gateway: &Gateway, page: u32, filter: &Filter) -> Result<()> {
    let fetcher = Fetcher::new(gateway);
    let events = fetcher
        .events(page, filter, None)
        .await
        .context("fetch events")?;
    render::print_events(&events);
    Ok(())
}

/// Shows one event in detail.
pub async fn show(gateway: &Gateway, event_id: &str) -> Result<()> {
    let fetcher = Fetcher::new(gateway);
    let event = fetcher
        .event(event_id)
        .await
        .with_context(|| format!("fetch event {event_id}"))?;
    render::print_event(&event);
    Ok(())
}

/// Shows the deliveries fanned out from one event (the sidebar view).
pub async fn deliveries(gateway: &Gateway, event_id: &str) -> Result<()> {
    let fetcher = Fetcher::new(gateway);

    let mut slot: SidebarSlot<Vec<EventDelivery>> = SidebarSlot::new();
    let generation = slot.begin(event_id);
    let outcome = fetcher
        .event_deliveries(event_id)
        .await
        .map_err(|e| e.to_string());
    slot.resolve(generation, outcome);

    match slot.state() {
        SlotState::Loaded(deliveries) if deliveries.is_empty() => {
            println!("Event {event_id} has no deliveries.");
        }
        SlotState::Loaded(deliveries) => {
            println!("Deliveries for event {event_id}:");
            for delivery in deliveries {
                println!(
                    "  {}  {}  {}",
                    delivery.uid,
                    delivery.status,
                    delivery.created_at.to_rfc3339()
                );
            }
        }
        SlotState::Failed(message) => {
            anyhow::bail!("Failed to load deliveries for event {event_id}: {message}")
        }
        // One synchronous begin/resolve pair cannot end elsewhere.
        SlotState::Idle | SlotState::Loading => unreachable!("sidebar slot left unresolved"),
    }
    Ok(())
}
