//! Delivery command handlers.

use anyhow::{Context, Result};
use convoy_core::types::{DeliveryAttempt, Filter};
use convoy_core::{Fetcher, Gateway};
use convoy_dash::sidebar::{SlotState, latest_attempt};
use convoy_dash::{DashEffect, NotificationKind, RetryDispatcher, RetryTarget, SidebarSlot};

use super::render;

pub async fn list(gateway: &Gateway, page: u32, filter: &Filter) -> Result<()> {
    let fetcher = Fetcher::new(gateway);
    let deliveries = fetcher
        .deliveries(page, filter, None)
        .await
        .context("fetch deliveries")?;
    render::print_deliveries(&deliveries);
    Ok(())
}

/// Shows one delivery in detail.
pub async fn show(gateway: &Gateway, delivery_id: &str) -> Result<()> {
    let fetcher = Fetcher::new(gateway);
    let delivery = fetcher
        .delivery(delivery_id)
        .await
        .with_context(|| format!("fetch delivery {delivery_id}"))?;
    render::print_delivery(&delivery);
    Ok(())
}

/// Shows the most recent attempt for a delivery (the sidebar view).
pub async fn attempts(gateway: &Gateway, delivery_id: &str) -> Result<()> {
    let fetcher = Fetcher::new(gateway);

    let mut slot: SidebarSlot<Option<DeliveryAttempt>> = SidebarSlot::new();
    let generation = slot.begin(delivery_id);
    let outcome = fetcher
        .delivery_attempts(delivery_id)
        .await
        .map(latest_attempt)
        .map_err(|e| e.to_string());
    slot.resolve(generation, outcome);

    match slot.state() {
        SlotState::Loaded(Some(attempt)) => render::print_attempt(attempt),
        SlotState::Loaded(None) => println!("Delivery {delivery_id} has no attempts yet."),
        SlotState::Failed(message) => {
            anyhow::bail!("Failed to load attempts for delivery {delivery_id}: {message}")
        }
        SlotState::Idle | SlotState::Loading => unreachable!("sidebar slot left unresolved"),
    }
    Ok(())
}

pub async fn retry(gateway: &Gateway, delivery_id: &str, page: u32, filter: &Filter) -> Result<()> {
    run_retry(
        gateway,
        RetryTarget::Single(delivery_id.to_string()),
        page,
        filter,
    )
    .await
}

pub async fn batch_retry(
    gateway: &Gateway,
    delivery_ids: &[String],
    page: u32,
    filter: &Filter,
) -> Result<()> {
    run_retry(
        gateway,
        RetryTarget::Batch(delivery_ids.to_vec()),
        page,
        filter,
    )
    .await
}

/// Dispatches a retry mutation and executes the resulting effects: the
/// notification always, the list refetch only on success.
async fn run_retry(
    gateway: &Gateway,
    target: RetryTarget,
    page: u32,
    filter: &Filter,
) -> Result<()> {
    let fetcher = Fetcher::new(gateway);
    let mut dispatcher = RetryDispatcher::new();

    let Some(target) = dispatcher.dispatch(target) else {
        // Single-shot command; the guard can only be idle here.
        return Ok(());
    };

    let outcome = match &target {
        RetryTarget::Single(id) => fetcher.resend(id).await,
        RetryTarget::Batch(ids) => fetcher.batch_retry(ids).await,
    }
    .map_err(|e| e.to_string());

    let mut failed = false;
    for effect in dispatcher.complete(outcome) {
        match effect {
            DashEffect::Notify(notification) => {
                match notification.kind {
                    NotificationKind::Success => println!("{}", notification.message),
                    NotificationKind::Error => {
                        failed = true;
                        eprintln!("error: {}", notification.message);
                    }
                }
            }
            DashEffect::Refetch => {
                let deliveries = fetcher
                    .deliveries(page, filter, None)
                    .await
                    .context("refresh deliveries after retry")?;
                render::print_deliveries(&deliveries);
            }
        }
    }

    if failed {
        anyhow::bail!("retry failed");
    }
    Ok(())
}
