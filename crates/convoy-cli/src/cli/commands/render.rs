//! Shared terminal output for grouped lists.

use convoy_core::types::{DeliveryAttempt, Event, EventDelivery, Page, Pagination};
use convoy_dash::group_by_day;

pub fn print_events(page: &Page<Event>) {
    if page.content.is_empty() {
        println!("No events found.");
        return;
    }
    for group in group_by_day(page.content.iter()) {
        println!("{}", group.label);
        for event in group.items {
            println!(
                "  {}  {}  {}",
                event.uid,
                event.event_type,
                event.created_at.format("%H:%M:%S")
            );
        }
    }
    print_footer(&page.pagination);
}

pub fn print_deliveries(page: &Page<EventDelivery>) {
    if page.content.is_empty() {
        println!("No deliveries found.");
        return;
    }
    for group in group_by_day(page.content.iter()) {
        println!("{}", group.label);
        for delivery in group.items {
            println!(
                "  {}  {}  {}",
                delivery.uid,
                delivery.status,
                delivery.created_at.format("%H:%M:%S")
            );
        }
    }
    print_footer(&page.pagination);
}

pub fn print_event(event: &Event) {
    println!("event {}", event.uid);
    println!("  type: {}", event.event_type);
    println!("  at: {}", event.created_at.to_rfc3339());
    if !event.data.is_null() {
        // `{:#}` pretty-prints serde_json::Value.
        println!("  payload: {:#}", event.data);
    }
}

pub fn print_delivery(delivery: &EventDelivery) {
    println!("delivery {}", delivery.uid);
    println!("  status: {}", delivery.status);
    println!("  at: {}", delivery.created_at.to_rfc3339());
    if let Some(updated) = delivery.updated_at {
        println!("  updated: {}", updated.to_rfc3339());
    }
    if !delivery.metadata.is_null() {
        println!("  metadata: {:#}", delivery.metadata);
    }
}

pub fn print_attempt(attempt: &DeliveryAttempt) {
    println!("attempt {}", attempt.uid);
    println!("  http status: {}", attempt.http_status);
    println!("  at: {}", attempt.created_at.to_rfc3339());
    if let Some(error) = &attempt.error {
        println!("  error: {error}");
    }
    if !attempt.response_data.is_empty() {
        println!("  response: {}", attempt.response_data);
    }
}

fn print_footer(pagination: &Pagination) {
    match pagination.next {
        Some(next) => println!(
            "Page {}/{} ({} total). Next: --page {}",
            pagination.page, pagination.total_page, pagination.total, next
        ),
        None => println!(
            "Page {}/{} ({} total).",
            pagination.page, pagination.total_page, pagination.total
        ),
    }
}
