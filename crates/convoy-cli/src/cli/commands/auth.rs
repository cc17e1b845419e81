//! Session command handlers.

use anyhow::{Context, Result};
use convoy_core::Session;
use convoy_core::session::SessionStore;

pub fn login(token: &str, project_id: &str) -> Result<()> {
    let session = Session::new(token.trim(), project_id.trim());
    let store = SessionStore::new();
    store.save(&session).context("save session")?;
    println!(
        "Logged in to project {} (token {}).",
        session.project_id,
        session.masked_token()
    );
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = SessionStore::new();
    let had_session = store.clear().context("clear session")?;
    if had_session {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}
