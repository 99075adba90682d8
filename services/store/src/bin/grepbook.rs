//! services/store/src/bin/grepbook.rs
//!
//! Opens the store, reports what it holds and closes it again.
//!
//!   grepbook                          print a status summary
//!   grepbook signup <email> <pass>    create the first user (refused once one exists)

use std::sync::Arc;

use grepbook_core::views::partition_by_status;
use store_lib::{config::Config, error::ServiceError, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), ServiceError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Opening store...");

    // --- 2. Open the Store ---
    let state = AppState::open(config.clone())?;

    // --- 3. Run the Requested Command ---
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => status(&state),
        [cmd, email, password] if cmd == "signup" => signup(&state, email, password),
        _ => Err(ServiceError::Internal(
            "usage: grepbook [signup <email> <password>]".to_string(),
        )),
    };

    // --- 4. Close the Store ---
    state.close();
    result
}

fn status(state: &AppState) -> Result<(), ServiceError> {
    if state.users.does_any_user_exist() {
        let name = state.users.get_name()?;
        info!("Site owner: {}", if name.is_empty() { "(unnamed)" } else { name.as_str() });
    } else {
        info!("No users yet; the first signup will be accepted");
    }

    let reviews = state.reviews.get_all_book_reviews()?;
    let total = reviews.len();
    let (ongoing, completed) = partition_by_status(reviews);
    info!(
        "{} book review(s): {} ongoing, {} completed",
        total,
        ongoing.len(),
        completed.len()
    );
    for review in ongoing.iter().chain(completed.iter()) {
        info!(
            "  {} {:?} ({} chapters, updated {})",
            review.uid,
            review.title,
            review.chapters.len(),
            review.updated_at.to_rfc3339()
        );
    }
    Ok(())
}

fn signup(state: &AppState, email: &str, password: &str) -> Result<(), ServiceError> {
    if state.users.does_any_user_exist() {
        warn!("Signup refused: a user already exists");
        return Err(ServiceError::Internal("signup is closed".to_string()));
    }
    let user = state.users.create_user(email, password)?;
    info!("Created user {} with id {}", user.email, user.id);
    Ok(())
}
