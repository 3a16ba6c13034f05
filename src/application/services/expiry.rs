//! Background task that completes bookings whose end time has passed.
//!
//! Runs in a tokio::spawn loop on a fixed interval (default 60 seconds),
//! handing every elapsed non-terminal booking to the booking ledger's
//! `complete`, which releases the slot under the same per-space lock as
//! user-initiated operations.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::application::services::BookingService;
use crate::shared::shutdown::ShutdownSignal;

/// Start the booking expiry sweeper.
///
/// The interval is a polling cadence, not a hard deadline: an elapsed
/// booking is completed within one tick of its end time. Double invocation
/// against the same booking is safe; `sweep_elapsed` treats a terminal
/// booking as already handled.
pub fn start_expiry_sweeper(
    service: Arc<BookingService>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(check_interval = check_interval_secs, "Expiry sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = service.sweep_elapsed(Utc::now()).await {
                        warn!(error = %e, "Expiry sweep error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Expiry sweeper shutting down");
                    break;
                }
            }
        }

        info!("Expiry sweeper stopped");
    });
}
