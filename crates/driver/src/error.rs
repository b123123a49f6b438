use thiserror::Error;

/// Unrecoverable collaborator failure surfaced by the driver.
///
/// Timing anomalies and scheduling races are handled internally (clamped
/// deltas, no-op stale callbacks); only collaborator errors reach the caller,
/// and by the time one does the loop has already stopped itself.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("physics step failed: {0:#}")]
    Physics(anyhow::Error),
    #[error("world update failed: {0:#}")]
    Update(anyhow::Error),
    #[error("world draw failed: {0:#}")]
    Draw(anyhow::Error),
}
