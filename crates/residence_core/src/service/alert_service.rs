//! Alert use-case service for the notification badge.

use crate::model::alert::Alert;
use crate::repo::alert_repo::AlertRepository;
use crate::repo::RepoResult;
use log::info;

/// Maximum alerts shown in the header dropdown.
pub const ALERT_DROPDOWN_LIMIT: u32 = 5;

/// Badge state rendered into every page header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub pending: u64,
    pub recent: Vec<Alert>,
}

pub struct AlertService<R: AlertRepository> {
    repo: R,
}

impl<R: AlertRepository> AlertService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn notify(&self, message: impl AsRef<str>) -> RepoResult<Alert> {
        self.repo.record(message.as_ref())
    }

    pub fn pending_count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    pub fn summary(&self) -> RepoResult<AlertSummary> {
        Ok(AlertSummary {
            pending: self.repo.count()?,
            recent: self.repo.list_recent(ALERT_DROPDOWN_LIMIT)?,
        })
    }

    /// Clears every pending alert and returns how many were removed.
    pub fn clear(&self) -> RepoResult<u64> {
        let cleared = self.repo.clear_all()?;
        info!("event=alerts_clear module=service status=ok cleared={cleared}");
        Ok(cleared)
    }
}
