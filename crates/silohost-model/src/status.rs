use crate::site::{BuildProgress, Site, SiteStatus};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A `building` site whose stamp has not advanced for this long is considered
/// stuck: background generation can die without ever flipping the status.
pub const BUILD_STALE_AFTER_MS: i64 = 5 * 60 * 1000;

pub const PAUSED_DEFAULT_MESSAGE: &str = "This site is temporarily paused by its owner.";

/// The result of a legal transition: what to persist, in one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusChange {
    pub status: SiteStatus,
    pub message: Option<String>,
    pub progress: Option<BuildProgress>,
    pub stamped_at_ms: i64,
}

/// Rejected user transition. Carries the current status and the explicit
/// allowed set so callers can surface both, never silently coerce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionError {
    pub current: SiteStatus,
    pub requested: SiteStatus,
    pub allowed: Vec<SiteStatus>,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot transition from {} to {}; allowed: [{}]",
            self.current,
            self.requested,
            self.allowed
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for TransitionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RetryError {
    /// Site is not in a retryable state at all.
    NotRetryable { current: SiteStatus },
    /// A build is running and its stamp is fresher than the staleness window.
    StillRunning { age_ms: i64 },
}

impl Display for RetryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRetryable { current } => {
                write!(f, "retry is only valid for failed or stuck builds (status: {current})")
            }
            Self::StillRunning { age_ms } => {
                write!(f, "a build is already running (last progress {age_ms}ms ago)")
            }
        }
    }
}

impl std::error::Error for RetryError {}

/// The only transitions a site owner may request directly. Everything else is
/// system-initiated (build pipeline) or admin-only (`suspended`).
#[must_use]
pub fn allowed_user_transitions(current: SiteStatus) -> &'static [SiteStatus] {
    match current {
        SiteStatus::Active => &[SiteStatus::Paused],
        SiteStatus::Paused => &[SiteStatus::Active],
        SiteStatus::Building | SiteStatus::Failed | SiteStatus::Suspended => &[],
    }
}

pub fn apply_user_transition(
    site: &Site,
    requested: SiteStatus,
    message: Option<String>,
    now_ms: i64,
) -> Result<StatusChange, TransitionError> {
    let allowed = allowed_user_transitions(site.status);
    if !allowed.contains(&requested) {
        return Err(TransitionError {
            current: site.status,
            requested,
            allowed: allowed.to_vec(),
        });
    }
    let message = match requested {
        SiteStatus::Paused => Some(message.unwrap_or_else(|| PAUSED_DEFAULT_MESSAGE.to_string())),
        _ => None,
    };
    Ok(StatusChange {
        status: requested,
        message,
        progress: None,
        stamped_at_ms: now_ms,
    })
}

/// Re-enters `building` with a fresh task count and a reset progress
/// snapshot. Permitted for failed builds, and for `building` sites whose
/// stamp is older than [`BUILD_STALE_AFTER_MS`] (stuck-build recovery).
pub fn retry_build(site: &Site, total_tasks: u32, now_ms: i64) -> Result<StatusChange, RetryError> {
    match site.status {
        SiteStatus::Failed => {}
        SiteStatus::Building => {
            let age_ms = now_ms.saturating_sub(site.status_updated_at_ms);
            if age_ms <= BUILD_STALE_AFTER_MS {
                return Err(RetryError::StillRunning { age_ms });
            }
        }
        current => return Err(RetryError::NotRetryable { current }),
    }
    Ok(build_started(total_tasks, now_ms))
}

/// Entering `building` resets counters and clears any prior message.
#[must_use]
pub fn build_started(total_tasks: u32, now_ms: i64) -> StatusChange {
    StatusChange {
        status: SiteStatus::Building,
        message: None,
        progress: Some(BuildProgress::fresh(total_tasks, now_ms)),
        stamped_at_ms: now_ms,
    }
}

#[must_use]
pub fn build_succeeded(total_tasks: u32, now_ms: i64) -> StatusChange {
    StatusChange {
        status: SiteStatus::Active,
        message: None,
        progress: Some(BuildProgress {
            completed_tasks: total_tasks,
            total_tasks,
            current_task: None,
            started_at_ms: None,
        }),
        stamped_at_ms: now_ms,
    }
}

#[must_use]
pub fn build_failed(error: &str, now_ms: i64) -> StatusChange {
    StatusChange {
        status: SiteStatus::Failed,
        message: Some(error.to_string()),
        progress: None,
        stamped_at_ms: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{SiteId, SiteSettings, WebsiteType};
    use crate::slug::Slug;

    fn site(status: SiteStatus, status_updated_at_ms: i64) -> Site {
        Site {
            id: SiteId(1),
            slug: Slug::parse("acme").expect("slug"),
            custom_domain: None,
            custom_domain_verified: false,
            status,
            status_message: None,
            status_updated_at_ms,
            website_type: WebsiteType::SingleLocation,
            progress: BuildProgress::default(),
            settings: SiteSettings::default(),
            created_at_ms: 0,
        }
    }

    #[test]
    fn pause_and_resume_are_the_only_user_transitions() {
        let active = site(SiteStatus::Active, 0);
        let change = apply_user_transition(&active, SiteStatus::Paused, None, 10).expect("pause");
        assert_eq!(change.status, SiteStatus::Paused);
        assert_eq!(change.message.as_deref(), Some(PAUSED_DEFAULT_MESSAGE));
        assert_eq!(change.stamped_at_ms, 10);

        let paused = site(SiteStatus::Paused, 10);
        let change = apply_user_transition(&paused, SiteStatus::Active, None, 20).expect("resume");
        assert_eq!(change.status, SiteStatus::Active);
        assert_eq!(change.message, None);

        let err = apply_user_transition(&active, SiteStatus::Building, None, 10)
            .expect_err("direct building is rejected");
        assert_eq!(err.current, SiteStatus::Active);
        assert_eq!(err.allowed, vec![SiteStatus::Paused]);
    }

    #[test]
    fn suspended_accepts_no_user_transitions() {
        let suspended = site(SiteStatus::Suspended, 0);
        for requested in [SiteStatus::Active, SiteStatus::Paused, SiteStatus::Building] {
            let err = apply_user_transition(&suspended, requested, None, 1).expect_err("rejected");
            assert!(err.allowed.is_empty());
        }
    }

    #[test]
    fn retry_allowed_for_failed_and_stale_builds_only() {
        let failed = site(SiteStatus::Failed, 0);
        let change = retry_build(&failed, 7, 1_000).expect("failed builds retry");
        assert_eq!(change.status, SiteStatus::Building);
        let progress = change.progress.expect("progress reset");
        assert_eq!(progress.total_tasks, 7);
        assert_eq!(progress.completed_tasks, 0);
        assert_eq!(change.message, None);

        let now = 10 * 60 * 1000;
        let stale = site(SiteStatus::Building, now - BUILD_STALE_AFTER_MS - 1);
        assert!(retry_build(&stale, 7, now).is_ok(), "stuck build is retry-eligible");

        let fresh = site(SiteStatus::Building, now - BUILD_STALE_AFTER_MS + 1);
        match retry_build(&fresh, 7, now) {
            Err(RetryError::StillRunning { age_ms }) => {
                assert!(age_ms < BUILD_STALE_AFTER_MS);
            }
            other => panic!("expected StillRunning, got {other:?}"),
        }

        let active = site(SiteStatus::Active, 0);
        assert!(matches!(
            retry_build(&active, 7, now),
            Err(RetryError::NotRetryable { .. })
        ));
    }
}
