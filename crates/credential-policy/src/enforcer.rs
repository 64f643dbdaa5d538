//! STIG password policy enforcement.
//!
//! Checks run in a fixed order and stop at the first failure:
//! rotation cooldown, strength, difference from the current password, then
//! reuse of a recent password. Nothing runs while STIG is switched off.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use credential_core::config::PolicyConfig;
use credential_core::error::AppError;
use credential_core::result::AppResult;
use credential_core::traits::{PasswordHistoryStore, RoleLookup};
use credential_core::types::{PasswordChangeRecord, RoleTag, UserAccount};

use crate::expiry::{calc_expiry_date, calc_expiry_millis};
use crate::settings::LivePolicySettings;
use crate::validator::PasswordValidator;

/// Decides whether a user may adopt a new password and when passwords expire.
#[derive(Clone)]
pub struct PasswordPolicyEnforcer {
    /// Strength and difference rules.
    validator: PasswordValidator,
    /// Minimum time between two changes.
    cooldown: Duration,
    /// Number of recent history hashes checked for reuse.
    reuse_window: usize,
    /// Live expiry period and STIG switch.
    settings: Arc<LivePolicySettings>,
    /// Role assignments.
    roles: Arc<dyn RoleLookup>,
    /// Password change history.
    history: Arc<dyn PasswordHistoryStore>,
}

impl std::fmt::Debug for PasswordPolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordPolicyEnforcer")
            .field("validator", &self.validator)
            .field("cooldown", &self.cooldown)
            .field("reuse_window", &self.reuse_window)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PasswordPolicyEnforcer {
    /// Creates an enforcer, failing on a cooldown that cannot be represented.
    pub fn new(
        config: &PolicyConfig,
        settings: Arc<LivePolicySettings>,
        roles: Arc<dyn RoleLookup>,
        history: Arc<dyn PasswordHistoryStore>,
    ) -> Result<Self, AppError> {
        let cooldown = Duration::try_hours(config.rotation_cooldown_hours)
            .filter(|cooldown| *cooldown >= Duration::zero())
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "rotation_cooldown_hours ({}) is out of range",
                    config.rotation_cooldown_hours
                ))
            })?;

        Ok(Self {
            validator: PasswordValidator::new(config),
            cooldown,
            reuse_window: config.reuse_window,
            settings,
            roles,
            history,
        })
    }

    /// The live settings this enforcer reads.
    pub fn settings(&self) -> &Arc<LivePolicySettings> {
        &self.settings
    }

    /// Checks `new_password` against every STIG rule.
    ///
    /// Returns `Ok(true)` when the password may be adopted, or a policy
    /// violation naming the first rule broken. `hashed_new_password` is
    /// compared against the user's recent history verifiers.
    pub async fn is_stig_compliant(
        &self,
        user: &UserAccount,
        new_password: &str,
        hashed_new_password: &str,
        current_password: &str,
    ) -> AppResult<bool> {
        self.is_stig_compliant_at(
            user,
            new_password,
            hashed_new_password,
            current_password,
            Utc::now(),
        )
        .await
    }

    /// Same as [`is_stig_compliant`](Self::is_stig_compliant) with an
    /// explicit current time.
    pub async fn is_stig_compliant_at(
        &self,
        user: &UserAccount,
        new_password: &str,
        hashed_new_password: &str,
        current_password: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        if !self.settings.stig_enabled() {
            debug!(user_id = %user.id, "STIG disabled, skipping password checks");
            return Ok(true);
        }

        let history = self.load_history(user).await;

        if !user.change_password && !self.has_admin_role(user).await {
            self.check_cooldown(&history, now)?;
        }

        self.validator.validate_strength(new_password)?;
        self.validator
            .validate_difference(new_password, current_password)?;
        self.check_reuse(&history, hashed_new_password)?;

        debug!(user_id = %user.id, "Password satisfies STIG policy");
        Ok(true)
    }

    /// Returns whether any role assigned to `user` carries the admin tag.
    ///
    /// A failed lookup counts as not admin.
    pub async fn has_admin_role(&self, user: &UserAccount) -> bool {
        match self.roles.roles(&user.id).await {
            Ok(roles) => roles.iter().any(|role| role.has_tag(RoleTag::Admin)),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Role lookup failed, treating user as non-admin");
                false
            }
        }
    }

    /// Expiry date of a password set at `time`.
    pub fn stig_expiry_password_date(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        calc_expiry_date(time, self.settings.expiry_days())
    }

    /// Expiry of a password set at `millis` since the epoch.
    pub fn stig_expiry_password_millis(&self, millis: i64) -> i64 {
        calc_expiry_millis(millis, self.settings.expiry_days())
    }

    /// Returns whether `user` must change their password now.
    pub fn is_password_expired(&self, user: &UserAccount) -> bool {
        self.is_password_expired_at(user, Utc::now())
    }

    /// Same as [`is_password_expired`](Self::is_password_expired) with an
    /// explicit current time.
    pub fn is_password_expired_at(&self, user: &UserAccount, now: DateTime<Utc>) -> bool {
        user.change_password || user.password_expiry.is_some_and(|expiry| now > expiry)
    }

    async fn load_history(&self, user: &UserAccount) -> Vec<PasswordChangeRecord> {
        match self.history.history(&user.id).await {
            Ok(mut records) => {
                records.sort_by(|a, b| b.last_changed.cmp(&a.last_changed));
                records
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "History lookup failed, treating history as empty");
                Vec::new()
            }
        }
    }

    fn check_cooldown(
        &self,
        history: &[PasswordChangeRecord],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let window_end = |changed: DateTime<Utc>| {
            changed
                .checked_add_signed(self.cooldown)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        };

        let Some(latest) = history
            .iter()
            .map(|record| record.last_changed)
            .filter(|changed| now < window_end(*changed))
            .max()
        else {
            return Ok(());
        };

        let remaining = (window_end(latest) - now).min(self.cooldown);
        let total_minutes = (remaining.num_seconds() + 59) / 60;
        Err(AppError::policy_violation(format!(
            "Password was changed less than {} hours ago. Try again in {} hours and {} minutes",
            self.cooldown.num_hours(),
            total_minutes / 60,
            total_minutes % 60
        )))
    }

    fn check_reuse(
        &self,
        history: &[PasswordChangeRecord],
        hashed_new_password: &str,
    ) -> Result<(), AppError> {
        if history
            .iter()
            .take(self.reuse_window)
            .any(|record| record.hashed_password == hashed_new_password)
        {
            return Err(AppError::policy_violation(format!(
                "Password matches one of the last {} passwords",
                self.reuse_window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use credential_core::types::{Role, UserId};

    use crate::memory::InMemoryDirectory;

    struct Unreachable;

    #[async_trait]
    impl RoleLookup for Unreachable {
        async fn roles(&self, _user_id: &UserId) -> AppResult<Vec<Role>> {
            Err(AppError::external_service("directory unreachable"))
        }
    }

    #[async_trait]
    impl PasswordHistoryStore for Unreachable {
        async fn history(&self, _user_id: &UserId) -> AppResult<Vec<PasswordChangeRecord>> {
            Err(AppError::external_service("directory unreachable"))
        }
    }

    const CURRENT: &str = "Gat3way#Pa5s";
    const CANDIDATE: &str = "Zulu9!Kilo";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn enforcer(directory: &InMemoryDirectory) -> PasswordPolicyEnforcer {
        PasswordPolicyEnforcer::new(
            &PolicyConfig::default(),
            Arc::new(LivePolicySettings::default()),
            Arc::new(directory.clone()),
            Arc::new(directory.clone()),
        )
        .unwrap()
    }

    async fn directory_with_history(user: &UserAccount, ages: &[Duration]) -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        for (i, age) in ages.iter().enumerate() {
            directory
                .record_change(PasswordChangeRecord::new(user.id, format!("hash-{i}"), now() - *age))
                .await;
        }
        directory
    }

    #[tokio::test]
    async fn test_compliant_password_accepted() {
        let user = UserAccount::new("alice");
        let directory = directory_with_history(&user, &[Duration::days(3)]).await;
        let result = enforcer(&directory)
            .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
            .await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn test_cooldown_rejects_recent_change() {
        let user = UserAccount::new("alice");
        let directory =
            directory_with_history(&user, &[Duration::hours(2) + Duration::minutes(30)]).await;
        let err = enforcer(&directory)
            .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.is_policy_violation());
        assert!(err.message.contains("21 hours and 30 minutes"), "{}", err.message);
    }

    #[tokio::test]
    async fn test_cooldown_checked_before_strength() {
        let user = UserAccount::new("alice");
        let directory = directory_with_history(&user, &[Duration::hours(1)]).await;
        let err = enforcer(&directory)
            .is_stig_compliant_at(&user, "weak", "hash-new", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("Try again"));
    }

    #[tokio::test]
    async fn test_cooldown_skipped_for_admin_and_forced_change() {
        let mut user = UserAccount::new("root");
        let directory = directory_with_history(&user, &[Duration::hours(1)]).await;
        let enforcer = enforcer(&directory);

        user.change_password = true;
        assert!(
            enforcer
                .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
                .await
                .unwrap()
        );

        user.change_password = false;
        directory
            .assign_role(user.id, Role::new("Administrator", vec![RoleTag::Admin]))
            .await;
        assert!(enforcer.has_admin_role(&user).await);
        assert!(
            enforcer
                .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_operator_role_does_not_skip_cooldown() {
        let user = UserAccount::new("ops");
        let directory = directory_with_history(&user, &[Duration::hours(1)]).await;
        directory
            .assign_role(
                user.id,
                Role::new("Operator", vec![RoleTag::Operator, RoleTag::Monitor]),
            )
            .await;
        let enforcer = enforcer(&directory);

        assert!(!enforcer.has_admin_role(&user).await);
        let err = enforcer
            .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("Try again"));
    }

    #[tokio::test]
    async fn test_difference_from_current() {
        let user = UserAccount::new("alice");
        let directory = InMemoryDirectory::new();
        let err = enforcer(&directory)
            .is_stig_compliant_at(&user, "Gat3way#Pa5z", "hash-new", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("differ"));
    }

    #[tokio::test]
    async fn test_reuse_window() {
        let user = UserAccount::new("alice");
        let ages: Vec<Duration> = (1..=12).map(Duration::days).collect();
        let directory = directory_with_history(&user, &ages).await;
        let enforcer = enforcer(&directory);

        let err = enforcer
            .is_stig_compliant_at(&user, CANDIDATE, "hash-9", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("last 10 passwords"));

        // Eleventh most recent entry is outside the window.
        assert!(
            enforcer
                .is_stig_compliant_at(&user, CANDIDATE, "hash-10", CURRENT, now())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_stig_disabled_bypasses_everything() {
        let user = UserAccount::new("alice");
        let directory = directory_with_history(&user, &[Duration::minutes(5)]).await;
        let enforcer = enforcer(&directory);
        enforcer.settings().set_stig_enabled("false");
        assert!(
            enforcer
                .is_stig_compliant_at(&user, "weak", "hash-0", "weak", now())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_lookup_failures_degrade_safely() {
        let user = UserAccount::new("alice");
        let unreachable = Arc::new(Unreachable);
        let enforcer = PasswordPolicyEnforcer::new(
            &PolicyConfig::default(),
            Arc::new(LivePolicySettings::default()),
            unreachable.clone(),
            unreachable,
        )
        .unwrap();
        assert!(!enforcer.has_admin_role(&user).await);
        assert!(
            enforcer
                .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_unrepresentable_cooldown_is_configuration_error() {
        let directory = InMemoryDirectory::new();
        for hours in [10_000_000_000_000, -1, i64::MAX] {
            let config = PolicyConfig {
                rotation_cooldown_hours: hours,
                ..PolicyConfig::default()
            };
            let err = PasswordPolicyEnforcer::new(
                &config,
                Arc::new(LivePolicySettings::default()),
                Arc::new(directory.clone()),
                Arc::new(directory.clone()),
            )
            .unwrap_err();
            assert!(err.is_hashing_error(), "{hours}");
            assert!(!err.is_policy_violation());
        }
    }

    #[tokio::test]
    async fn test_huge_cooldown_does_not_overflow() {
        let user = UserAccount::new("alice");
        let directory = directory_with_history(&user, &[Duration::hours(1)]).await;
        let config = PolicyConfig {
            rotation_cooldown_hours: 1_000_000_000_000,
            ..PolicyConfig::default()
        };
        let enforcer = PasswordPolicyEnforcer::new(
            &config,
            Arc::new(LivePolicySettings::default()),
            Arc::new(directory.clone()),
            Arc::new(directory),
        )
        .unwrap();

        let err = enforcer
            .is_stig_compliant_at(&user, CANDIDATE, "hash-new", CURRENT, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("Try again"));
    }

    #[test]
    fn test_expiry_follows_live_setting() {
        let directory = InMemoryDirectory::new();
        let enforcer = enforcer(&directory);
        assert_eq!(enforcer.stig_expiry_password_date(now()), now() + Duration::days(90));

        enforcer.settings().set_expiry_days("30");
        assert_eq!(enforcer.stig_expiry_password_date(now()), now() + Duration::days(30));
        assert_eq!(
            enforcer.stig_expiry_password_millis(now().timestamp_millis()),
            (now() + Duration::days(30)).timestamp_millis()
        );
    }

    #[test]
    fn test_password_expired() {
        let directory = InMemoryDirectory::new();
        let enforcer = enforcer(&directory);
        let mut user = UserAccount::new("alice");
        assert!(!enforcer.is_password_expired_at(&user, now()));

        user.password_expiry = Some(now());
        assert!(!enforcer.is_password_expired_at(&user, now()));
        assert!(enforcer.is_password_expired_at(&user, now() + Duration::seconds(1)));

        user.password_expiry = Some(now() + Duration::days(1));
        user.change_password = true;
        assert!(enforcer.is_password_expired_at(&user, now()));
    }
}
