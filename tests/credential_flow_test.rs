//! Integration tests for the password change flow.

mod helpers;

use chrono::{Duration, TimeZone, Utc};

use credential_core::types::{Role, RoleTag, UserAccount};

const CURRENT: &str = "Gat3way#Pa5s";
const CANDIDATE: &str = "Zulu9!Kilo";

#[tokio::test]
async fn test_change_password_end_to_end() {
    let ctx = helpers::TestContext::new();
    let user = UserAccount::new("operator");
    let set_at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
    let current_verifier = ctx.set_password(&user, CURRENT, set_at).await;

    let now = set_at + Duration::days(5);
    let candidate_verifier = ctx
        .pool
        .hash_password(CANDIDATE.as_bytes().to_vec())
        .await
        .unwrap();
    let compliant = ctx
        .enforcer
        .is_stig_compliant_at(&user, CANDIDATE, &candidate_verifier, CURRENT, now)
        .await
        .unwrap();
    assert!(compliant);

    assert!(
        ctx.pool
            .verify_password(CANDIDATE.as_bytes().to_vec(), candidate_verifier)
            .await
            .is_ok()
    );
    let err = ctx
        .pool
        .verify_password(CANDIDATE.as_bytes().to_vec(), current_verifier)
        .await
        .unwrap_err();
    assert!(err.is_incorrect_password());
    assert_eq!(err.to_string(), "INCORRECT_PASSWORD: Incorrect password");
}

#[tokio::test]
async fn test_second_change_within_a_day_is_rejected() {
    let ctx = helpers::TestContext::new();
    let user = UserAccount::new("operator");
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    ctx.set_password(&user, CURRENT, now - Duration::hours(6)).await;

    let err = ctx
        .enforcer
        .is_stig_compliant_at(&user, CANDIDATE, "$L7H$unused", CURRENT, now)
        .await
        .unwrap_err();
    assert!(err.is_policy_violation());
    assert!(err.message.contains("18 hours and 0 minutes"), "{}", err.message);

    ctx.directory
        .assign_role(user.id, Role::new("Administrator", vec![RoleTag::Admin]))
        .await;
    assert!(
        ctx.enforcer
            .is_stig_compliant_at(&user, CANDIDATE, "$L7H$unused", CURRENT, now)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_reused_verifier_is_rejected() {
    let ctx = helpers::TestContext::new();
    let user = UserAccount::new("operator");
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let old = ctx
        .set_password(&user, CANDIDATE, now - Duration::days(40))
        .await;
    ctx.set_password(&user, CURRENT, now - Duration::days(20)).await;

    let err = ctx
        .enforcer
        .is_stig_compliant_at(&user, CANDIDATE, &old, CURRENT, now)
        .await
        .unwrap_err();
    assert!(err.message.contains("last 10 passwords"));
}

#[tokio::test]
async fn test_expiry_of_new_password() {
    let ctx = helpers::TestContext::new();
    let mut user = UserAccount::new("operator");
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    user.password_expiry = Some(ctx.enforcer.stig_expiry_password_date(now));
    assert_eq!(user.password_expiry, Some(now + Duration::days(90)));
    assert!(!ctx.enforcer.is_password_expired_at(&user, now + Duration::days(90)));
    assert!(
        ctx.enforcer
            .is_password_expired_at(&user, now + Duration::days(90) + Duration::milliseconds(1))
    );
}
