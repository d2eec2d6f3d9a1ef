use chrono::{Duration, Utc};

use carlot_api::error::ApiError;
use carlot_api::usecase::identity::{ListUsersUseCase, PromoteAdminUseCase};
use carlot_api::usecase::login::{
    RequestLoginInput, RequestLoginUseCase, VerifyLoginInput, VerifyLoginUseCase,
};
use carlot_domain::user::UserRole;
use carlot_testing::auth::test_token_service;

use crate::helpers::{
    MockCodeRepo, MockIdentityRepo, MockNotifier, TEST_EMAIL, test_code, test_identity,
};

fn request_uc(
    identities: &MockIdentityRepo,
    codes: &MockCodeRepo,
    notifier: &MockNotifier,
) -> RequestLoginUseCase<MockIdentityRepo, MockCodeRepo, MockNotifier> {
    RequestLoginUseCase {
        identities: identities.clone(),
        codes: codes.clone(),
        notifier: notifier.clone(),
        code_ttl: Duration::minutes(15),
    }
}

fn verify_uc(
    identities: &MockIdentityRepo,
    codes: &MockCodeRepo,
) -> VerifyLoginUseCase<MockIdentityRepo, MockCodeRepo> {
    VerifyLoginUseCase {
        identities: identities.clone(),
        codes: codes.clone(),
        tokens: test_token_service(),
    }
}

fn login(email: &str) -> RequestLoginInput {
    RequestLoginInput {
        email: email.to_owned(),
    }
}

fn verify(email: &str, code: &str) -> VerifyLoginInput {
    VerifyLoginInput {
        email: email.to_owned(),
        code: code.to_owned(),
    }
}

// ── RequestLogin ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_single_identity_with_user_role_on_repeated_requests() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();
    let uc = request_uc(&identities, &codes, &notifier);

    uc.execute(login(TEST_EMAIL)).await.unwrap();
    uc.execute(login(TEST_EMAIL)).await.unwrap();

    let all = identities.snapshot();
    assert_eq!(all.len(), 1, "expected exactly one identity");
    assert_eq!(all[0].role, UserRole::User);
    // Earlier codes are kept until a successful verify.
    assert_eq!(codes.snapshot().len(), 2);
}

#[tokio::test]
async fn should_not_downgrade_existing_admin() {
    let identities = MockIdentityRepo::new(vec![test_identity(7, UserRole::Admin)]);
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();

    request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await
        .unwrap();

    assert_eq!(identities.snapshot()[0].role, UserRole::Admin);
    assert_eq!(codes.snapshot()[0].user_id, 7);
}

#[tokio::test]
async fn should_store_six_digit_code_expiring_in_fifteen_minutes() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();

    let before = Utc::now();
    request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await
        .unwrap();
    let after = Utc::now();

    let stored = codes.snapshot();
    assert_eq!(stored.len(), 1);
    let code = &stored[0];
    assert_eq!(code.code.len(), 6);
    assert!(code.code.bytes().all(|b| b.is_ascii_digit()));
    assert!(code.expires_at >= before + Duration::minutes(15));
    assert!(code.expires_at <= after + Duration::minutes(15));

    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![(TEST_EMAIL.to_owned(), code.code.clone())]);
}

#[tokio::test]
async fn should_keep_code_when_delivery_fails() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::failing();

    let result = request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await;

    assert!(
        matches!(result, Err(ApiError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
    assert_eq!(codes.snapshot().len(), 1, "code should stay persisted");
}

#[tokio::test]
async fn should_return_store_error_when_upsert_fails() {
    let identities = MockIdentityRepo::failing_upsert();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();

    let result = request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "STORE_ERROR");
    assert!(codes.snapshot().is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty(), "nothing should be sent");
}

#[tokio::test]
async fn should_return_store_error_when_code_insert_fails() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::failing_insert();
    let notifier = MockNotifier::new();

    let result = request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await;

    assert!(
        matches!(result, Err(ApiError::Store(_))),
        "expected Store, got {result:?}"
    );
    assert!(notifier.sent.lock().unwrap().is_empty(), "nothing should be sent");
}

#[tokio::test]
async fn should_fail_without_panicking_when_code_ttl_overflows() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();
    let uc = RequestLoginUseCase {
        code_ttl: Duration::MAX,
        ..request_uc(&identities, &codes, &notifier)
    };

    let result = uc.execute(login(TEST_EMAIL)).await;

    assert!(
        matches!(result, Err(ApiError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    assert!(codes.snapshot().is_empty());
}

// ── VerifyLogin ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_user_token_once_for_fresh_code() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();
    let notifier = MockNotifier::new();

    request_uc(&identities, &codes, &notifier)
        .execute(login(TEST_EMAIL))
        .await
        .unwrap();
    let code = notifier.last_code().unwrap();

    let uc = verify_uc(&identities, &codes);
    let output = uc.execute(verify(TEST_EMAIL, &code)).await.unwrap();

    let claims = test_token_service().validate(&output.token).unwrap();
    assert_eq!(claims.sub, output.user_id.to_string());
    assert_eq!(claims.role, "user");
    assert!(codes.snapshot().is_empty(), "codes should be consumed");

    let second = uc.execute(verify(TEST_EMAIL, &code)).await;
    assert!(
        matches!(second, Err(ApiError::InvalidCode)),
        "expected InvalidCode on reuse, got {second:?}"
    );
}

#[tokio::test]
async fn should_carry_admin_role_into_token() {
    let now = Utc::now();
    let identities = MockIdentityRepo::new(vec![test_identity(3, UserRole::Admin)]);
    let codes = MockCodeRepo::with_codes(vec![test_code(1, 3, "424242", now)]);

    let output = verify_uc(&identities, &codes)
        .execute(verify(TEST_EMAIL, "424242"))
        .await
        .unwrap();

    let claims = test_token_service().validate(&output.token).unwrap();
    assert_eq!(claims.role, "admin");
    assert_eq!(claims.sub, "3");
}

#[tokio::test]
async fn should_reject_superseded_code_even_when_it_matches() {
    let now = Utc::now();
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);
    let codes = MockCodeRepo::with_codes(vec![
        test_code(1, 1, "111111", now - Duration::minutes(2)),
        test_code(2, 1, "222222", now - Duration::minutes(1)),
    ]);

    let result = verify_uc(&identities, &codes)
        .execute(verify(TEST_EMAIL, "111111"))
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidCode)),
        "expected InvalidCode, got {result:?}"
    );
    assert_eq!(codes.snapshot().len(), 2, "failed verify must not delete");
}

#[tokio::test]
async fn should_break_issuance_ties_by_id() {
    let now = Utc::now();
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);
    let codes = MockCodeRepo::with_codes(vec![
        test_code(1, 1, "111111", now),
        test_code(2, 1, "222222", now),
    ]);
    let uc = verify_uc(&identities, &codes);

    assert!(matches!(
        uc.execute(verify(TEST_EMAIL, "111111")).await,
        Err(ApiError::InvalidCode)
    ));
    assert!(uc.execute(verify(TEST_EMAIL, "222222")).await.is_ok());
}

#[tokio::test]
async fn should_return_invalid_code_when_none_issued() {
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);
    let codes = MockCodeRepo::empty();

    let result = verify_uc(&identities, &codes)
        .execute(verify(TEST_EMAIL, "000000"))
        .await;

    assert!(matches!(result, Err(ApiError::InvalidCode)));
}

#[tokio::test]
async fn should_return_expired_code_after_window() {
    let issued = Utc::now() - Duration::minutes(16);
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);
    let codes = MockCodeRepo::with_codes(vec![test_code(1, 1, "123456", issued)]);

    let result = verify_uc(&identities, &codes)
        .execute(verify(TEST_EMAIL, "123456"))
        .await;

    assert!(
        matches!(result, Err(ApiError::ExpiredCode)),
        "expected ExpiredCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_email_without_creating_it() {
    let identities = MockIdentityRepo::empty();
    let codes = MockCodeRepo::empty();

    let result = verify_uc(&identities, &codes)
        .execute(verify("nobody@example.com", "123456"))
        .await;

    assert!(matches!(result, Err(ApiError::UserNotFound)));
    assert!(identities.snapshot().is_empty());
}

#[tokio::test]
async fn should_grant_session_when_code_cleanup_fails() {
    let now = Utc::now();
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);
    let codes = MockCodeRepo::failing_delete(vec![test_code(1, 1, "654321", now)]);

    let output = verify_uc(&identities, &codes)
        .execute(verify(TEST_EMAIL, "654321"))
        .await
        .unwrap();

    assert_eq!(output.user_id, 1);
    assert!(test_token_service().validate(&output.token).is_ok());
}

// ── PromoteAdmin ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_promote_existing_user() {
    let identities = MockIdentityRepo::new(vec![test_identity(1, UserRole::User)]);

    PromoteAdminUseCase {
        identities: identities.clone(),
    }
    .execute(TEST_EMAIL)
    .await
    .unwrap();

    assert_eq!(identities.snapshot()[0].role, UserRole::Admin);
}

#[tokio::test]
async fn should_fail_promotion_for_unknown_user() {
    let result = PromoteAdminUseCase {
        identities: MockIdentityRepo::empty(),
    }
    .execute("ghost@example.com")
    .await;

    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_list_users_in_id_order() {
    let mut second = test_identity(2, UserRole::Admin);
    second.email = "boss@example.com".to_owned();
    let identities = MockIdentityRepo::new(vec![second, test_identity(1, UserRole::User)]);

    let users = ListUsersUseCase { identities }.execute().await.unwrap();

    let rows: Vec<(i32, UserRole)> = users.iter().map(|u| (u.id, u.role)).collect();
    assert_eq!(rows, vec![(1, UserRole::User), (2, UserRole::Admin)]);
}
