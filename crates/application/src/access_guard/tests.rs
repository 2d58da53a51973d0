use tasklane_core::AppError;

use crate::test_support::{FakeRbacStore, anonymous, assignment_service, guard, identity_of};

const CATALOG: [(&str, &str); 2] = [("role", "view_role"), ("user", "delete_user")];

#[tokio::test]
async fn anonymous_callers_are_unauthorized() {
    let store = FakeRbacStore::with_catalog(&CATALOG);
    let guard = guard(&store);

    assert!(matches!(
        guard.require_permission(&anonymous(), "view_role").await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        guard.require_any_role(&anonymous(), &["admin"]).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        guard.require_staff(&anonymous()),
        Err(AppError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let store = FakeRbacStore::with_catalog(&CATALOG);
    let erin = store.add_user("erin@tasklane.local", false, false).await;
    let guard = guard(&store);

    assert!(matches!(
        guard.require_permission(&erin, "view_role").await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn any_listed_role_passes() {
    let store = FakeRbacStore::with_catalog(&CATALOG);
    store.add_role("gestionnaire", &[]).await;
    store.add_role("admin", &[]).await;
    let frank = store.add_user("frank@tasklane.local", false, false).await;
    let _ = assignment_service(&store)
        .assign(identity_of(&frank).user_id(), "gestionnaire", None)
        .await;
    let guard = guard(&store);

    assert!(
        guard
            .require_any_role(&frank, &["admin", "gestionnaire"])
            .await
            .is_ok()
    );
    assert!(matches!(
        guard.require_any_role(&frank, &["admin"]).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn superuser_bypasses_role_requirement() {
    let store = FakeRbacStore::with_catalog(&CATALOG);
    let root = store.add_user("root@tasklane.local", true, false).await;
    let guard = guard(&store);

    assert!(guard.require_any_role(&root, &["admin"]).await.is_ok());
    assert!(!guard.authorization_service().user_has_role(&root, "admin").await);
}

#[tokio::test]
async fn staff_gate_checks_the_staff_flag() {
    let store = FakeRbacStore::with_catalog(&CATALOG);
    let staff = store.add_user("staff@tasklane.local", false, true).await;
    let member = store.add_user("member@tasklane.local", false, false).await;
    let guard = guard(&store);

    assert!(guard.require_staff(&staff).is_ok());
    assert!(matches!(
        guard.require_staff(&member),
        Err(AppError::Forbidden(_))
    ));
}
