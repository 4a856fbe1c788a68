//! Session lifecycle: login, registration, logout, boot-time restore.

use secrecy::SecretString;
use serde_json::json;
use shoppro_client::{AppError, PageId, PageParams};
use shoppro_core::Role;
use shoppro_integration_tests::{
    cart_json, empty_cart_json, fail, harness, ok, product_json, sign_in_as, user_json,
};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_hydrates_session_and_cart() {
    let h = harness();

    h.bridge
        .enqueue("login", &ok(&json!({"user": user_json("u-1", "ada@shoppro.fr", Role::Client)})));
    let lamp = product_json("p-1", "Lamp", "10.00", 5);
    h.bridge.respond("get_cart", &ok(&cart_json(&[(lamp, 1)])));

    let password = SecretString::from("hunter2");
    let user = h
        .app
        .session()
        .login("ada@shoppro.fr", &password)
        .await
        .expect("login");

    assert_eq!(user.email, "ada@shoppro.fr");
    assert_eq!(h.app.state().current_user().map(|u| u.id), Some(user.id));
    // The persisted cart came back with the session.
    assert_eq!(h.app.state().cart().count, 1);
    assert!(h.notifier.contains("Signed in"));
}

#[tokio::test]
async fn test_failed_login_surfaces_message_and_leaves_guest() {
    let h = harness();
    h.bridge.enqueue("login", &fail("Email ou mot de passe incorrect"));

    let password = SecretString::from("wrong");
    let err = h
        .app
        .session()
        .login("ada@shoppro.fr", &password)
        .await
        .expect_err("bad credentials");

    assert!(matches!(err, AppError::Call(_)));
    assert!(h.notifier.contains("Email ou mot de passe incorrect"));
    assert!(h.app.state().current_user().is_none());
}

#[tokio::test]
async fn test_login_home_depends_on_role() {
    for (role, home) in [
        (Role::Client, PageId::Shop),
        (Role::Seller, PageId::SellerDashboard),
        (Role::Admin, PageId::AdminDashboard),
    ] {
        let h = harness();
        sign_in_as(&h, role).await;

        let user = h.app.state().current_user().expect("signed in");
        let destination = PageId::home_for(user.role);
        assert_eq!(destination, home);

        h.app
            .router()
            .navigate(destination, PageParams::new())
            .await
            .expect("navigate home");
        assert_eq!(h.app.state().current_page(), home);
    }
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_registration_authenticates_immediately() {
    let h = harness();
    h.bridge.enqueue(
        "register",
        &ok(&json!({"user": user_json("u-9", "new@shoppro.fr", Role::Client)})),
    );

    let new_user = shoppro_client::models::NewUser {
        email: "new@shoppro.fr".to_owned(),
        password: SecretString::from("hunter2"),
        firstname: "Test".to_owned(),
        lastname: "User".to_owned(),
        role: Role::Client,
    };
    let user = h.app.session().register(&new_user).await.expect("register");

    assert_eq!(user.email, "new@shoppro.fr");
    assert!(h.app.state().current_user().is_some());
    assert!(h.notifier.contains("Account created"));
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_tears_down_locally() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;
    h.bridge.respond("logout", &ok(&json!({})));

    h.app.session().logout().await.expect("logout");

    assert!(h.app.state().current_user().is_none());
    assert_eq!(h.app.state().cart().count, 0);
    assert_eq!(h.app.state().current_page(), PageId::Landing);
    assert!(h.notifier.contains("Signed out"));
}

#[tokio::test]
async fn test_logout_proceeds_when_backend_unreachable() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;
    // No scripted "logout" response: the call fails as a transport error.

    h.app.session().logout().await.expect("logout is best-effort");

    assert!(h.app.state().current_user().is_none());
    assert_eq!(h.app.state().current_page(), PageId::Landing);
}

// =============================================================================
// Boot
// =============================================================================

#[tokio::test]
async fn test_boot_restores_session_and_lands() {
    let h = harness();
    h.bridge.respond(
        "get_current_user",
        &ok(&json!({"user": user_json("u-1", "ada@shoppro.fr", Role::Client)})),
    );
    h.bridge.respond("get_cart", &ok(&empty_cart_json()));
    h.bridge
        .respond("get_categories", &ok(&json!({"categories": ["Maison", "Jardin"]})));

    h.app.boot().await.expect("boot");

    assert!(h.app.state().current_user().is_some());
    assert_eq!(h.app.state().catalog().categories, vec!["Maison", "Jardin"]);
    assert_eq!(h.app.state().current_page(), PageId::Landing);
}

#[tokio::test]
async fn test_boot_degrades_to_guest_on_cold_backend() {
    let h = harness();
    // Nothing scripted at all: restore and preload both fail.

    h.app.boot().await.expect("boot still lands");

    assert!(h.app.state().current_user().is_none());
    assert!(h.app.state().catalog().categories.is_empty());
    assert_eq!(h.app.state().current_page(), PageId::Landing);
}

#[tokio::test]
async fn test_boot_without_stored_session_stays_guest() {
    let h = harness();
    h.bridge.respond("get_current_user", &ok(&json!({"user": null})));
    h.bridge.respond("get_categories", &ok(&json!({"categories": []})));

    h.app.boot().await.expect("boot");

    assert!(h.app.state().current_user().is_none());
    assert_eq!(h.bridge.calls_to("get_cart"), 0);
}
