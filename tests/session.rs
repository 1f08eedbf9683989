//! Sign-in, registration and sign-out through a session holder

use std::sync::{Arc, Mutex};

use pocket_tasks::{AuthError, MemoryAuth, Navigation, SessionHolder, UserFeedback};
use pocket_tasks::mock_behaviour::{MockBehaviour, Operation};


fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn register_sign_out_and_back_in() {
    init();
    let holder = SessionHolder::new(MemoryAuth::new());
    let mut changes = holder.subscribe();
    assert_eq!(holder.landing_route(), Navigation::Login);

    let registered = holder.sign_up("jane@example.com", "hunter22", "hunter22").await.unwrap();
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow(), Some(registered.clone()));
    assert_eq!(holder.landing_route(), Navigation::Home);

    holder.sign_out().await.unwrap();
    changes.changed().await.unwrap();
    assert!(changes.borrow().is_none());
    assert_eq!(holder.landing_route(), Navigation::Login);

    let signed_in = holder.sign_in("jane@example.com", "hunter22").await.unwrap();
    assert_eq!(signed_in.user_id(), registered.user_id());
    assert_eq!(holder.current(), Some(signed_in));
}

#[tokio::test]
async fn refused_attempts_change_nothing() {
    init();
    let holder = SessionHolder::new(MemoryAuth::new());

    assert_eq!(holder.sign_up("jane@example.com", "a", "b").await, Err(AuthError::PasswordMismatch));
    assert_eq!(holder.backend().n_accounts(), 0);

    assert!(matches!(holder.sign_in("jane@example.com", "a").await, Err(AuthError::InvalidCredentials(_))));
    assert_eq!(holder.current(), None);
    assert_eq!(holder.sign_out().await, Err(AuthError::NotSignedIn));
}

#[tokio::test]
async fn backend_outage() {
    init();
    let mut auth = MemoryAuth::new();
    auth.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::failing(Operation::SignUp, 0, 1)))));
    let holder = SessionHolder::new(auth);

    assert!(matches!(holder.sign_up("jane@example.com", "pw", "pw").await, Err(AuthError::Backend(_))));
    assert_eq!(holder.current(), None);
    match holder.take_feedback() {
        Some(UserFeedback::Alert{ title, .. }) => assert_eq!(title, "Registration Error"),
        other => panic!("Unexpected feedback {:?}", other),
    }
    assert!(holder.sign_up("jane@example.com", "pw", "pw").await.is_ok());
}
