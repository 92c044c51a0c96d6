//! Liveness and health endpoint tests.

use settlements_tests::create_test_client;

#[tokio::test]
async fn test_liveness() {
    let client = create_test_client().expect("Failed to create client");

    let message = client.liveness().await.expect("Liveness check failed");

    assert!(message.contains("/api/zq"));
    assert!(message.contains("/api/sr3"));
}

#[tokio::test]
async fn test_health_check() {
    let client = create_test_client().expect("Failed to create client");

    let health = client.health().await.expect("Health check failed");

    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}
