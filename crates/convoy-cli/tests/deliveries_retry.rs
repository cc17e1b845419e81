//! Integration tests for delivery listing, attempts, and the retry flows.


use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{
    attempt, can_bind_localhost, delivery, envelope, envelope_error, page, temp_convoy_home,
    write_session,
};
use predicates::prelude::*;
use wiremock::matchers::{body_json_string, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_deliveries_list_with_status_filter() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eventdeliveries"))
        .and(query_param("status", "Failure"))
        .respond_with(envelope(
            "deliveries fetched",
            page(
                vec![delivery("del-9", "Failure", "2024-02-01T12:00:00Z")],
                1,
                None,
                1,
            ),
        ))
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "list", "--status", "failure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01 Feb, 2024"))
        .stdout(predicate::str::contains("del-9"));
}

#[tokio::test]
async fn test_delivery_show_detail() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eventdeliveries/del-1"))
        .and(query_param("groupID", "project-1"))
        .respond_with(envelope(
            "delivery fetched",
            delivery("del-1", "Retry", "2024-01-05T10:00:00Z"),
        ))
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "show", "del-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("delivery del-1"))
        .stdout(predicate::str::contains("status: Retry"))
        .stdout(predicate::str::contains("num_trials"));
}

#[tokio::test]
async fn test_attempts_shows_only_latest() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eventdeliveries/del-1/deliveryattempts"))
        .respond_with(envelope(
            "attempts fetched",
            serde_json::json!([
                attempt("att-1", "500", "2024-01-05T10:00:00Z"),
                attempt("att-2", "500", "2024-01-05T10:05:00Z"),
                attempt("att-3", "200", "2024-01-05T10:10:00Z"),
            ]),
        ))
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "attempts", "del-1"])
        .assert()
        .success()
        // Only the most recent attempt is shown.
        .stdout(predicate::str::contains("att-3"))
        .stdout(predicate::str::contains("att-1").not())
        .stdout(predicate::str::contains("att-2").not());
}

#[tokio::test]
async fn test_attempts_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eventdeliveries/del-1/deliveryattempts"))
        .respond_with(envelope("attempts fetched", serde_json::json!([])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "attempts", "del-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no attempts yet"));
}

#[tokio::test]
async fn test_retry_success_refetches_once() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/eventdeliveries/del-1/resend"))
        .and(header_exists("Idempotency-Key"))
        .respond_with(envelope("Delivery resent", serde_json::json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    // Success triggers exactly one refetch of the current page/filter.
    Mock::given(method("GET"))
        .and(path("/eventdeliveries"))
        .and(query_param("page", "1"))
        .respond_with(envelope(
            "deliveries fetched",
            page(
                vec![delivery("del-1", "Scheduled", "2024-01-05T10:00:00Z")],
                1,
                None,
                1,
            ),
        ))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "retry", "del-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delivery resent"))
        .stdout(predicate::str::contains("Scheduled"));
}

#[tokio::test]
async fn test_retry_failure_does_not_refetch() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/eventdeliveries/del-1/resend"))
        .respond_with(envelope_error("delivery already discarded"))
        .expect(1)
        .mount(&server)
        .await;
    // Zero refetches on failure.
    Mock::given(method("GET"))
        .and(path("/eventdeliveries"))
        .respond_with(envelope("deliveries fetched", page(vec![], 1, None, 0)))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "retry", "del-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("delivery already discarded"));
}

#[tokio::test]
async fn test_batch_retry_posts_ids() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_convoy_home();
    write_session(&home, "tok-1", "project-1");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/eventdeliveries/batchretry"))
        .and(header_exists("Idempotency-Key"))
        .and(body_json_string(r#"{"ids":["del-1","del-2"]}"#))
        .respond_with(envelope("2 deliveries retried", serde_json::json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/eventdeliveries"))
        .respond_with(envelope("deliveries fetched", page(vec![], 1, None, 0)))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("convoy")
        .env("CONVOY_HOME", home.path())
        .env("CONVOY_BASE_URL", server.uri())
        .args(["deliveries", "batch-retry", "del-1", "del-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 deliveries retried"));
}
