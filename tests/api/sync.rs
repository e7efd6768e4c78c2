use std::{num::NonZeroUsize, time::Duration};

use claim::assert_err;
use guest_sync::{
    domain::{GuestRecord, NewSubscriber},
    sync::{Enrollment, Synchronizer},
    NewsletterClient, NewsletterConfig,
};
use reqwest::StatusCode;
use secrecy::Secret;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApi, BASIC_AUTH};

fn subscriber(first_name: &str, last_name: &str, email: &str) -> NewSubscriber {
    GuestRecord::new(first_name, last_name, email)
        .try_into()
        .expect("test guest has an invalid email")
}

#[tokio::test]
async fn enrolled_guest_is_not_created_again() {
    let api = TestApi::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/subscribers/john@x.com"))
        .and(header("Authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&api.server)
        .await;

    let outcome = api
        .synchronizer()
        .enroll(&subscriber("John", "Doe", "john@x.com"))
        .await;

    assert_eq!(outcome, Enrollment::AlreadyEnrolled);
}

#[tokio::test]
async fn unknown_guest_is_created_as_a_confirmed_subscriber() {
    let api = TestApi::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/subscribers/john@x.com"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/john@x.com"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_json(serde_json::json!({
            "email": "john@x.com",
            "first_name": "John",
            "last_name": "Doe",
            "lists": [{ "id": 1, "value": 1 }],
            "status": "confirmed",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&api.server)
        .await;

    let outcome = api
        .synchronizer()
        .enroll(&subscriber("John", "Doe", "john@x.com"))
        .await;

    assert_eq!(outcome, Enrollment::Enrolled);
}

#[tokio::test]
async fn any_lookup_status_other_than_200_means_not_enrolled() {
    let api = TestApi::spawn().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&api.server)
        .await;

    let outcome = api
        .synchronizer()
        .enroll(&subscriber("Ann", "Lee", "ann@x.com"))
        .await;

    assert_eq!(outcome, Enrollment::Enrolled);
}

#[tokio::test]
async fn rejected_creation_is_reported_without_retrying() {
    let api = TestApi::spawn().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid email."))
        .expect(1)
        .mount(&api.server)
        .await;

    let outcome = api
        .synchronizer()
        .enroll(&subscriber("Ann", "Lee", "ann@x.com"))
        .await;

    assert_eq!(
        outcome,
        Enrollment::Rejected {
            status: StatusCode::BAD_REQUEST
        }
    );
}

#[tokio::test]
async fn unreachable_api_fails_only_that_guest() {
    crate::helpers::init_tracing();
    let client = NewsletterClient::new(NewsletterConfig {
        base_url: "http://127.0.0.1:1/api/".to_string(),
        username: "newsletter-user".to_string(),
        password: Secret::new("newsletter-pass".to_string()),
    })
    .unwrap();

    let outcome = Synchronizer::new(client)
        .enroll(&subscriber("Ann", "Lee", "ann@x.com"))
        .await;

    assert_eq!(outcome, Enrollment::Failed);
}

#[tokio::test]
async fn duplicates_are_enrolled_independently_and_invalid_emails_are_skipped() {
    let api = TestApi::spawn().await;
    let report = "\
Ann,Lee,ann@x.com
Ann,Lee,ann@x.com
Bad,Guest,bad!guest@x.com
Cy,Young,cy@x.com
";

    Mock::given(method("GET"))
        .and(path("/api/subscribers/ann@x.com"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/ann@x.com"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscribers/cy@x.com"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/cy@x.com"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(path("/api/subscribers/bad!guest@x.com"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&api.server)
        .await;

    api.synchronizer().sync_report(report.as_bytes()).await;

    let requests = api.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn malformed_rows_issue_no_requests() {
    let api = TestApi::spawn().await;
    let report = "\
First Name,Last Name,Email
John,Doe
Jane,Roe,no-at-sign
  Jo , Ann ,  jo@x.com
";

    Mock::given(method("GET"))
        .and(path("/api/subscribers/jo@x.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&api.server)
        .await;

    api.synchronizer().sync_report(report.as_bytes()).await;

    let requests = api.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn one_failed_enrollment_does_not_stop_the_others() {
    let api = TestApi::spawn().await;
    let report = "\
Ann,Lee,ann@x.com
Bob,Ray,bob@x.com
Cy,Young,cy@x.com
";

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/bob@x.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/ann@x.com"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/subscribers/cy@x.com"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&api.server)
        .await;

    api.synchronizer().sync_report(report.as_bytes()).await;
}

#[tokio::test]
async fn enrollments_are_limited_to_the_concurrency_bound() {
    let api = TestApi::spawn().await;
    let report: String = (0..6)
        .map(|i| format!("Guest,{i},guest{i}@x.com\n"))
        .collect();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .expect(6)
        .mount(&api.server)
        .await;

    let started = std::time::Instant::now();
    api.synchronizer()
        .with_max_concurrency(NonZeroUsize::new(2).unwrap())
        .sync_report(report.as_bytes())
        .await;

    // three waves of two lookups each
    assert!(
        started.elapsed() >= Duration::from_millis(300),
        "finished in {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn missing_report_is_an_error() {
    let api = TestApi::spawn().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api.server)
        .await;

    let result = api
        .synchronizer()
        .sync_file(&api.scratch.path().join("guest-information-report.csv"))
        .await;

    assert_err!(result);
}
