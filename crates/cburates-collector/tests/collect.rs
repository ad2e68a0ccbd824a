//! Integration tests for `collect_rates` against a wiremock rate archive.
//!
//! Every request the archive does not explicitly mock gets wiremock's default
//! 404, which the collector reads as a day without data.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cburates_collector::{collect_rates, CollectorError, RateArchiveClient};

fn test_client(base_url: &str) -> RateArchiveClient {
    RateArchiveClient::with_base_url(base_url, "USD", 5, "cburates-test/0.1")
        .expect("failed to build test client")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn usd_rate(rate: &str, day: &str) -> serde_json::Value {
    json!({
        "id": 69,
        "Code": "840",
        "Ccy": "USD",
        "Nominal": "1",
        "Rate": rate,
        "Date": day
    })
}

#[tokio::test]
async fn single_object_day_writes_one_row_and_skips_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/USD/2025-1-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(usd_rate("12650.50", "02.01.2025")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    let summary = collect_rates(&client, date(2025, 1, 1), date(2025, 1, 5), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.written_rows, 1);
    assert_eq!(summary.skipped_days, 4);
    assert_eq!(summary.failed_days, 0);
    assert_eq!(summary.start_date, date(2025, 1, 1));
    assert_eq!(summary.end_date, date(2025, 1, 5));
    assert_eq!(summary.output_file, output.display().to_string());

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "id,Code,Ccy,Nominal,Rate,Date\n69,840,USD,1,12650.50,02.01.2025\n"
    );
}

#[tokio::test]
async fn http_errors_count_as_skipped_not_failed() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    let summary = collect_rates(&client, date(2024, 6, 1), date(2024, 6, 3), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.written_rows, 0);
    assert_eq!(summary.skipped_days, 3);
    assert_eq!(summary.failed_days, 0);
    assert!(!output.exists(), "nothing written means no file");
}

#[tokio::test]
async fn connection_errors_count_as_failed() {
    // Bind then drop a listener to get a local port nothing is serving.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&format!("http://127.0.0.1:{port}/"));

    let summary = collect_rates(&client, date(2024, 6, 1), date(2024, 6, 4), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.written_rows, 0);
    assert_eq!(summary.skipped_days, 0);
    assert_eq!(summary.failed_days, 4);
}

#[tokio::test]
async fn slow_responses_past_the_timeout_count_as_failed() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(usd_rate("1", "01.01.2024"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = RateArchiveClient::with_base_url(&server.uri(), "USD", 1, "cburates-test/0.1")
        .expect("client");

    let summary = collect_rates(&client, date(2024, 1, 1), date(2024, 1, 1), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.failed_days, 1);
    assert_eq!(summary.written_rows, 0);
}

#[tokio::test]
async fn inverted_range_fails_without_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    let result = collect_rates(&client, date(2025, 1, 5), date(2025, 1, 1), &output).await;

    match result {
        Err(err @ CollectorError::InvalidRange(_)) => {
            assert_eq!(
                err.to_string(),
                "end_date must not be earlier than start_date"
            );
        }
        other => panic!("expected InvalidRange, got {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn schema_is_fixed_by_first_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/USD/2024-3-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Ccy": "USD", "Rate": "12500.00", "Date": "01.03.2024"},
            {"Ccy": "USD", "Rate": "12501.00", "Date": "01.03.2024"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/USD/2024-3-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/USD/2024-3-3/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Rate": "12502.00", "Diff": "1.00"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out").join("usd_rates.csv");
    let client = test_client(&server.uri());

    let summary = collect_rates(&client, date(2024, 3, 1), date(2024, 3, 3), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.written_rows, 3);
    assert_eq!(summary.skipped_days, 1);
    assert_eq!(summary.failed_days, 0);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "Ccy,Rate,Date\n\
         USD,12500.00,01.03.2024\n\
         USD,12501.00,01.03.2024\n\
         ,12502.00,\n"
    );
}

#[tokio::test]
async fn rerun_appends_duplicates_without_second_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/USD/2025-1-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(usd_rate("12650.50", "02.01.2025")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    for _ in 0..2 {
        collect_rates(&client, date(2025, 1, 2), date(2025, 1, 2), &output)
            .await
            .expect("run should succeed");
    }

    let written = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id,Code,Ccy,Nominal,Rate,Date",
            "69,840,USD,1,12650.50,02.01.2025",
            "69,840,USD,1,12650.50,02.01.2025",
        ]
    );
}

#[tokio::test]
async fn days_are_requested_once_each_in_order() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    collect_rates(&client, date(2023, 12, 30), date(2024, 1, 2), &output)
        .await
        .expect("run should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/USD/2023-12-30/",
            "/USD/2023-12-31/",
            "/USD/2024-1-1/",
            "/USD/2024-1-2/",
        ]
    );
}

#[tokio::test]
async fn fieldless_first_success_does_not_fix_an_empty_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/USD/2025-1-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/USD/2025-1-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Ccy": "USD", "Rate": "1"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("usd_rates.csv");
    let client = test_client(&server.uri());

    let summary = collect_rates(&client, date(2025, 1, 1), date(2025, 1, 2), &output)
        .await
        .expect("run should succeed");

    assert_eq!(summary.written_rows, 1);
    assert_eq!(summary.skipped_days, 1);
    assert_eq!(summary.failed_days, 0);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "Ccy,Rate\nUSD,1\n");
}
