//! End-to-end tests for the ghdeploy binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_server() -> (Runtime, MockServer) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn ghdeploy() -> Command {
    let mut cmd = Command::cargo_bin("ghdeploy").unwrap();
    // Keep the test hermetic against the caller's environment.
    cmd.env_remove("GITHUB_TOKEN").env_remove("GHDEPLOY_API_URL");
    cmd
}

#[test]
fn help_prints_usage() {
    ghdeploy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("list-deployments"))
        .stdout(predicate::str::contains("create-deployment-status"));
}

#[test]
fn no_subcommand_prints_usage_and_succeeds() {
    ghdeploy()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_prints_usage_and_succeeds() {
    // No server is running, so success also proves nothing was requested.
    ghdeploy()
        .arg("squash-deployments")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_token_is_reported_before_any_request() {
    ghdeploy()
        .args(["get-deployment", "--owner", "o", "--repo", "r", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));
}

#[test]
fn get_deployment_prints_the_decoded_record() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/o/r/deployments/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 42, "sha": "abc"})),
            )
            .mount(&server),
    );

    ghdeploy()
        .args([
            "get-deployment",
            "--owner",
            "o",
            "--repo",
            "r",
            "--id",
            "42",
            "--token",
            "t",
            "--api-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout("{\"id\":42,\"sha\":\"abc\"}\n");
}

#[test]
fn remote_error_status_fails_with_code_and_body() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/o/r/deployments/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server),
    );

    ghdeploy()
        .args([
            "get-deployment",
            "--owner",
            "o",
            "--repo",
            "r",
            "--id",
            "42",
            "--token",
            "t",
            "--api-url",
            &server.uri(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404").and(predicate::str::contains("Not Found")));
}

#[test]
fn create_deployment_sends_only_the_ref() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/o/r/deployments"))
            .and(body_json(json!({"ref": "main"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 7, "ref": "main"})),
            )
            .expect(1)
            .mount(&server),
    );

    ghdeploy()
        .args([
            "create-deployment",
            "--owner",
            "o",
            "--repo",
            "r",
            "--ref",
            "main",
            "--token",
            "t",
            "--api-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout("{\"id\":7,\"ref\":\"main\"}\n");
}

#[test]
fn create_deployment_status_accepts_a_known_state() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/o/r/deployments/7/statuses"))
            .and(body_json(json!({"state": "queued"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 1, "state": "queued"})),
            )
            .expect(1)
            .mount(&server),
    );

    ghdeploy()
        .args([
            "create-deployment-status",
            "--owner",
            "o",
            "--repo",
            "r",
            "--id",
            "7",
            "--state",
            "queued",
            "--token",
            "t",
            "--api-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout("{\"id\":1,\"state\":\"queued\"}\n");
}

#[test]
fn create_deployment_status_rejects_an_unknown_state() {
    ghdeploy()
        .args([
            "create-deployment-status",
            "--owner",
            "o",
            "--repo",
            "r",
            "--id",
            "7",
            "--state",
            "shipped",
            "--token",
            "t",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown deployment state"));
}
