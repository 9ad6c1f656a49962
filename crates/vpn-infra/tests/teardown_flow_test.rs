//! Disconnect flow: teardown ordering, duplicate cleanup, failure
//! boundaries.

use do_api::DoClient;
use tailscale_api::TailscaleClient;
use vpn_infra::{DisconnectOutcome, teardown_nodes};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn droplet_json(id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "status": "active",
        "created_at": "2026-01-01T00:00:00Z",
        "region": { "slug": "nyc1", "name": "New York 1" },
        "tags": ["vpn-manager"],
    })
}

fn device_json(id: &str, hostname: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "hostname": hostname,
        "name": format!("{hostname}.example.com"),
        "enabledRoutes": ["0.0.0.0/0", "::/0"],
        "advertisedRoutes": ["0.0.0.0/0", "::/0"],
    })
}

#[tokio::test]
async fn no_tagged_droplets_is_an_informational_noop() {
    let compute_server = MockServer::start().await;
    let mesh_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "droplets": [] })),
        )
        .mount(&compute_server)
        .await;

    let compute = DoClient::with_base_url("tok", compute_server.uri());
    let mesh = TailscaleClient::with_base_url("key", mesh_server.uri());

    let outcome = teardown_nodes(&compute, &mesh, "example.com").await.unwrap();
    assert!(matches!(outcome, DisconnectOutcome::NoNodes));

    // Nothing was deleted anywhere.
    assert!(mesh_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn removes_all_devices_matching_case_insensitively() {
    let compute_server = MockServer::start().await;
    let mesh_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "droplets": [droplet_json(1, "NYC1-VPN")]
        })))
        .mount(&compute_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/droplets/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&compute_server)
        .await;

    // Two stale registrations under the lowercased hostname plus one
    // unrelated device.
    Mock::given(method("GET"))
        .and(path("/tailnet/example.com/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "devices": [
                device_json("dev-1", "nyc1-vpn"),
                device_json("dev-2", "nyc1-vpn"),
                device_json("dev-3", "laptop"),
            ]
        })))
        .mount(&mesh_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/device/dev-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mesh_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/device/dev-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mesh_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/device/dev-3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mesh_server)
        .await;

    let compute = DoClient::with_base_url("tok", compute_server.uri());
    let mesh = TailscaleClient::with_base_url("key", mesh_server.uri());

    let outcome = teardown_nodes(&compute, &mesh, "example.com").await.unwrap();
    let DisconnectOutcome::Cleaned(results) = outcome else {
        panic!("expected cleaned outcome");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "NYC1-VPN");
    assert!(results[0].status.contains("Removed 2 device(s)"));
}

#[tokio::test]
async fn mesh_cleanup_failure_is_absorbed_into_status() {
    let compute_server = MockServer::start().await;
    let mesh_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "droplets": [droplet_json(1, "nyc1-VPN")]
        })))
        .mount(&compute_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/droplets/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&compute_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tailnet/example.com/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("listing broke"))
        .mount(&mesh_server)
        .await;

    let compute = DoClient::with_base_url("tok", compute_server.uri());
    let mesh = TailscaleClient::with_base_url("key", mesh_server.uri());

    let outcome = teardown_nodes(&compute, &mesh, "example.com").await.unwrap();
    let DisconnectOutcome::Cleaned(results) = outcome else {
        panic!("expected cleaned outcome");
    };
    assert!(results[0].status.contains("cleanup failed"));
}

#[tokio::test]
async fn droplet_deletion_failure_aborts_remaining_droplets() {
    let compute_server = MockServer::start().await;
    let mesh_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "droplets": [droplet_json(1, "nyc1-VPN"), droplet_json(2, "sfo2-VPN")]
        })))
        .mount(&compute_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/droplets/1"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "delete failed upstream" })),
        )
        .mount(&compute_server)
        .await;
    // The second droplet must never be touched after the first delete
    // fails.
    Mock::given(method("DELETE"))
        .and(path("/droplets/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&compute_server)
        .await;

    let compute = DoClient::with_base_url("tok", compute_server.uri());
    let mesh = TailscaleClient::with_base_url("key", mesh_server.uri());

    let err = teardown_nodes(&compute, &mesh, "example.com").await.unwrap_err();
    assert!(err.to_string().contains("delete failed upstream"));
}
