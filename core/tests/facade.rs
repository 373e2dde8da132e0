//! Every endpoint group against a recording transport: no network involved.

mod common;

use common::{client, BASE_URL, KEY};
use estuary_core::{AddFromIpfs, AddPin, ApiError, HttpMethod, RequestBody, StatsQuery};
use serde_json::{json, Value};

#[tokio::test]
async fn add_pin_posts_name_and_cid() {
    let (client, transport) = client();
    transport.reply(
        202,
        r#"{"requestid":"1","status":"queued","created":"2022-03-01T12:00:00Z",
            "pin":{"cid":"y","name":"x","origins":[],"meta":{}},"delegates":[],"info":{}}"#,
    );

    let pin = client
        .pins
        .add_pin(&AddPin {
            name: "x".to_string(),
            cid: "y".to_string(),
        })
        .await
        .unwrap()
        .into_ok()
        .unwrap();

    assert_eq!(pin.requestid, "1");
    assert_eq!(pin.status, "queued");
    assert_eq!(pin.pin.cid, "y");

    let req = transport.last();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, format!("{BASE_URL}/pinning/pins"));
    let body: Value = serde_json::from_str(req.body.as_json().unwrap()).unwrap();
    assert_eq!(body, json!({"name": "x", "cid": "y"}));
}

#[tokio::test]
async fn every_group_forwards_the_same_bearer() {
    let (client, transport) = client();
    transport.reply(200, r#"{"count":0,"results":[]}"#);
    transport.reply(200, "[]");
    transport.reply(200, r#"{"totalStorage":1,"totalFiles":2,"dealsOnChain":3}"#);

    client.pins.list_pins().await.unwrap();
    client.content.deals().await.unwrap();
    client.public.public_stats().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    for req in sent {
        assert_eq!(req.header("Authorization"), Some(format!("Bearer {KEY}").as_str()));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
    }
}

#[tokio::test]
async fn pin_by_id_accepts_numbers_and_strings() {
    let (client, transport) = client();

    client.pins.pin_by_id(7).await.unwrap();
    assert_eq!(transport.last().path, "/pinning/pins/7");

    client.pins.pin_by_id("abc").await.unwrap();
    assert_eq!(transport.last().path, "/pinning/pins/abc");
}

#[tokio::test]
async fn remove_pin_with_empty_body_returns_null() {
    let (client, transport) = client();
    transport.reply(202, "");

    let result = client.pins.remove_pin(3).await.unwrap();

    assert!(result.is_null());
    let req = transport.last();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.path, "/pinning/pins/3");
}

#[tokio::test]
async fn missing_pin_fails_with_client_error() {
    let (client, transport) = client();
    transport.reply(404, r#"{"error":"pin not found"}"#);

    let err = client.pins.pin_by_id(99).await.unwrap_err();

    assert!(matches!(err, ApiError::Client { .. }));
    assert_eq!(
        err.to_string(),
        "GET request to /pinning/pins/99 failed, error: pin not found"
    );
}

#[tokio::test]
async fn upload_sends_single_append_field() {
    let (client, transport) = client();
    transport.reply(200, r#"{"cid":"bafkabc","estuaryId":5,"providers":["/ip4/1.2.3.4"]}"#);

    let added = client
        .content
        .add("notes.txt", b"hello".to_vec())
        .await
        .unwrap()
        .into_ok()
        .unwrap();

    assert_eq!(added.cid, "bafkabc");
    assert_eq!(added.estuary_id, 5);

    let req = transport.last();
    assert_eq!(req.path, "/content/add");
    assert!(req.header("Content-Type").is_none());
    match req.body {
        RequestBody::Multipart(file) => {
            assert_eq!(file.field, "append");
            assert_eq!(file.file_name, "notes.txt");
            assert_eq!(file.bytes, b"hello");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn add_file_uploads_under_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let (client, transport) = client();
    client.content.add_file(&path).await.unwrap();

    match transport.last().body {
        RequestBody::Multipart(file) => {
            assert_eq!(file.file_name, "report.csv");
            assert_eq!(file.bytes, b"a,b\n1,2\n");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn add_file_missing_path_is_config_error() {
    let (client, transport) = client();

    let err = client
        .content
        .add_file("/definitely/not/here.bin")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Config(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn add_from_ipfs_posts_name_and_root() {
    let (client, transport) = client();

    client
        .content
        .add_from_ipfs(&AddFromIpfs {
            name: "site".to_string(),
            root: "bafyroot".to_string(),
        })
        .await
        .unwrap();

    let req = transport.last();
    assert_eq!(req.path, "/content/add-ipfs");
    let body: Value = serde_json::from_str(req.body.as_json().unwrap()).unwrap();
    assert_eq!(body, json!({"name": "site", "root": "bafyroot"}));
}

#[tokio::test]
async fn stats_defaults_and_overrides() {
    let (client, transport) = client();
    for _ in 0..3 {
        transport.reply(200, "[]");
    }

    client.content.stats(StatsQuery::default()).await.unwrap();
    client.content.stats(StatsQuery::default().offset(50)).await.unwrap();
    client.content.stats(StatsQuery::default().limit(10)).await.unwrap();

    let paths: Vec<String> = transport.sent().into_iter().map(|req| req.path).collect();
    assert_eq!(
        paths,
        vec![
            "/content/stats?offset=0&limit=500",
            "/content/stats?offset=50&limit=500",
            "/content/stats?offset=0&limit=10",
        ]
    );
}

#[tokio::test]
async fn stats_decodes_rows() {
    let (client, transport) = client();
    transport.reply(
        200,
        r#"[{"id":1,"cid":{"/":"bafy"},"file":"a.txt","bwUsed":10,"totalRequests":2,
             "offloaded":false,"aggregatedFiles":0}]"#,
    );

    let rows = client.content.stats(StatsQuery::default()).await.unwrap().into_ok().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cid["/"], "bafy");
    assert_eq!(rows[0].bw_used, 10);
}

#[tokio::test]
async fn deal_status_decodes_nested_records() {
    let (client, transport) = client();
    transport.reply(
        200,
        r#"{"content":{"id":42,"cid":"bafy"},
            "deals":[{"deal":{"id":1,"miner":"f01","dealId":7},
                      "transfer":{"transferId":"9","status":6},
                      "onChainState":null}],
            "failuresCount":2}"#,
    );

    let status = client.content.deal_status_by_id(42).await.unwrap().into_ok().unwrap();

    assert_eq!(transport.last().path, "/content/status/42");
    assert_eq!(status.content.id, 42);
    assert_eq!(status.deals[0].deal.miner, "f01");
    assert_eq!(status.deals[0].transfer.status, 6);
    assert!(status.deals[0].on_chain_state.is_null());
    assert_eq!(status.failures_count, 2);
}

#[tokio::test]
async fn data_by_cid_decodes_matches() {
    let (client, transport) = client();
    transport.reply(200, r#"[{"content":{"id":1,"cid":"bafy","name":"a"},"selector":""}]"#);

    let matches = client.content.data_by_cid("bafy").await.unwrap().into_ok().unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].content.name, "a");
    assert!(matches[0].aggregated_in.is_none());
}

#[tokio::test]
async fn miner_records_decode_as_keyed_maps() {
    let (client, transport) = client();
    transport.reply(
        200,
        r#"{"0":{"ID":1,"CreatedAt":"t","UpdatedAt":"t","DeletedAt":null,"miner":"f01",
                 "phase":"query","message":"timeout","content":3,"minerVersion":"1.0"}}"#,
    );
    transport.reply(200, r#"{"0":{"id":5,"propCid":"bafyprop","miner":"f01","dealId":8}}"#);

    let failures = client.public.miner_failures("f01").await.unwrap().into_ok().unwrap();
    let deals = client.public.miner_deals("f01").await.unwrap().into_ok().unwrap();

    assert_eq!(failures["0"].phase, "query");
    assert_eq!(deals["0"].deal_id, 8);
    let paths: Vec<String> = transport.sent().into_iter().map(|req| req.path).collect();
    assert_eq!(
        paths,
        vec!["/public/miners/failures/f01", "/public/miners/deals/f01"]
    );
}

#[tokio::test]
async fn failed_miner_query_passes_5xx_through_as_json() {
    let (client, transport) = client();
    transport.reply(500, r#"{"error":"failed to query miner"}"#);

    let json = client
        .executor()
        .request_json(
            "/public/miners/storage/query/f099",
            estuary_core::RequestOptions::get(),
        )
        .await
        .unwrap();

    assert_eq!(json, json!({"error": "failed to query miner"}));
}

#[tokio::test]
async fn failed_miner_query_keeps_error_body() {
    let (client, transport) = client();
    transport.reply(500, r#"{"error":"failed to query miner"}"#);

    let reply = client.public.query_miner("f099").await.unwrap();

    assert!(reply.is_server_error());
    assert!(reply.as_ok().is_none());
    assert_eq!(reply.error_message().as_deref(), Some("failed to query miner"));
}

#[tokio::test]
async fn server_error_on_list_endpoints_keeps_error_body() {
    let (client, transport) = client();
    transport.reply(500, r#"{"error":"db down"}"#);
    transport.reply(503, r#"{"error":"db down"}"#);

    let metrics = client.public.deals_on_chain().await.unwrap();
    let rows = client.content.stats(StatsQuery::default()).await.unwrap();

    match metrics {
        estuary_core::Reply::ServerError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, json!({"error": "db down"}));
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(rows.error_message().as_deref(), Some("db down"));
}

#[tokio::test]
async fn server_error_on_map_endpoint_keeps_error_body() {
    let (client, transport) = client();
    transport.reply(502, r#"{"error":"db down"}"#);

    let reply = client.public.miner_deals("f01").await.unwrap();

    assert_eq!(reply.server_error(), Some(&json!({"error": "db down"})));
    assert_eq!(reply.error_message().as_deref(), Some("db down"));
}

#[tokio::test]
async fn server_error_on_struct_endpoints_keeps_error_body() {
    let (client, transport) = client();
    transport.reply(500, r#"{"error":"db down"}"#);
    transport.reply(500, r#"{"error":"db down"}"#);

    let stats = client.public.public_stats().await.unwrap();
    let status = client.content.deal_status_by_id(1).await.unwrap();

    assert!(stats.into_ok().is_none());
    assert_eq!(status.error_message().as_deref(), Some("db down"));
}

#[tokio::test]
async fn server_error_without_json_body_is_deserialization_error() {
    let (client, transport) = client();
    transport.reply(500, "<html>bad gateway</html>");

    let err = client.public.deals_on_chain().await.unwrap_err();

    assert!(matches!(err, ApiError::Deserialization(_)));
}

#[tokio::test]
async fn malformed_identifiers_are_forwarded_verbatim() {
    let (client, transport) = client();

    client.public.query_miner("f0 1/x").await.unwrap();

    assert_eq!(transport.last().path, "/public/miners/storage/query/f0 1/x");
}
