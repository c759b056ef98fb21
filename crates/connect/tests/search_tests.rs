use anyhow::Result;
use connect::{SearchClient, SearchConfig};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mock_cluster::blocking;

fn config(server: &MockServer) -> SearchConfig {
    SearchConfig {
        url: server.uri(),
        timeout_secs: 2,
    }
}

#[tokio::test]
async fn test_cluster_info() -> Result<()> {
    let es = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "node-1",
            "cluster_name": "datalake",
            "version": {"number": "7.17.9"},
            "tagline": "You Know, for Search"
        })))
        .mount(&es)
        .await;

    let cfg = config(&es);
    let info = blocking(move || SearchClient::new(&cfg)?.info()).await?;
    assert_eq!(info.cluster_name, "datalake");
    assert_eq!(info.version.number, "7.17.9");
    Ok(())
}

#[tokio::test]
async fn test_index_get_and_search() -> Result<()> {
    let es = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/events/_doc/42"))
        .and(body_json(json!({"kind": "load", "rows": 10})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "42", "result": "created"})))
        .mount(&es)
        .await;
    Mock::given(method("POST"))
        .and(path("/events/_doc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "auto-1", "result": "created"})))
        .mount(&es)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/_doc/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "events", "_id": "42", "found": true, "_source": {"kind": "load", "rows": 10}
        })))
        .mount(&es)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/_doc/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"_index": "events", "_id": "404", "found": false})))
        .mount(&es)
        .await;
    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .and(body_json(json!({"query": {"match": {"kind": "load"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 1,
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "hits": [{"_index": "events", "_id": "42", "_score": 1.3, "_source": {"kind": "load"}}]
            }
        })))
        .mount(&es)
        .await;

    let cfg = config(&es);
    let (explicit, generated, found, missing, hits) = blocking(move || -> connect::Result<_> {
        let client = SearchClient::new(&cfg)?;
        let explicit = client.index_document("events", Some("42"), &json!({"kind": "load", "rows": 10}))?;
        let generated = client.index_document("events", None, &json!({"kind": "other"}))?;
        let found = client.get_document("events", "42")?;
        let missing = client.get_document("events", "404")?;
        let hits = client.search("events", &json!({"query": {"match": {"kind": "load"}}}))?;
        Ok((explicit, generated, found, missing, hits))
    })
    .await?;

    assert_eq!(explicit, "42");
    assert_eq!(generated, "auto-1");
    assert_eq!(found, Some(json!({"kind": "load", "rows": 10})));
    assert!(missing.is_none());
    assert_eq!(hits.total, 1);
    assert_eq!(hits.hits[0].id, "42");
    Ok(())
}

#[tokio::test]
async fn test_error_status_surfaces() {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parsing_exception"))
        .mount(&es)
        .await;

    let cfg = config(&es);
    let err = blocking(move || SearchClient::new(&cfg)?.search("events", &json!({"bad": 1})))
        .await
        .unwrap_err();
    assert!(matches!(err, connect::ConnectError::Status { status: 400, .. }));
}
