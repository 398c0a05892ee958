//! Live-socket tests: the server bound to an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use prediction_server::config::ServerConfig;
use prediction_server::http::HttpServer;
use prediction_server::lifecycle::Shutdown;

mod common;
use common::StubEngine;

#[tokio::test]
async fn test_serves_and_shuts_down_gracefully() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&ServerConfig::default(), Arc::new(StubEngine::binomial()));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), r#"{"status":"ok"}"#);

    let res = client
        .post(format!("{}/predict", base))
        .header("content-type", "application/json")
        .body(r#"{"age": 42}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let doc: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(doc["predicted_label"], "Yes");
    assert_eq!(doc["input"]["age"], 42);

    let res = client
        .post(format!("{}/predict", base))
        .header("content-type", "text/plain")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_concurrent_predictions() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&ServerConfig::default(), Arc::new(StubEngine::regression(7.5)));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let mut tasks = Vec::new();
    for i in 0..32 {
        let client = client.clone();
        let url = format!("http://{}/predict", addr);
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .header("content-type", "application/json")
                .body(format!(r#"{{"i": {}}}"#, i))
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let body = task.await.unwrap();
        assert_eq!(
            body,
            format!(
                r#"{{"model_category":"Regression","input":{{"i":{}}},"predicted_value":7.5}}"#,
                i
            )
        );
    }

    shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
}
