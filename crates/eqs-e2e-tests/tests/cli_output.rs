//! E2E tests for what the binary prints: text listings, JSON documents and
//! the no-match forms.

mod helpers;

use eqs_cli::RenderOptions;
use eqs_cli::output::{NO_MATCHES_JSON, NO_MATCHES_TEXT};
use eqs_protocol::Platform;

use helpers::TestHarness;

fn json() -> RenderOptions {
    RenderOptions {
        json: true,
        ..Default::default()
    }
}

/// Text output leads with the top match and its metadata.
#[tokio::test]
async fn e2e_text_output_layout() {
    let h = TestHarness::with_samples();
    let out = h
        .render(Platform::Srl, "show interface statistics", RenderOptions::default())
        .await;

    assert!(out.starts_with("Top match (score: "), "{out}");
    let mut lines = out.lines();
    lines.next();
    assert!(
        lines
            .next()
            .unwrap()
            .starts_with(".namespace.node.srl.interface.statistics"),
        "{out}"
    );
    assert!(out.contains("\n\nDescription: Interface traffic statistics and error counters"));
    assert!(out.contains("\nAvailable fields: in-octets, out-octets"));
    assert!(out.contains("\n\nOther possible matches:\n1. .namespace.node.srl."));
}

/// `--explain` adds a match explanation under each result.
#[tokio::test]
async fn e2e_explain_output() {
    let h = TestHarness::with_samples();
    let plain = h
        .render(Platform::Srl, "show interface statistics", RenderOptions::default())
        .await;
    let explained = h
        .render(
            Platform::Srl,
            "show interface statistics",
            RenderOptions {
                explain: true,
                ..Default::default()
            },
        )
        .await;

    assert!(explained.len() > plain.len());
    assert!(explained.contains("statistics"));
}

/// JSON output carries the top match and the other matches as objects.
#[tokio::test]
async fn e2e_json_output_shape() {
    let h = TestHarness::with_samples();
    let out = h
        .render(Platform::Srl, "top 5 processes by memory usage", json())
        .await;
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    let top = &value["topMatch"];
    assert!(top["score"].as_f64().unwrap() > 0.0);
    assert!(top["table"].as_str().unwrap().starts_with(".namespace."));
    assert!(
        top["query"]
            .as_str()
            .unwrap()
            .starts_with(top["table"].as_str().unwrap())
    );

    let all: Vec<&serde_json::Value> = std::iter::once(top)
        .chain(value["others"].as_array().into_iter().flatten())
        .collect();
    let app = all
        .iter()
        .find(|r| r["table"] == ".namespace.node.srl.system.app-management.application")
        .expect("application table should be listed");
    assert_eq!(app["limit"], 5);
    assert!(app["query"].as_str().unwrap().contains(" limit 5"));
}

/// JSON scores and rank order match the engine's results.
#[tokio::test]
async fn e2e_json_matches_search_results() {
    let h = TestHarness::with_samples();
    let query = "bgp neighbors down";
    let results = h.search(Platform::Srl, query).await;
    let value: serde_json::Value =
        serde_json::from_str(&h.render(Platform::Srl, query, json()).await).unwrap();

    assert_eq!(value["topMatch"]["table"], results[0].key.as_str());
    let score = value["topMatch"]["score"].as_f64().unwrap();
    assert!((score - results[0].score).abs() < 1e-9);
    let others = value["others"].as_array().map_or(&[][..], Vec::as_slice);
    assert_eq!(others.len(), results.len() - 1);
    for (json, result) in others.iter().zip(&results[1..]) {
        assert_eq!(json["table"], result.key.as_str());
        assert_eq!(json["query"], result.query_string().as_str());
    }
}

/// Nothing to match prints the fixed no-match forms.
#[tokio::test]
async fn e2e_no_match_output() {
    let h = TestHarness::with_samples();
    let text = h.render(Platform::Srl, "", RenderOptions::default()).await;
    assert_eq!(text.trim_end(), NO_MATCHES_TEXT);

    let json_out = h.render(Platform::Srl, "", json()).await;
    assert_eq!(json_out.trim_end(), NO_MATCHES_JSON);
    let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 0);
}

/// `--full` renders the same top match as the indexed path.
#[tokio::test]
async fn e2e_full_scan_output() {
    let h = TestHarness::with_samples();
    let full = RenderOptions {
        json: true,
        full: true,
        ..Default::default()
    };
    let indexed: serde_json::Value =
        serde_json::from_str(&h.render(Platform::Srl, "show interface statistics", json()).await)
            .unwrap();
    let scanned: serde_json::Value =
        serde_json::from_str(&h.render(Platform::Srl, "show interface statistics", full).await)
            .unwrap();
    assert_eq!(indexed["topMatch"], scanned["topMatch"]);
}
