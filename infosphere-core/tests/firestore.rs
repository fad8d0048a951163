use std::{net::TcpListener, time::Duration};

use infosphere_core::{
    error::FetchError,
    firestore::{FirestoreConfig, FirestoreStore},
    path::NavigationPath,
    store::CatalogStore,
};
use mockito::{Matcher, Server};

fn store(endpoint: &str) -> FirestoreStore {
    let mut config = FirestoreConfig::new("demo");
    config.endpoint = endpoint.to_string();
    config.timeout = Duration::from_secs(5);
    FirestoreStore::new(config)
}

fn titles_page(ids: &[&str], next: Option<&str>) -> String {
    let documents: Vec<_> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "name": format!("projects/demo/databases/(default)/documents/titles/{id}"),
                "fields": { "name": { "stringValue": id.to_uppercase() } }
            })
        })
        .collect();
    let mut page = serde_json::json!({ "documents": documents });
    if let Some(token) = next {
        page["nextPageToken"] = token.into();
    }
    page.to_string()
}

fn ids(store: &FirestoreStore, path: &NavigationPath) -> Result<Vec<String>, FetchError> {
    let nodes = store.fetch_children(path)?;
    Ok(nodes.iter().map(|node| node.id.to_string()).collect())
}

#[test]
fn follows_page_tokens_in_order() {
    let mut server = Server::new();
    let first = server
        .mock("GET", Matcher::Regex("/documents/titles$".into()))
        .match_query(Matcher::Regex("^pageSize=300$".into()))
        .with_header("content-type", "application/json")
        .with_body(titles_page(&["t1", "t2"], Some("tok")))
        .expect(1)
        .create();
    let second = server
        .mock("GET", Matcher::Regex("/documents/titles$".into()))
        .match_query(Matcher::UrlEncoded("pageToken".into(), "tok".into()))
        .with_header("content-type", "application/json")
        .with_body(titles_page(&["t3"], None))
        .expect(1)
        .create();

    let store = store(&server.url());
    assert_eq!(ids(&store, &NavigationPath::Root).unwrap(), ["t1", "t2", "t3"]);
    first.assert();
    second.assert();
}

#[test]
fn repeated_page_token_ends_the_listing() {
    let mut server = Server::new();
    server
        .mock("GET", Matcher::Regex("/documents/titles$".into()))
        .match_query(Matcher::Regex("^pageSize=300$".into()))
        .with_body(titles_page(&["t1"], Some("again")))
        .create();
    let repeated = server
        .mock("GET", Matcher::Regex("/documents/titles$".into()))
        .match_query(Matcher::UrlEncoded("pageToken".into(), "again".into()))
        .with_body(titles_page(&["t2"], Some("again")))
        .expect(1)
        .create();

    let store = store(&server.url());
    assert_eq!(ids(&store, &NavigationPath::Root).unwrap(), ["t1", "t2"]);
    repeated.assert();
}

#[test]
fn sends_id_token_as_bearer() {
    let mut server = Server::new();
    let listing = server
        .mock("GET", Matcher::Regex("/documents/titles/t1/subtitles$".into()))
        .match_header("authorization", "Bearer s3cret")
        .with_body(r#"{"documents": []}"#)
        .expect(1)
        .create();

    let mut config = FirestoreConfig::new("demo");
    config.endpoint = server.url();
    config.id_token = Some("s3cret".into());
    let store = FirestoreStore::new(config);
    let path = NavigationPath::from_ids(&["t1"]).unwrap();
    assert!(store.fetch_children(&path).unwrap().is_empty());
    listing.assert();
}

#[test]
fn maps_http_statuses() {
    for (status, expected) in [
        (401, FetchError::PermissionDenied),
        (403, FetchError::PermissionDenied),
        (404, FetchError::NotFound),
    ] {
        let mut server = Server::new();
        server
            .mock("GET", Matcher::Any)
            .with_status(status)
            .with_body("{}")
            .create();
        let store = store(&server.url());
        assert_eq!(ids(&store, &NavigationPath::Root), Err(expected));
    }

    let mut server = Server::new();
    server.mock("GET", Matcher::Any).with_status(500).create();
    let store = store(&server.url());
    assert!(matches!(
        ids(&store, &NavigationPath::Root),
        Err(FetchError::Unknown(_))
    ));
}

#[test]
fn refused_connection_is_network_unavailable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let store = store(&format!("http://127.0.0.1:{port}"));
    assert_eq!(
        ids(&store, &NavigationPath::Root),
        Err(FetchError::NetworkUnavailable)
    );
}
