use clap::Parser;
use markstack_cache::EntityCache;
use markstack_cli::{load_config, run, Cli, Command};
use markstack_client::mock::MockTransport;
use markstack_client::BookmarkClient;
use markstack_types::EntityId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn setup() -> (Arc<MockTransport>, BookmarkClient) {
    let transport = Arc::new(MockTransport::new());
    let client = BookmarkClient::new(transport.clone(), Arc::new(EntityCache::new()));
    (transport, client)
}

async fn output(client: &BookmarkClient, command: Command) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(client, command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

// ── parsing ──────────────────────────────────────────────────────

#[test]
fn parses_subcommands() {
    let cli = Cli::try_parse_from(["markstack", "add", "5", "https://a.dev"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Add {
            folder: EntityId::new(5),
            url: "https://a.dev".into()
        }
    );

    let cli = Cli::try_parse_from(["markstack", "-v", "rm", "--hard", "1", "2"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(
        cli.command,
        Command::Rm {
            ids: vec![EntityId::new(1), EntityId::new(2)],
            hard: true
        }
    );
}

#[test]
fn rejects_non_numeric_ids() {
    assert!(Cli::try_parse_from(["markstack", "folder", "abc"]).is_err());
    assert!(Cli::try_parse_from(["markstack", "rm"]).is_err());
}

#[test]
fn endpoint_flag_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"endpoint": "https://from-file.dev/graphql", "timeout_ms": 1234}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let cli = Cli::try_parse_from(["markstack", "--config", &path, "--endpoint", "https://flag.dev/graphql", "all"]).unwrap();
    let config = load_config(&cli).unwrap();
    assert_eq!(config.endpoint, "https://flag.dev/graphql");
    assert_eq!(config.timeout_ms, 1234);
}

#[test]
fn bad_endpoint_flag_is_rejected() {
    let cli = Cli::try_parse_from(["markstack", "--endpoint", "nope", "all"]).unwrap();
    assert!(load_config(&cli).is_err());
}

// ── commands ─────────────────────────────────────────────────────

#[tokio::test]
async fn add_rejects_invalid_url_without_sending() {
    let (transport, client) = setup();
    let err = output(
        &client,
        Command::Add {
            folder: EntityId::new(5),
            url: "notaurl".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "url: Must be a valid URL");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn add_without_url_is_not_sent() {
    let (transport, client) = setup();
    let err = output(
        &client,
        Command::Add {
            folder: EntityId::new(1),
            url: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "nothing to submit");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn add_reports_created_bookmark() {
    let (transport, client) = setup();
    transport.respond(json!({"createBookmark": {
        "__typename": "Bookmark", "id": 3, "title": null, "url": "https://a.dev",
        "description": null, "createdDate": null, "folderId": 5
    }}));
    let text = output(
        &client,
        Command::Add {
            folder: EntityId::new(5),
            url: "https://a.dev".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(text, "Added bookmark 3 to folder 5\n");
}

#[tokio::test]
async fn add_surfaces_server_field_error() {
    let (transport, client) = setup();
    transport.respond(json!({"createBookmark": {
        "__typename": "InputValidationError", "path": "url", "message": "Already bookmarked"
    }}));
    let err = output(
        &client,
        Command::Add {
            folder: EntityId::new(5),
            url: "https://a.dev".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "url: Already bookmarked");
}

#[tokio::test]
async fn login_failure_is_reported() {
    let (transport, client) = setup();
    transport.respond(json!({"login": {"__typename": "BaseError", "path": null, "message": "Invalid credentials"}}));
    let err = output(
        &client,
        Command::Login {
            email: "a@b.co".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn mkdir_requires_a_name() {
    let (transport, client) = setup();
    let err = output(
        &client,
        Command::Mkdir {
            name: String::new(),
            parent: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "name: Name is required");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn folder_lists_children_and_bookmarks() {
    let (transport, client) = setup();
    transport.respond(json!({"folder": {
        "__typename": "Folder", "id": 1, "parentId": null, "depth": 0, "name": "Root",
        "children": [{"id": 2, "name": "Rust"}]
    }}));
    transport.respond(json!({"folder": {
        "__typename": "Folder", "id": 1, "parentId": null, "depth": 0, "name": "Root",
        "bookmarks": [{"id": 7, "title": "The Book", "url": "https://doc.rust-lang.org/book/", "description": null}]
    }}));
    let text = output(&client, Command::Folder { id: EntityId::new(1) }).await.unwrap();
    assert_eq!(
        text,
        "Root (folder 1)\n  [2] Rust/\n  [7] The Book <https://doc.rust-lang.org/book/>\n"
    );
}

#[tokio::test]
async fn empty_trash() {
    let (transport, client) = setup();
    transport.respond(json!({"bookmarks": {"__typename": "Bookmarks", "bookmarks": []}}));
    assert_eq!(output(&client, Command::Trash).await.unwrap(), "  (no bookmarks)\n");
}

#[tokio::test]
async fn transport_errors_propagate() {
    let (_transport, client) = setup();
    // Nothing queued: the mock reports a network failure.
    assert!(output(&client, Command::All).await.is_err());
}
