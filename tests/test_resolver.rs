use gopherd::config::Config;
use gopherd::error::GopherError;
use gopherd::gopher::resolver::{Served, resolve, send_file};
use gopherd::gopher::selector::Selector;
use tempfile::{TempDir, tempdir};

fn config(root: &TempDir) -> Config {
    Config {
        root: root.path().to_path_buf(),
        hostname: "example.org".to_string(),
        port: 70,
        bind: None,
        read_timeout: None,
    }
}

async fn fetch(cfg: &Config, raw: &str) -> (Vec<u8>, Result<Served, GopherError>) {
    let selector = Selector::sanitize(raw).unwrap();
    let mut out = Vec::new();
    let result = resolve(&mut out, &selector, cfg).await;
    (out, result)
}

#[tokio::test]
async fn test_file_served_verbatim() {
    let root = tempdir().unwrap();
    tokio::fs::write(root.path().join("file.txt"), "hello").await.unwrap();

    let (out, result) = fetch(&config(&root), "file.txt").await;

    assert_eq!(out, b"hello");
    assert_eq!(result.unwrap(), Served::File(5));
}

#[tokio::test]
async fn test_binary_file_untouched() {
    let root = tempdir().unwrap();
    let bytes: Vec<u8> = (0..=255u8).chain(b"\r\n.\r\n".iter().copied()).collect();
    tokio::fs::write(root.path().join("blob.bin"), &bytes).await.unwrap();

    let (out, result) = fetch(&config(&root), "/blob.bin").await;

    assert!(result.is_ok());
    assert_eq!(out, bytes);
}

#[tokio::test]
async fn test_directory_without_gophermap_is_listed() {
    let root = tempdir().unwrap();
    tokio::fs::create_dir(root.path().join("docs")).await.unwrap();
    tokio::fs::write(root.path().join("docs/a.txt"), "a").await.unwrap();

    let (out, result) = fetch(&config(&root), "docs").await;

    assert_eq!(result.unwrap(), Served::Listing(1));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0a.txt\tdocs/a.txt\texample.org\t70\r\n.\r\n"
    );
}

#[tokio::test]
async fn test_gophermap_rendered_and_terminated() {
    let root = tempdir().unwrap();
    tokio::fs::write(root.path().join("gophermap"), "Welcome\n1Docs\tdocs\n")
        .await
        .unwrap();
    tokio::fs::write(root.path().join("ignored.txt"), "x").await.unwrap();

    let (out, result) = fetch(&config(&root), "").await;

    assert_eq!(result.unwrap(), Served::Gophermap(2));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "iWelcome\t\t\t\r\n1Docs\t/docs\texample.org\t70\r\n.\r\n"
    );
}

#[tokio::test]
async fn test_empty_gophermap_is_just_terminator() {
    let root = tempdir().unwrap();
    tokio::fs::write(root.path().join("gophermap"), "").await.unwrap();

    let (out, result) = fetch(&config(&root), "").await;

    assert_eq!(result.unwrap(), Served::Gophermap(0));
    assert_eq!(out, b".\r\n");
}

#[tokio::test]
async fn test_unreadable_gophermap_still_terminated() {
    let root = tempdir().unwrap();
    // A directory named gophermap exists but cannot be read as a file.
    tokio::fs::create_dir(root.path().join("gophermap")).await.unwrap();

    let (out, result) = fetch(&config(&root), "").await;

    assert!(matches!(result, Err(GopherError::Gophermap { .. })));
    assert_eq!(out, b".\r\n");
}

#[tokio::test]
async fn test_root_and_dot_resolve_identically() {
    let root = tempdir().unwrap();
    tokio::fs::write(root.path().join("a.txt"), "a").await.unwrap();
    tokio::fs::create_dir(root.path().join("sub")).await.unwrap();
    let cfg = config(&root);

    let (empty, _) = fetch(&cfg, "").await;
    let (dot, _) = fetch(&cfg, ".").await;
    let (slash, _) = fetch(&cfg, "/").await;

    assert_eq!(empty, dot);
    assert_eq!(empty, slash);
}

#[tokio::test]
async fn test_repeated_requests_identical() {
    let root = tempdir().unwrap();
    tokio::fs::create_dir(root.path().join("docs")).await.unwrap();
    for name in ["z.txt", "a.png", "m"] {
        tokio::fs::write(root.path().join("docs").join(name), name).await.unwrap();
    }
    let cfg = config(&root);

    let (first, _) = fetch(&cfg, "docs").await;
    let (second, _) = fetch(&cfg, "docs").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_path_not_found() {
    let root = tempdir().unwrap();

    let (out, result) = fetch(&config(&root), "missing/thing").await;

    assert!(out.is_empty());
    match result {
        Err(GopherError::NotFound(selector)) => assert_eq!(selector, "missing/thing"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_message_has_no_local_path() {
    let root = tempdir().unwrap();

    let (_, result) = fetch(&config(&root), "nope").await;
    let message = result.unwrap_err().to_string();

    assert_eq!(message, "Cannot find nope");
    assert!(!message.contains(&root.path().display().to_string()));
}

#[tokio::test]
async fn test_rooted_traversal_stays_inside_root() {
    let outer = tempdir().unwrap();
    tokio::fs::write(outer.path().join("secret"), "sentinel").await.unwrap();
    let root = outer.path().join("root");
    tokio::fs::create_dir(&root).await.unwrap();

    let cfg = Config {
        root,
        hostname: "example.org".to_string(),
        port: 70,
        bind: None,
        read_timeout: None,
    };

    let (out, result) = fetch(&cfg, "/../secret").await;

    assert!(matches!(result, Err(GopherError::NotFound(_))));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_send_file_missing() {
    let root = tempdir().unwrap();
    let mut out = Vec::new();

    assert!(send_file(&mut out, &root.path().join("gone")).await.is_err());
    assert!(out.is_empty());
}
