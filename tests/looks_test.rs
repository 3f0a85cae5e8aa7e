//! Look Bookテスト
//!
//! ローカル保存とリモート同期（成功・失敗）を検証

use chrono::{TimeZone, Utc};
use std::time::Duration;
use stylegenie::config::RemoteConfig;
use stylegenie::error::StyleError;
use stylegenie::looks::{save_look, LookBook, RemoteStore, SavedLook, LOCAL_ONLY_MESSAGE};
use stylegenie_common::{generate_outfit_suggestions, Garment, TagSet};
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 1件だけリクエストを受けて200を返すローカルサーバ（受信内容を返す）
async fn serve_once_ok() -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept失敗");
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = stream.read(&mut buf).await.expect("read失敗");
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&received).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await
            .expect("write失敗");
        String::from_utf8_lossy(&received).to_string()
    });

    (format!("http://{}/looks", addr), handle)
}

fn look_at(millis: i64) -> SavedLook {
    let garment = Garment::new("g", TagSet::new("dress", "red", &[]), "dress.png");
    let suggestions = generate_outfit_suggestions("dress", "red");
    SavedLook::from_suggestion(&garment, &suggestions[1], Utc.timestamp_millis_opt(millis).unwrap())
}

/// 保存して再読み込み
#[tokio::test]
async fn test_save_and_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("looks.json");

    let mut book = LookBook::open(&path);
    let receipt = save_look(&mut book, look_at(1_000), None).await.expect("保存失敗");
    assert_eq!(receipt.message, LOCAL_ONLY_MESSAGE);
    save_look(&mut book, look_at(2_000), None).await.expect("保存失敗");

    let reopened = LookBook::open(&path);
    let ids: Vec<&str> = reopened.list().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["2000", "1000"]);
    assert_eq!(reopened.list()[0].suggestion.title, "Daytime Charm");
}

/// 削除は永続化される
#[test]
fn test_remove_persists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("looks.json");

    let mut book = LookBook::open(&path);
    book.add(look_at(1)).unwrap();
    book.add(look_at(2)).unwrap();
    assert!(book.remove("1").unwrap());

    let reopened = LookBook::open(&path);
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get("1").is_none());
}

/// 壊れたファイルは空として開く
#[test]
fn test_corrupt_file_opens_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("looks.json");
    std::fs::write(&path, "[{broken").unwrap();

    assert!(LookBook::open(&path).is_empty());
}

/// リモート同期失敗はエラーだがローカルには残る
#[tokio::test]
async fn test_remote_failure_keeps_local() {
    let remote = RemoteStore::new(
        &RemoteConfig {
            // 接続できないポート
            url: "http://127.0.0.1:9/looks".into(),
            token: Some("secret".into()),
        },
        Duration::from_secs(2),
    )
    .expect("クライアント生成失敗");

    let mut book = LookBook::in_memory();
    let result = save_look(&mut book, look_at(3_000), Some(&remote)).await;

    assert!(matches!(result, Err(StyleError::RemoteSave(_))));
    assert_eq!(book.len(), 1);
    assert!(book.get("3000").is_some());
}

/// リモート同期成功
#[tokio::test]
async fn test_remote_success_syncs() {
    let (url, server) = serve_once_ok().await;
    let remote = RemoteStore::new(
        &RemoteConfig {
            url: url.clone(),
            token: Some("secret".into()),
        },
        Duration::from_secs(5),
    )
    .expect("クライアント生成失敗");

    let mut book = LookBook::in_memory();
    let receipt = save_look(&mut book, look_at(4_000), Some(&remote))
        .await
        .expect("同期失敗");

    assert!(receipt.success);
    assert!(receipt.synced);
    assert_eq!(receipt.message, format!("Look saved and synced to {}", url));
    assert_eq!(book.len(), 1);

    let request = server.await.expect("サーバタスク失敗");
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /looks HTTP/1.1"));
    assert!(lower.contains("authorization: bearer secret"));
    assert!(request.contains("\"id\":\"4000\""));
    assert!(request.contains("\"garmentType\":\"dress\""));
}
