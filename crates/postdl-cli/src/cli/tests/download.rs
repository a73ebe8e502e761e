//! Tests for the download subcommand.

use super::parse;
use clap::Parser;
use crate::cli::CliCommand;
use postdl_core::config::PostdlConfig;
use std::path::Path;

#[test]
fn cli_parse_download_defaults() {
    match parse(&["postdl", "download", "--tags", "cat"]) {
        CliCommand::Download {
            search,
            concurrents,
            out,
        } => {
            assert_eq!(search.tags, "cat");
            assert!(search.limit.is_none());
            assert!(search.proxy.is_none());
            assert!(concurrents.is_none());
            assert!(out.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_all_flags() {
    match parse(&[
        "postdl",
        "download",
        "--tags",
        "cat rating:safe",
        "--concurrents",
        "8",
        "--out",
        "/tmp/posts",
        "--limit",
        "250",
        "--proxy",
        "socks5://127.0.0.1:9050",
        "--timeout",
        "20",
    ]) {
        CliCommand::Download {
            search,
            concurrents,
            out,
        } => {
            assert_eq!(search.tags, "cat rating:safe");
            assert_eq!(search.limit, Some(250));
            assert_eq!(search.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
            assert_eq!(search.timeout, Some(20));
            assert_eq!(concurrents, Some(8));
            assert_eq!(out.as_deref(), Some(Path::new("/tmp/posts")));
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn flags_override_config() {
    let CliCommand::Download { search, .. } = parse(&[
        "postdl",
        "download",
        "--tags",
        "sky",
        "--limit",
        "5",
        "--timeout",
        "3",
        "--api-url",
        "http://127.0.0.1:8080/index.php",
    ]) else {
        panic!("expected Download");
    };
    let mut cfg = PostdlConfig {
        page_size: 2,
        ..PostdlConfig::default()
    };
    search.apply_to(&mut cfg);
    assert_eq!(cfg.timeout_secs, 3);
    assert_eq!(cfg.api_url, "http://127.0.0.1:8080/index.php");
    assert!(cfg.proxy.is_none());

    let query = search.query(&cfg);
    assert_eq!(query.tags, "sky");
    assert_eq!(query.limit, Some(5));
    assert_eq!(query.page_size, 2);
}

#[test]
fn cli_rejects_non_numeric_concurrents() {
    assert!(crate::cli::Cli::try_parse_from(["postdl", "download", "--concurrents", "many"]).is_err());
}
