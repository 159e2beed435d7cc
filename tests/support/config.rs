use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write `contents` as `deployctl.toml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("deployctl.toml");
    fs::write(&path, contents).expect("write config");
    path
}

/// A scratch directory holding a config file.
pub fn temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_config(dir.path(), contents);
    (dir, path)
}

pub const TESTNET_CONFIG: &str = r#"
network = "testnet"

[endpoints]
indexer = "https://indexer.testnet.example/api/v1/graphql"
indexer_ws = "wss://indexer.testnet.example/api/v1/graphql/ws"
node = "https://rpc.testnet.example"
proof_server = "http://127.0.0.1:6300"
"#;
