use std::fs;
use std::path::{Path, PathBuf};

/// Discover all .esql files in the queries/ directory
pub fn discover_queries() -> Vec<PathBuf> {
    let queries_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("queries");

    let mut queries: Vec<_> = fs::read_dir(&queries_dir)
        .expect("Failed to read queries directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("esql"))
        .collect();
    queries.sort();
    queries
}

/// Load a .esql file from queries/
pub fn load_query(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("queries")
        .join(format!("{}.esql", name));
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load query {name}: {e}"))
}
