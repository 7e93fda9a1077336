//! JSON input loading
//!
//! Accepts a top-level array of objects, an object wrapping such an array
//! under `items`, `playlists` or `tracks`, or JSON Lines with one object per
//! line. Entries that are not objects are skipped with a warning.

use crate::config::RecommenderConfig;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use tunerank_core::{Error, Item, Result, TrackRecord};

const WRAPPER_KEYS: &[&str] = &["items", "playlists", "tracks"];

/// Load candidate pool items from a JSON file
pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<Item>> {
    let path = path.as_ref();
    let values = read_objects(path)?;
    let items: Vec<Item> = values.into_iter().map(Item::from_value).collect();
    debug!(path = %path.display(), items = items.len(), "loaded items");
    Ok(items)
}

/// Load a listening history; playlists contribute their tracks
pub fn load_tracks(path: impl AsRef<Path>) -> Result<Vec<TrackRecord>> {
    let items = load_items(path)?;
    Ok(items
        .into_iter()
        .flat_map(|item| match item {
            Item::Playlist(p) => p.tracks,
            Item::Track(t) => vec![t],
        })
        .collect())
}

/// Load a serialized [`RecommenderConfig`]; missing keys take their defaults
pub fn load_config(path: impl AsRef<Path>) -> Result<RecommenderConfig> {
    let content = fs::read_to_string(path.as_ref())?;
    let config: RecommenderConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

fn read_objects(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let entries = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(entries)) => entries,
        Ok(Value::Object(mut map)) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find(|key| matches!(map.get(**key), Some(Value::Array(_))));
            match wrapped.and_then(|key| map.remove(*key)) {
                Some(Value::Array(entries)) => entries,
                _ => vec![Value::Object(map)],
            }
        }
        Ok(_) => {
            return Err(Error::Serialization(format!(
                "{}: expected an array or object",
                path.display()
            )))
        }
        Err(_) => parse_json_lines(path, &content)?,
    };

    let total = entries.len();
    let objects: Vec<Value> = entries.into_iter().filter(Value::is_object).collect();
    if objects.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - objects.len(),
            "skipped entries that are not JSON objects"
        );
    }
    Ok(objects)
}

fn parse_json_lines(path: &Path, content: &str) -> Result<Vec<Value>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| {
                Error::Serialization(format!("{} line {}: {}", path.display(), n + 1, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_array() {
        let file = file_with(r#"[{"id": "t1"}, {"playlist_id": "p1", "tracks": []}, 5]"#);
        let items = load_items(file.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].is_playlist());
    }

    #[test]
    fn test_load_wrapped() {
        let file = file_with(r#"{"playlists": [{"playlist_id": "p1", "tracks": [{"id": "t1"}]}]}"#);
        let items = load_items(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id().as_deref(), Some("p1"));
    }

    #[test]
    fn test_load_json_lines() {
        let file = file_with("{\"id\": \"t1\"}\n\n{\"id\": \"t2\"}\n");
        let items = load_items(file.path()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_bad_json_line_reports_line_number() {
        let file = file_with("{\"id\": \"t1\"}\n{oops\n");
        match load_items(file.path()) {
            Err(Error::Serialization(msg)) => assert!(msg.contains("line 2")),
            other => panic!("unexpected result: {:?}", other.map(|i| i.len())),
        }
    }

    #[test]
    fn test_history_flattens_playlists() {
        let file = file_with(
            r#"[{"playlist_id": "p1", "tracks": [{"id": "a"}, {"id": "b"}]}, {"id": "c"}]"#,
        );
        let tracks = load_tracks(file.path()).unwrap();
        let ids: Vec<_> = tracks.iter().filter_map(TrackRecord::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(load_items("/nonexistent/pool.json"), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_config() {
        let file = file_with(r#"{"signals": "text", "top_k": 5}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.top_k, 5);

        let file = file_with(r#"{"alpha": 2.0}"#);
        assert!(matches!(load_config(file.path()), Err(Error::InvalidConfig(_))));
    }
}
