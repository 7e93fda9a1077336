//! Track, playlist and candidate records
//!
//! Records arrive from several exports that disagree on key names
//! (`track_name` vs `name` vs `Title`, `Spotify ID` vs `id`). Every
//! descriptive field is resolved through an ordered alias list; the first
//! alias holding a non-empty value wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier keys, in precedence order. Shared by the query and candidate side.
pub const ID_ALIASES: &[&str] = &["id", "track_id", "playlist_id", "Track ID", "Spotify ID"];
pub const TITLE_ALIASES: &[&str] = &["title", "name", "track_name", "Title", "track_title"];
pub const ARTIST_ALIASES: &[&str] = &["artist", "artists", "Artist"];
pub const GENRE_ALIASES: &[&str] = &["genre", "track_genre", "Genre"];
pub const TEXT_ALIASES: &[&str] = &["text", "name_text"];

/// Nested object some exports use to carry audio features
pub const FEATURES_KEY: &str = "features";

/// A single track as a flexible key/value record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TrackRecord {
    fields: Map<String, Value>,
}

impl TrackRecord {
    #[inline]
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from a JSON value; anything but an object becomes an empty record
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// First alias with a present, non-empty value.
    ///
    /// Looks at the top level first, then inside the nested `features` object.
    pub fn lookup(&self, aliases: &[&str]) -> Option<&Value> {
        let nested = self.fields.get(FEATURES_KEY).and_then(Value::as_object);
        aliases.iter().find_map(|key| {
            self.fields
                .get(*key)
                .filter(|v| is_present(v))
                .or_else(|| nested.and_then(|n| n.get(*key)).filter(|v| is_present(v)))
        })
    }

    /// First alias rendered as text (numbers keep their JSON form)
    pub fn lookup_text(&self, aliases: &[&str]) -> Option<String> {
        self.lookup(aliases).and_then(value_to_text)
    }

    pub fn id(&self) -> Option<String> {
        self.lookup_text(ID_ALIASES)
    }

    pub fn title(&self) -> Option<String> {
        self.lookup_text(TITLE_ALIASES)
    }

    pub fn artist(&self) -> Option<String> {
        self.lookup_text(ARTIST_ALIASES)
    }

    pub fn genre(&self) -> Option<String> {
        self.lookup_text(GENRE_ALIASES)
    }

    /// Text document for the track: the pre-combined text field, else `title artist`
    pub fn document(&self) -> String {
        if let Some(text) = self.lookup_text(TEXT_ALIASES) {
            return text;
        }
        [self.title(), self.artist()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `"title - artist"` label used in reports
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.title().unwrap_or_else(|| "Unknown".to_string()),
            self.artist().unwrap_or_else(|| "Unknown".to_string())
        )
    }
}

impl From<Map<String, Value>> for TrackRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A playlist: its own descriptive fields plus an ordered track list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    #[serde(flatten)]
    pub meta: TrackRecord,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

impl Playlist {
    pub fn new(meta: TrackRecord, tracks: Vec<TrackRecord>) -> Self {
        Self { meta, tracks }
    }
}

/// A member of the candidate pool
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Item {
    /// A playlist with a `tracks` list
    Playlist(Playlist),
    /// A standalone track
    Track(TrackRecord),
}

impl Item {
    /// Interpret a JSON object: objects carrying a `tracks` array are playlists
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => match fields.remove("tracks") {
                Some(Value::Array(tracks)) => Item::Playlist(Playlist::new(
                    TrackRecord::new(fields),
                    tracks.into_iter().map(TrackRecord::from_value).collect(),
                )),
                Some(other) => {
                    fields.insert("tracks".to_string(), other);
                    Item::Track(TrackRecord::new(fields))
                }
                None => Item::Track(TrackRecord::new(fields)),
            },
            _ => Item::Track(TrackRecord::default()),
        }
    }

    /// The item's own descriptive record
    pub fn record(&self) -> &TrackRecord {
        match self {
            Item::Playlist(p) => &p.meta,
            Item::Track(t) => t,
        }
    }

    /// Tracks the item aggregates over; a track is its own single track
    pub fn tracks(&self) -> &[TrackRecord] {
        match self {
            Item::Playlist(p) => &p.tracks,
            Item::Track(t) => std::slice::from_ref(t),
        }
    }

    #[inline]
    pub fn is_playlist(&self) -> bool {
        matches!(self, Item::Playlist(_))
    }

    pub fn id(&self) -> Option<String> {
        self.record().id()
    }

    pub fn title(&self) -> Option<String> {
        self.record().title()
    }

    pub fn artist(&self) -> Option<String> {
        self.record().artist()
    }

    pub fn genre(&self) -> Option<String> {
        self.record().genre()
    }

    /// Category value under `field`, e.g. the playlist `type`
    pub fn category(&self, field: &str) -> Option<String> {
        self.record().lookup_text(&[field])
    }

    /// Text document: a track's own text, or a playlist's track texts joined by spaces
    pub fn document(&self) -> String {
        match self {
            Item::Playlist(p) => join_documents(&p.tracks),
            Item::Track(t) => t.document(),
        }
    }

    /// Identifiers of the tracks this item contains, plus its own
    pub fn known_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.id().into_iter().collect();
        if let Item::Playlist(p) = self {
            ids.extend(p.tracks.iter().filter_map(TrackRecord::id));
        }
        ids
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Item::from_value)
    }
}

impl From<TrackRecord> for Item {
    fn from(record: TrackRecord) -> Self {
        Item::Track(record)
    }
}

impl From<Playlist> for Item {
    fn from(playlist: Playlist) -> Self {
        Item::Playlist(playlist)
    }
}

/// Space-joined documents of a track list, skipping empty ones
pub fn join_documents(tracks: &[TrackRecord]) -> String {
    tracks
        .iter()
        .map(TrackRecord::document)
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which categories may query and which may be recommended
///
/// With `field = "type"`, `query_values = ["PMS"]`, `target_values = ["EMS"]`
/// personal playlists are queries and only platform playlists are recommended.
/// An empty value list accepts every item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EligibilityRule {
    pub field: String,
    #[serde(default)]
    pub query_values: Vec<String>,
    #[serde(default)]
    pub target_values: Vec<String>,
}

impl EligibilityRule {
    pub fn new(field: impl Into<String>, query_values: &[&str], target_values: &[&str]) -> Self {
        Self {
            field: field.into(),
            query_values: query_values.iter().map(|s| s.to_string()).collect(),
            target_values: target_values.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The personal/platform split of the playlist exports
    pub fn personal_to_platform() -> Self {
        Self::new("type", &["PMS"], &["EMS"])
    }

    pub fn is_query(&self, item: &Item) -> bool {
        Self::accepts(&self.query_values, item.category(&self.field))
    }

    pub fn is_target(&self, item: &Item) -> bool {
        Self::accepts(&self.target_values, item.category(&self.field))
    }

    fn accepts(values: &[String], category: Option<String>) -> bool {
        if values.is_empty() {
            return true;
        }
        match category {
            Some(c) => values.iter().any(|v| v.eq_ignore_ascii_case(&c)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TrackRecord {
        TrackRecord::from_value(value)
    }

    #[test]
    fn test_lookup_prefers_first_alias() {
        let r = record(json!({"id": "a", "Spotify ID": "b"}));
        assert_eq!(r.id(), Some("a".to_string()));
    }

    #[test]
    fn test_lookup_skips_empty_values() {
        let r = record(json!({"id": "  ", "track_id": "t-1"}));
        assert_eq!(r.id(), Some("t-1".to_string()));
    }

    #[test]
    fn test_numeric_id_rendered_as_text() {
        let r = record(json!({"playlist_id": 42}));
        assert_eq!(r.id(), Some("42".to_string()));
    }

    #[test]
    fn test_lookup_reads_nested_features() {
        let r = record(json!({"features": {"energy": 0.8}}));
        assert_eq!(r.lookup(&["energy"]), Some(&json!(0.8)));
    }

    #[test]
    fn test_document_falls_back_to_title_and_artist() {
        let r = record(json!({"track_name": "Blue", "artists": "Joni Mitchell"}));
        assert_eq!(r.document(), "Blue Joni Mitchell");

        let r = record(json!({"name_text": "Hurt Johnny Cash", "title": "Ignored"}));
        assert_eq!(r.document(), "Hurt Johnny Cash");
    }

    #[test]
    fn test_item_from_value_detects_playlists() {
        let item = Item::from_value(json!({
            "playlist_id": 7,
            "title": "Late Night",
            "type": "PMS",
            "tracks": [{"title": "A", "artist": "X"}, {"title": "B", "artist": "Y"}]
        }));
        assert!(item.is_playlist());
        assert_eq!(item.tracks().len(), 2);
        assert_eq!(item.document(), "A X B Y");
        assert_eq!(item.category("type"), Some("PMS".to_string()));

        let track = Item::from_value(json!({"id": "t1", "title": "Solo"}));
        assert!(!track.is_playlist());
        assert_eq!(track.tracks().len(), 1);
    }

    #[test]
    fn test_playlist_deserializes_with_flattened_meta() {
        let playlist: Playlist = serde_json::from_value(json!({
            "playlist_id": "p1",
            "title": "Focus",
            "tracks": [{"track_id": "t1"}]
        }))
        .unwrap();
        assert_eq!(playlist.meta.id(), Some("p1".to_string()));
        assert_eq!(playlist.tracks[0].id(), Some("t1".to_string()));
    }

    #[test]
    fn test_item_deserializes_by_shape() {
        let items: Vec<Item> = serde_json::from_value(json!([
            {"id": "t1", "title": "Solo"},
            {"playlist_id": "p1", "tracks": [{"id": "t2"}]}
        ]))
        .unwrap();
        assert!(!items[0].is_playlist());
        assert!(items[1].is_playlist());
    }

    #[test]
    fn test_known_ids_include_tracks() {
        let item = Item::from_value(json!({
            "playlist_id": "p1",
            "tracks": [{"track_id": "t1"}, {"title": "no id"}, {"id": "t2"}]
        }));
        assert_eq!(item.known_ids(), vec!["p1", "t1", "t2"]);
    }

    #[test]
    fn test_eligibility_rule() {
        let rule = EligibilityRule::personal_to_platform();
        let personal = Item::from_value(json!({"type": "PMS", "tracks": []}));
        let platform = Item::from_value(json!({"type": "ems", "tracks": []}));
        let untyped = Item::from_value(json!({"tracks": []}));

        assert!(rule.is_query(&personal));
        assert!(!rule.is_target(&personal));
        assert!(rule.is_target(&platform));
        assert!(!rule.is_query(&untyped));
        assert!(!rule.is_target(&untyped));
    }
}
