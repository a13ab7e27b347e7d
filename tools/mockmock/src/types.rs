use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTEXT: &str = "default";

/// Which recording API produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockKind {
    /// Raw payloads handed to `record`.
    Data,
    /// Results of wrapped synchronous calls.
    Sync,
    /// Results of wrapped asynchronous calls.
    Async,
}

impl MockKind {
    pub const ALL: [MockKind; 3] = [MockKind::Data, MockKind::Sync, MockKind::Async];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

impl std::fmt::Display for MockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`MockKind`], so a context can never be partially shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindMap<T> {
    pub data: T,
    pub sync: T,
    #[serde(rename = "async")]
    pub async_: T,
}

impl<T> KindMap<T> {
    pub fn get(&self, kind: MockKind) -> &T {
        match kind {
            MockKind::Data => &self.data,
            MockKind::Sync => &self.sync,
            MockKind::Async => &self.async_,
        }
    }

    pub fn get_mut(&mut self, kind: MockKind) -> &mut T {
        match kind {
            MockKind::Data => &mut self.data,
            MockKind::Sync => &mut self.sync,
            MockKind::Async => &mut self.async_,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KindMap, MockKind};

    #[test]
    fn kind_strings_match_their_serde_names() {
        for kind in MockKind::ALL {
            assert_eq!(serde_json::to_value(kind).expect("serialize"), kind.as_str());
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!(serde_json::from_str::<MockKind>("\"requests\"").is_err());
    }

    #[test]
    fn kind_map_serializes_async_under_its_keyword_name() {
        let map = KindMap {
            data: 1,
            sync: 2,
            async_: 3,
        };
        let json = serde_json::to_value(&map).expect("serialize");
        assert_eq!(json, serde_json::json!({"data": 1, "sync": 2, "async": 3}));
    }

    #[test]
    fn kind_map_routes_each_kind_to_its_own_slot() {
        let mut map: KindMap<Vec<&str>> = KindMap::default();
        map.get_mut(MockKind::Async).push("a");
        assert!(map.get(MockKind::Data).is_empty());
        assert!(map.get(MockKind::Sync).is_empty());
        assert_eq!(map.get(MockKind::Async), &vec!["a"]);
    }
}
