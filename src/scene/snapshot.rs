use crate::entity::node::EntityMap;
use crate::geometry::shape::Geometry;
use crate::geometry::visual::VisualId;

/// Geometry of one visual in the tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotEntry {
    /// `root/child/...` path of the owning entity.
    pub path: String,
    pub visual: VisualId,
    pub geometry: Geometry,
}

/// Every persistent visual of the tree after an event pass, in traversal-independent
/// pre-order (parent before children, siblings in insertion order).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// 0-based index of the event that produced this state.
    pub pass: usize,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture<E>(pass: usize, roots: &EntityMap<E>) -> Self {
        let mut entries = Vec::new();
        for root in roots.values() {
            root.collect_snapshot("", &mut entries);
        }
        Self { pass, entries }
    }

    pub fn get(&self, path: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}
