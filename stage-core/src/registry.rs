//! Ordered collection of media items placed on the canvas

use crate::media::{MediaId, MediaItem, MediaPatch};
use crate::upload::UploadedFile;
use crate::{Error, ItemDefaults, Result};
use tracing::debug;

/// Media registry. Items keep their insertion order and are never removed.
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    items: Vec<MediaItem>,
    defaults: ItemDefaults,
}

impl MediaRegistry {
    /// Creates an empty registry using the standard item defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose new items start from `defaults`
    pub fn with_defaults(defaults: ItemDefaults) -> Self {
        Self {
            items: Vec::new(),
            defaults,
        }
    }

    /// Appends one item per uploaded file and returns how many were added.
    ///
    /// An empty batch leaves the registry untouched and fails with [`Error::NoValidFiles`].
    pub fn add<I>(&mut self, files: I) -> Result<usize>
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        let defaults = self.defaults;
        let start = self.items.len();
        self.items.extend(files.into_iter().map(|file| {
            MediaItem::new(file.kind(), file.source, defaults.geometry, defaults.window)
        }));

        let added = self.items.len() - start;
        if added == 0 {
            return Err(Error::NoValidFiles);
        }
        debug!(added, total = self.items.len(), "registered media items");
        Ok(added)
    }

    /// Merges `patch` into the item with the given id.
    ///
    /// Returns whether an item matched; an unknown id is a no-op.
    pub fn update(&mut self, id: MediaId, patch: &MediaPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(patch);
                debug!(%id, ?patch, "updated media item");
                true
            }
            None => false,
        }
    }

    /// Gets an item by id
    pub fn get(&self, id: MediaId) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Gets the item at a zero-based position
    pub fn get_index(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Latest end time across all items, `0.0` when empty.
    ///
    /// NaN end times count as zero; infinite ones are kept, so playback never ends on its own.
    pub fn max_end_time(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.window.end_time)
            .map(|end| if end.is_nan() { 0.0 } else { end })
            .fold(0.0, f64::max)
    }

    /// Gets all items shown at the given clock value, in registry order
    pub fn visible_at(&self, value: u64) -> Vec<&MediaItem> {
        self.items
            .iter()
            .filter(|item| item.is_visible(value))
            .collect()
    }

    /// One-based display label for the item at `index`
    pub fn label(index: usize) -> String {
        format!("Media {}", index + 1)
    }

    /// Iterates over items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter()
    }

    /// Returns all items in insertion order
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Returns the number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been uploaded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the values new items start from
    pub fn defaults(&self) -> &ItemDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Geometry, MediaKind};
    use crate::timeline::VisibilityWindow;

    fn files(n: usize) -> Vec<UploadedFile> {
        (0..n)
            .map(|i| UploadedFile::new("image/png", format!("blob:{}", i)))
            .collect()
    }

    #[test]
    fn test_add_applies_defaults() {
        let mut registry = MediaRegistry::new();
        let added = registry
            .add(vec![
                UploadedFile::new("image/jpeg", "blob:a"),
                UploadedFile::new("video/mp4", "blob:b"),
            ])
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(registry.len(), 2);
        for item in registry.iter() {
            assert_eq!(item.geometry, Geometry::new(50.0, 50.0, 200.0, 150.0));
            assert_eq!(item.window, VisibilityWindow::new(0.0, 5.0));
        }
        assert_eq!(registry.items()[0].kind, MediaKind::Image);
        assert_eq!(registry.items()[1].kind, MediaKind::Video);
        assert_eq!(registry.items()[1].source.as_str(), "blob:b");
    }

    #[test]
    fn test_add_preserves_order() {
        let mut registry = MediaRegistry::new();
        registry.add(files(2)).unwrap();
        let first: Vec<MediaId> = registry.iter().map(|item| item.id).collect();

        registry.add(files(3)).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.items()[0].id, first[0]);
        assert_eq!(registry.items()[1].id, first[1]);
        let sources: Vec<&str> = registry.iter().map(|item| item.source.as_str()).collect();
        assert_eq!(sources, vec!["blob:0", "blob:1", "blob:0", "blob:1", "blob:2"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = MediaRegistry::new();
        registry.add(files(50)).unwrap();

        let mut ids: Vec<MediaId> = registry.iter().map(|item| item.id).collect();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_add_empty_batch_fails() {
        let mut registry = MediaRegistry::new();
        registry.add(files(1)).unwrap();
        let before = registry.items().to_vec();

        let result = registry.add(Vec::new());

        assert!(matches!(result, Err(Error::NoValidFiles)));
        assert_eq!(registry.items(), before.as_slice());
    }

    #[test]
    fn test_update_single_field() {
        let mut registry = MediaRegistry::new();
        registry.add(files(3)).unwrap();
        let before = registry.items().to_vec();
        let id = before[1].id;

        assert!(registry.update(id, &MediaPatch::default().width(300.0)));

        let mut expected = before.clone();
        expected[1].geometry.width = 300.0;
        assert_eq!(registry.items(), expected.as_slice());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut registry = MediaRegistry::new();
        registry.add(files(2)).unwrap();
        let before = registry.items().to_vec();

        assert!(!registry.update(MediaId::new(), &MediaPatch::resized(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(registry.items(), before.as_slice());
    }

    #[test]
    fn test_max_end_time() {
        let mut registry = MediaRegistry::new();
        assert_eq!(registry.max_end_time(), 0.0);

        registry.add(files(3)).unwrap();
        assert_eq!(registry.max_end_time(), 5.0);

        let id = registry.items()[2].id;
        registry.update(id, &MediaPatch::default().end_time(12.5));
        assert_eq!(registry.max_end_time(), 12.5);

        registry.update(id, &MediaPatch::default().end_time(f64::NAN));
        assert_eq!(registry.max_end_time(), 5.0);
    }

    #[test]
    fn test_max_end_time_keeps_infinite_end() {
        let mut registry = MediaRegistry::new();
        registry.add(files(2)).unwrap();
        let id = registry.items()[0].id;
        registry.update(id, &MediaPatch::default().end_time(f64::INFINITY));

        assert_eq!(registry.max_end_time(), f64::INFINITY);
        assert!(registry.items()[0].is_visible(100));

        registry.update(id, &MediaPatch::default().end_time(f64::NEG_INFINITY));
        assert_eq!(registry.max_end_time(), 5.0);
    }

    #[test]
    fn test_visible_at_filters_in_order() {
        let mut registry = MediaRegistry::new();
        registry.add(files(3)).unwrap();
        let ids: Vec<MediaId> = registry.iter().map(|item| item.id).collect();
        registry.update(ids[0], &MediaPatch::default().start_time(2.0).end_time(4.0));
        registry.update(ids[2], &MediaPatch::default().start_time(3.0).end_time(1.0));

        let at = |value| -> Vec<MediaId> {
            registry.visible_at(value).iter().map(|item| item.id).collect()
        };
        assert_eq!(at(0), vec![ids[1]]);
        assert_eq!(at(2), vec![ids[0], ids[1]]);
        assert_eq!(at(4), vec![ids[1]]);
        assert_eq!(at(5), Vec::<MediaId>::new());
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = ItemDefaults {
            geometry: Geometry::new(0.0, 0.0, 640.0, 360.0),
            window: VisibilityWindow::new(1.0, 2.0),
        };
        let mut registry = MediaRegistry::with_defaults(defaults);
        registry.add(files(1)).unwrap();

        assert_eq!(registry.items()[0].geometry.width, 640.0);
        assert_eq!(registry.max_end_time(), 2.0);
    }

    #[test]
    fn test_labels_are_one_based() {
        assert_eq!(MediaRegistry::label(0), "Media 1");
        assert_eq!(MediaRegistry::label(9), "Media 10");
    }
}
