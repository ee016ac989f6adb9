//! Placement store - the ordered list of placed items and the selection.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::gesture::TransformDelta;
use crate::item::{Item, ItemId, ItemTransform, Point};
use crate::motif::MotifKind;
use crate::snapshot::{BackgroundSource, CaptureSnapshot};

/// Maximum number of items that can be placed at once.
pub const MAX_ITEMS: usize = 15;

/// Spawn point used when the viewport has no size yet.
pub const FALLBACK_CENTER: Point = Point::new(150.0, 300.0);

/// Live viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Centre of the viewport.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Ordered collection of placed items plus the active selection.
///
/// Insertion order is draw order. The live view additionally lifts the
/// selected item to the top (see [`PlacementStore::live_render_order`]);
/// exports never do.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    items: Vec<Item>,
    selected: Option<ItemId>,
    viewport: Viewport,
    max_items: usize,
}

impl PlacementStore {
    /// Create an empty store for the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_max_items(viewport, MAX_ITEMS)
    }

    /// Create an empty store with a custom item limit.
    #[must_use]
    pub fn with_max_items(viewport: Viewport, max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            viewport,
            max_items,
        }
    }

    /// Place a new item at the viewport centre and select it.
    ///
    /// Returns `None` without changing anything when the store is full.
    pub fn add(&mut self, kind: MotifKind) -> Option<ItemId> {
        if self.items.len() >= self.max_items {
            tracing::debug!(kind = %kind, max = self.max_items, "item limit reached, ignoring add");
            return None;
        }
        let center = if self.viewport.has_area() {
            self.viewport.center()
        } else {
            FALLBACK_CENTER
        };
        let item = Item::new(kind, center);
        let id = item.id();
        self.items.push(item);
        self.selected = Some(id);
        tracing::debug!(%id, kind = %kind, "item added");
        Some(id)
    }

    /// Remove an item. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!(%id, "item removed");
        Some(self.items.remove(index))
    }

    /// Write a gesture result into the selected item.
    ///
    /// Returns `false` when `id` is not the current selection.
    pub fn apply_transform_delta(&mut self, id: ItemId, delta: TransformDelta) -> bool {
        if self.selected != Some(id) {
            return false;
        }
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.transform = delta.to_transform().clamped();
                true
            }
            None => false,
        }
    }

    /// Clear all items and the selection.
    pub fn reset(&mut self) {
        self.items.clear();
        self.selected = None;
    }

    /// Select an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn select(&mut self, id: ItemId) -> CoreResult<()> {
        if self.get(id).is_none() {
            return Err(CoreError::ItemNotFound(id.to_string()));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// The selected item id.
    #[must_use]
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// The selected item.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Get an item by ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Transform of an item by ID.
    #[must_use]
    pub fn transform_of(&self, id: ItemId) -> Option<ItemTransform> {
        self.get(id).map(|item| item.transform)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items in live-view draw order: insertion order with the selected item last.
    pub fn live_render_order(&self) -> impl Iterator<Item = &Item> {
        let selected = self.selected;
        self.items
            .iter()
            .filter(move |item| Some(item.id()) != selected)
            .chain(self.selected_item())
    }

    /// Topmost item (in live-view order) under a viewport point.
    #[must_use]
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        self.live_render_order()
            .filter(|item| item.contains_point(point))
            .last()
            .map(Item::id)
    }

    /// Number of placed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item limit.
    #[must_use]
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set the viewport dimensions.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Copy the scene for an export at the given raster size.
    #[must_use]
    pub fn snapshot(
        &self,
        background: BackgroundSource,
        target_width: u32,
        target_height: u32,
    ) -> CaptureSnapshot {
        CaptureSnapshot {
            background,
            items: self.items.clone(),
            viewport: self.viewport,
            target_width,
            target_height,
        }
    }
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self::new(Viewport::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(x: f32, y: f32, scale: f32, rotation: f32) -> TransformDelta {
        TransformDelta {
            position: Point::new(x, y),
            scale,
            rotation,
        }
    }

    #[test]
    fn test_add_centers_and_selects() {
        let mut store = PlacementStore::new(Viewport::new(400.0, 800.0));
        let id = store.add(MotifKind::Pot).expect("added");
        assert_eq!(store.selected(), Some(id));
        let item = store.get(id).expect("item");
        assert_eq!(item.transform.position, Point::new(200.0, 400.0));
        assert_eq!(item.transform.scale, 1.0);
        assert_eq!(item.kind(), MotifKind::Pot);
    }

    #[test]
    fn test_add_without_viewport_uses_fallback_center() {
        let mut store = PlacementStore::new(Viewport::new(0.0, 0.0));
        let id = store.add(MotifKind::Sun).expect("added");
        assert_eq!(store.transform_of(id).map(|t| t.position), Some(FALLBACK_CENTER));
    }

    #[test]
    fn test_add_beyond_limit_is_noop() {
        let mut store = PlacementStore::with_max_items(Viewport::new(100.0, 100.0), 2);
        let first = store.add(MotifKind::Pot);
        let second = store.add(MotifKind::Sun);
        assert!(first.is_some() && second.is_some());
        assert_eq!(store.add(MotifKind::Flower), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.selected(), second);
    }

    #[test]
    fn test_remove_selected_clears_selection_and_is_idempotent() {
        let mut store = PlacementStore::default();
        let id = store.add(MotifKind::Flower).expect("added");
        assert!(store.remove(id).is_some());
        assert_eq!(store.selected(), None);
        assert!(store.remove(id).is_none());
        assert!(!store.apply_transform_delta(id, delta(1.0, 1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut store = PlacementStore::default();
        let a = store.add(MotifKind::Pot).expect("a");
        let b = store.add(MotifKind::Sun).expect("b");
        store.remove(a);
        assert_eq!(store.selected(), Some(b));
    }

    #[test]
    fn test_delta_only_applies_to_selection() {
        let mut store = PlacementStore::default();
        let a = store.add(MotifKind::Pot).expect("a");
        let b = store.add(MotifKind::Sun).expect("b");

        assert!(!store.apply_transform_delta(a, delta(1.0, 2.0, 2.0, 30.0)));
        assert!(store.apply_transform_delta(b, delta(1.0, 2.0, 9.0, 30.0)));

        let t = store.transform_of(b).expect("b");
        assert_eq!(t.position, Point::new(1.0, 2.0));
        assert_eq!(t.scale, 3.0);
        assert_eq!(t.rotation, 30.0);
        assert_eq!(store.transform_of(a).map(|t| t.rotation), Some(0.0));
    }

    #[test]
    fn test_live_order_lifts_selection() {
        let mut store = PlacementStore::default();
        let a = store.add(MotifKind::Pot).expect("a");
        let b = store.add(MotifKind::Sun).expect("b");
        let c = store.add(MotifKind::Flower).expect("c");
        store.select(a).expect("select");

        let live: Vec<_> = store.live_render_order().map(Item::id).collect();
        assert_eq!(live, vec![b, c, a]);
        let stored: Vec<_> = store.items().iter().map(Item::id).collect();
        assert_eq!(stored, vec![a, b, c]);
    }

    #[test]
    fn test_item_at_prefers_selected_on_overlap() {
        let mut store = PlacementStore::default();
        let a = store.add(MotifKind::Pot).expect("a");
        let b = store.add(MotifKind::Sun).expect("b");
        let center = store.viewport().center();
        assert_eq!(store.item_at(center), Some(b));
        store.select(a).expect("select");
        assert_eq!(store.item_at(center), Some(a));
        assert_eq!(store.item_at(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_select_unknown_fails() {
        let mut store = PlacementStore::default();
        assert!(matches!(
            store.select(ItemId::new()),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = PlacementStore::default();
        store.add(MotifKind::Pot);
        store.add(MotifKind::Sun);
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_snapshot_is_a_value_copy() {
        let mut store = PlacementStore::default();
        let id = store.add(MotifKind::Pot).expect("added");
        let snapshot = store.snapshot(BackgroundSource::Empty, 800, 600);

        store.apply_transform_delta(id, delta(0.0, 0.0, 2.0, 90.0));
        store.remove(id);

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].transform.scale, 1.0);
        assert_eq!(snapshot.viewport, store.viewport());
    }
}
