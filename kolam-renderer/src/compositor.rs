//! Offscreen compositor.
//!
//! Rebuilds the live scene at export resolution: the background is drawn
//! with cover semantics, then every item is replayed in insertion order with
//! the same translate / rotate / scale / centre-offset the live view uses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use kolam_core::{CaptureSnapshot, Frame, Item, MotifKind};
use tiny_skia::{Color, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

use crate::error::{RenderError, RenderResult};

/// Fill used when the background has no frame.
pub const FALLBACK_FILL: [u8; 3] = [0x33, 0x33, 0x33];

/// Placement of a background source inside the target, in target pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Left edge (may be negative).
    pub x: f32,
    /// Top edge (may be negative).
    pub y: f32,
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
}

/// Scale a source to cover the target, centred, cropping the overflow.
///
/// A source wider than the target matches the target height and is centred
/// horizontally; otherwise it matches the width and is centred vertically.
#[must_use]
pub fn cover_fit(src_w: f32, src_h: f32, dst_w: f32, dst_h: f32) -> CoverFit {
    let src_ratio = src_w / src_h;
    let dst_ratio = dst_w / dst_h;
    if src_ratio > dst_ratio {
        let width = dst_h * src_ratio;
        CoverFit {
            x: (dst_w - width) / 2.0,
            y: 0.0,
            width,
            height: dst_h,
        }
    } else {
        let height = dst_w / src_ratio;
        CoverFit {
            x: 0.0,
            y: (dst_h - height) / 2.0,
            width: dst_w,
            height,
        }
    }
}

/// Transform mapping an item's draw box `[0, w] x [0, h]` into target pixels.
///
/// Applied to a point this is: centre offset, item scale, item rotation,
/// item translation, then viewport-to-target scaling.
#[must_use]
pub fn replay_transform(item: &Item, scale_factor: f32, draw_size: (f32, f32)) -> Transform {
    let t = item.transform;
    let (w, h) = draw_size;
    Transform::from_scale(scale_factor, scale_factor)
        .pre_translate(t.position.x, t.position.y)
        .pre_concat(Transform::from_rotate(t.rotation))
        .pre_scale(t.scale, t.scale)
        .pre_translate(-w / 2.0, -h / 2.0)
}

/// Resolves a motif kind to a parsed, drawable SVG tree.
pub trait MotifResolver {
    /// Load the drawable for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] if the asset cannot be loaded.
    fn resolve(&self, kind: MotifKind) -> RenderResult<Arc<usvg::Tree>>;
}

/// Resolver backed by the built-in motif catalog. Parsed trees are cached.
#[derive(Default)]
pub struct CatalogResolver {
    cache: Mutex<HashMap<MotifKind, Arc<usvg::Tree>>>,
}

impl CatalogResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached trees.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl MotifResolver for CatalogResolver {
    fn resolve(&self, kind: MotifKind) -> RenderResult<Arc<usvg::Tree>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tree) = cache.get(&kind) {
            return Ok(Arc::clone(tree));
        }
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(kind.asset().canonical_svg, &opt)
            .map_err(|e| RenderError::Resource(format!("motif {kind}: {e}")))?;
        let tree = Arc::new(tree);
        cache.insert(kind, Arc::clone(&tree));
        tracing::debug!(%kind, "motif asset parsed");
        Ok(tree)
    }
}

impl std::fmt::Debug for CatalogResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogResolver")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

/// Composites capture snapshots into raster images.
pub struct Compositor {
    resolver: Box<dyn MotifResolver>,
}

impl Compositor {
    /// Compositor using the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(CatalogResolver::new())
    }

    /// Compositor using a custom asset resolver.
    #[must_use]
    pub fn with_resolver(resolver: impl MotifResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Render a snapshot at its target size.
    ///
    /// Items whose asset fails to load are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pixmap`] if the target size cannot be allocated.
    pub fn composite(&self, snapshot: &CaptureSnapshot) -> RenderResult<Pixmap> {
        let (width, height) = (snapshot.target_width, snapshot.target_height);
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;

        Self::draw_background(&mut pixmap, snapshot);

        // Load every distinct asset before drawing anything.
        let mut trees: HashMap<MotifKind, Arc<usvg::Tree>> = HashMap::new();
        for item in &snapshot.items {
            let kind = item.kind();
            if trees.contains_key(&kind) {
                continue;
            }
            match self.resolver.resolve(kind) {
                Ok(tree) => {
                    trees.insert(kind, tree);
                }
                Err(e) => tracing::warn!(%kind, error = %e, "motif asset unavailable, skipping"),
            }
        }

        let scale_factor = snapshot.scale_factor();
        let mut drawn = 0usize;
        for item in &snapshot.items {
            let Some(tree) = trees.get(&item.kind()) else {
                continue;
            };
            let size = tree.size();
            let (w, h) = item.kind().draw_size();
            let transform = replay_transform(item, scale_factor, (w, h))
                .pre_scale(w / size.width(), h / size.height());
            resvg::render(tree, transform, &mut pixmap.as_mut());
            drawn += 1;
        }

        tracing::info!(
            width,
            height,
            items = snapshot.items.len(),
            drawn,
            "capture composited"
        );
        Ok(pixmap)
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_background(pixmap: &mut Pixmap, snapshot: &CaptureSnapshot) {
        let source = snapshot.background.frame().and_then(frame_to_pixmap);
        let Some(source) = source else {
            tracing::warn!("no background frame, using fallback fill");
            let [r, g, b] = FALLBACK_FILL;
            pixmap.fill(Color::from_rgba8(r, g, b, 255));
            return;
        };

        let (src_w, src_h) = (source.width() as f32, source.height() as f32);
        let fit = cover_fit(
            src_w,
            src_h,
            snapshot.target_width as f32,
            snapshot.target_height as f32,
        );
        let transform =
            Transform::from_row(fit.width / src_w, 0.0, 0.0, fit.height / src_h, fit.x, fit.y);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor").finish_non_exhaustive()
    }
}

/// Premultiply a straight-alpha frame into a pixmap.
#[allow(clippy::cast_possible_truncation)]
fn frame_to_pixmap(frame: &Frame) -> Option<Pixmap> {
    let size = IntSize::from_wh(frame.width(), frame.height())?;
    let mut data = frame.data().to_vec();
    for px in data.chunks_exact_mut(4) {
        let alpha = u16::from(px[3]);
        for channel in &mut px[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}
