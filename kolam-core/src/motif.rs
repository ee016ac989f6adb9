//! Motif catalog - the fixed set of placeable kolam designs.
//!
//! Every motif is authored as an SVG document. The canonical design is what
//! the live view shows and what the compositor rasterizes; the icon is a
//! lighter variant for toolbar buttons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Side length of the square logical tile every item occupies.
pub const TILE_SIZE: f32 = 100.0;

/// The available motif designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    /// Paal panai, the overflowing milk pot.
    Pot,
    /// Sugarcane stalk. The only non-square design (1:3).
    Sugarcane,
    /// Sun with eight rays.
    Sun,
    /// Simple dotted diamond kolam.
    DotsSimple,
    /// Looped kolam over a cross of dots.
    DotsComplex,
    /// Six petal flower.
    Flower,
}

/// Rendering resources for one motif kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifAsset {
    /// Full design, shown live and rasterized on export.
    pub canonical_svg: &'static str,
    /// Simplified design for toolbar buttons.
    pub icon_svg: &'static str,
    /// Intrinsic SVG view box (width, height).
    pub view_box: (f32, f32),
}

impl MotifKind {
    /// All motif kinds in toolbar order.
    pub const ALL: [Self; 6] = [
        Self::Pot,
        Self::Sugarcane,
        Self::Sun,
        Self::DotsSimple,
        Self::DotsComplex,
        Self::Flower,
    ];

    /// Stable identifier used in scripts and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pot => "pot",
            Self::Sugarcane => "sugarcane",
            Self::Sun => "sun",
            Self::DotsSimple => "dots_simple",
            Self::DotsComplex => "dots_complex",
            Self::Flower => "flower",
        }
    }

    /// Resolve the catalog entry for this kind.
    #[must_use]
    pub const fn asset(self) -> MotifAsset {
        match self {
            Self::Pot => MotifAsset {
                canonical_svg: POT_SVG,
                icon_svg: POT_ICON,
                view_box: (100.0, 100.0),
            },
            Self::Sugarcane => MotifAsset {
                canonical_svg: SUGARCANE_SVG,
                icon_svg: SUGARCANE_ICON,
                view_box: (50.0, 150.0),
            },
            Self::Sun => MotifAsset {
                canonical_svg: SUN_SVG,
                icon_svg: SUN_ICON,
                view_box: (100.0, 100.0),
            },
            Self::DotsSimple => MotifAsset {
                canonical_svg: DOTS_SIMPLE_SVG,
                icon_svg: DOTS_SIMPLE_ICON,
                view_box: (100.0, 100.0),
            },
            Self::DotsComplex => MotifAsset {
                canonical_svg: DOTS_COMPLEX_SVG,
                icon_svg: DOTS_COMPLEX_ICON,
                view_box: (100.0, 100.0),
            },
            Self::Flower => MotifAsset {
                canonical_svg: FLOWER_SVG,
                icon_svg: FLOWER_ICON,
                view_box: (100.0, 100.0),
            },
        }
    }

    /// Size the motif is drawn at inside its tile, before item scaling.
    ///
    /// The view box is fitted into the `TILE_SIZE` square preserving its
    /// aspect ratio, so square designs fill the tile and the sugarcane
    /// keeps its 1:3 shape.
    #[must_use]
    pub fn draw_size(self) -> (f32, f32) {
        let (w, h) = self.asset().view_box;
        let fit = (TILE_SIZE / w).min(TILE_SIZE / h);
        (w * fit, h * fit)
    }
}

impl fmt::Display for MotifKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotifKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownMotif(s.to_string()))
    }
}

const POT_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100" fill="none" stroke-width="2">"##,
    r##"<path d="M30,40 Q20,60 30,80 Q50,95 70,80 Q80,60 70,40" fill="#D4A373" stroke="#795548"/>"##,
    r##"<path d="M30,40 L70,40 L75,30 L25,30 Z" fill="#E6BE8A" stroke="#795548"/>"##,
    r##"<path d="M35,30 Q50,20 65,30" fill="white" stroke="#FFF" stroke-width="3"/>"##,
    r##"<path d="M40,30 Q40,50 42,60" stroke="white" stroke-width="3" stroke-linecap="round"/>"##,
    r##"<path d="M50,30 Q55,50 52,65" stroke="white" stroke-width="3" stroke-linecap="round"/>"##,
    r##"<path d="M60,30 Q60,50 58,55" stroke="white" stroke-width="3" stroke-linecap="round"/>"##,
    "</svg>"
);

const SUGARCANE_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 150" width="50" height="150" fill="none">"##,
    r##"<path d="M25,140 L25,20" stroke="#4CAF50" stroke-width="8" stroke-linecap="round"/>"##,
    r##"<line x1="20" y1="40" x2="30" y2="40" stroke="#2E7D32" stroke-width="2"/>"##,
    r##"<line x1="20" y1="70" x2="30" y2="70" stroke="#2E7D32" stroke-width="2"/>"##,
    r##"<line x1="20" y1="100" x2="30" y2="100" stroke="#2E7D32" stroke-width="2"/>"##,
    r##"<path d="M25,20 Q10,10 5,30" stroke="#81C784" stroke-width="4"/>"##,
    r##"<path d="M25,20 Q40,10 45,30" stroke="#81C784" stroke-width="4"/>"##,
    r##"<path d="M25,20 Q25,5 25,0" stroke="#81C784" stroke-width="4"/>"##,
    "</svg>"
);

const SUN_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">"##,
    r##"<g stroke="#FF9800" stroke-width="4">"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(0 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(45 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(90 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(135 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(180 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(225 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(270 50 50)"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" transform="rotate(315 50 50)"/>"##,
    "</g>",
    r##"<circle cx="50" cy="50" r="20" fill="#FFC107" stroke="#FF9800" stroke-width="2"/>"##,
    "</svg>"
);

const DOTS_SIMPLE_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">"##,
    r##"<path d="M50,10 L90,50 L50,90 L10,50 Z" stroke="black" stroke-width="3" fill="none"/>"##,
    r##"<circle cx="50" cy="50" r="5" fill="black"/>"##,
    r##"<circle cx="10" cy="50" r="3" fill="black"/>"##,
    r##"<circle cx="90" cy="50" r="3" fill="black"/>"##,
    r##"<circle cx="50" cy="10" r="3" fill="black"/>"##,
    r##"<circle cx="50" cy="90" r="3" fill="black"/>"##,
    "</svg>"
);

const DOTS_COMPLEX_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">"##,
    r##"<path d="M50,20 Q80,20 80,50 Q80,80 50,80 Q20,80 20,50 Q20,20 50,20" stroke="black" stroke-width="2" fill="none"/>"##,
    r##"<path d="M50,10 L50,90" stroke="black" stroke-width="2"/>"##,
    r##"<path d="M10,50 L90,50" stroke="black" stroke-width="2"/>"##,
    r##"<circle cx="50" cy="50" r="10" stroke="black" stroke-width="2" fill="none"/>"##,
    "</svg>"
);

const FLOWER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">"##,
    r##"<g fill="black" stroke="white" stroke-width="1" opacity="0.9">"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(0 50 50)"/>"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(60 50 50)"/>"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(120 50 50)"/>"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(180 50 50)"/>"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(240 50 50)"/>"##,
    r##"<ellipse cx="50" cy="30" rx="10" ry="25" transform="rotate(300 50 50)"/>"##,
    "</g>",
    r##"<circle cx="50" cy="50" r="10" fill="black"/>"##,
    "</svg>"
);

const POT_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
    r##"<path d="M30,40 Q20,60 30,80 Q50,95 70,80 Q80,60 70,40" fill="#D4A373" stroke="#795548" stroke-width="2"/>"##,
    r##"<path d="M30,40 L70,40 L75,30 L25,30 Z" fill="#E6BE8A" stroke="#795548" stroke-width="2"/>"##,
    r##"<path d="M35,30 Q50,20 65,30" fill="white" stroke="#FFF" stroke-width="3"/>"##,
    "</svg>"
);

const SUGARCANE_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 150">"##,
    r##"<path d="M25,140 L25,20" stroke="#4CAF50" stroke-width="8" stroke-linecap="round"/>"##,
    r##"<path d="M25,20 Q10,10 5,30" stroke="#81C784" stroke-width="4" fill="none"/>"##,
    r##"<path d="M25,20 Q40,10 45,30" stroke="#81C784" stroke-width="4" fill="none"/>"##,
    "</svg>"
);

const SUN_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
    r##"<circle cx="50" cy="50" r="20" fill="#FFC107" stroke="#FF9800" stroke-width="2"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="10" stroke="#FF9800" stroke-width="4"/>"##,
    r##"<line x1="50" y1="50" x2="90" y2="50" stroke="#FF9800" stroke-width="4"/>"##,
    r##"<line x1="50" y1="50" x2="50" y2="90" stroke="#FF9800" stroke-width="4"/>"##,
    r##"<line x1="50" y1="50" x2="10" y2="50" stroke="#FF9800" stroke-width="4"/>"##,
    "</svg>"
);

const DOTS_SIMPLE_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
    r##"<path d="M50,10 L90,50 L50,90 L10,50 Z" stroke="black" stroke-width="3" fill="none"/>"##,
    r##"<circle cx="50" cy="50" r="5" fill="black"/>"##,
    "</svg>"
);

const DOTS_COMPLEX_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
    r##"<path d="M50,20 Q80,20 80,50 Q80,80 50,80 Q20,80 20,50 Q20,20 50,20" stroke="black" stroke-width="2" fill="none"/>"##,
    r##"<circle cx="50" cy="50" r="10" stroke="black" stroke-width="2" fill="none"/>"##,
    "</svg>"
);

const FLOWER_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
    r##"<circle cx="50" cy="50" r="10" fill="#FFEB3B"/>"##,
    r##"<ellipse cx="50" cy="25" rx="10" ry="20" fill="#E91E63" opacity="0.8"/>"##,
    r##"<ellipse cx="50" cy="75" rx="10" ry="20" fill="#E91E63" opacity="0.8"/>"##,
    r##"<ellipse cx="25" cy="50" rx="20" ry="10" fill="#E91E63" opacity="0.8"/>"##,
    r##"<ellipse cx="75" cy="50" rx="20" ry="10" fill="#E91E63" opacity="0.8"/>"##,
    "</svg>"
);
