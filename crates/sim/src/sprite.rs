//! Entity silhouettes and their world-space footprints.
//!
//! Silhouettes come from built-in stencils (the presentation layer owns the
//! real artwork; collision only needs the opaque-pixel shape). A footprint is
//! a silhouette posed in the playfield: its bounding rect plus rotated mask.

use std::borrow::Cow;
use std::sync::LazyLock;

use glam::Vec2;

use aeroduel_shared::{
    FighterKind, BULLET_LENGTH, BULLET_WIDTH, FIELD_HEIGHT, FIELD_WIDTH, FIGHTER_EXTENT,
};

use crate::mask::{PixelMask, Rect};

const STENCIL_SCALE: i32 = 4; // 20x20 stencils -> 80x80 sprite pixels

// Delta wing, nose up.
const JET_STENCIL: [&str; 20] = [
    ".........##.........",
    ".........##.........",
    "........####........",
    "........####........",
    ".......######.......",
    ".......######.......",
    "......########......",
    "......########......",
    ".....##########.....",
    ".....##########.....",
    "....############....",
    "...##############...",
    "..################..",
    ".##################.",
    "####################",
    "......########......",
    "......########......",
    "........####........",
    "....############....",
    "....############....",
];

// Straight wings amidships, nose up.
const PROP_STENCIL: [&str; 20] = [
    ".........##.........",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "####################",
    "####################",
    "####################",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "........####........",
    "......########......",
    "..################..",
    "..################..",
    "......########......",
];

static JET_MASK: LazyLock<PixelMask> =
    LazyLock::new(|| PixelMask::from_stencil(&JET_STENCIL, STENCIL_SCALE));
static PROP_MASK: LazyLock<PixelMask> =
    LazyLock::new(|| PixelMask::from_stencil(&PROP_STENCIL, STENCIL_SCALE));
static BULLET_MASK: LazyLock<PixelMask> =
    LazyLock::new(|| PixelMask::filled(BULLET_WIDTH, BULLET_LENGTH));

fn base_mask(kind: FighterKind) -> &'static PixelMask {
    match kind {
        FighterKind::Jet => &JET_MASK,
        FighterKind::Prop => &PROP_MASK,
    }
}

/// An entity's collision footprint: bounding rect in playfield pixels plus
/// the pixel mask filling it.
#[derive(Debug, Clone)]
pub struct Footprint {
    pub rect: Rect,
    pub mask: PixelMask,
}

impl Footprint {
    pub fn fighter(kind: FighterKind, position: Vec2, heading: f32) -> Footprint {
        debug_assert_eq!(base_mask(kind).width(), FIGHTER_EXTENT);
        Footprint::rotated(base_mask(kind), position, heading)
    }

    pub fn bullet(position: Vec2, heading: f32) -> Footprint {
        Footprint::rotated(&BULLET_MASK, position, heading)
    }

    pub fn obstacle(rect: Rect) -> Footprint {
        Footprint {
            rect,
            mask: PixelMask::filled(rect.width, rect.height),
        }
    }

    fn rotated(base: &PixelMask, position: Vec2, heading: f32) -> Footprint {
        let mask = base.rotated(heading);
        let rect = Rect::from_center(position, mask.width(), mask.height());
        Footprint { rect, mask }
    }

    /// Wrap-aware composite: when the rect leaves the field, return a merged
    /// footprint spanning the primary copy and its mirror across the opposite
    /// edge, with both mask copies unioned in. Collision against the result
    /// sees whichever copy actually overlaps, so sprites straddling an edge
    /// cannot tunnel. Footprints fully inside the field are returned
    /// borrowed, unchanged.
    pub fn wrapped(&self) -> Cow<'_, Footprint> {
        let (w, h) = (FIELD_WIDTH as i32, FIELD_HEIGHT as i32);
        let r = self.rect;
        let (mut l1, mut t1) = (r.left, r.top);
        let (mut l2, mut t2) = (r.left, r.top);
        if r.left < 0 {
            l2 += w;
        } else if r.right() > w {
            l1 -= w;
        }
        if r.top < 0 {
            t2 += h;
        } else if r.bottom() > h {
            t1 -= h;
        }
        if (l1, t1) == (l2, t2) {
            return Cow::Borrowed(self);
        }

        let merged_rect = Rect::new(l1, t1, (l2 - l1) + r.width, (t2 - t1) + r.height);
        let mut mask = PixelMask::empty(merged_rect.width, merged_rect.height);
        mask.blit(&self.mask, (0, 0));
        mask.blit(&self.mask, (l2 - l1, t2 - t1));
        Cow::Owned(Footprint {
            rect: merged_rect,
            mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_footprint_is_sprite_sized_when_axis_aligned() {
        let fp = Footprint::fighter(FighterKind::Jet, Vec2::new(400.0, 300.0), 0.0);
        assert_eq!(fp.rect.width, FIGHTER_EXTENT);
        assert_eq!(fp.rect.height, FIGHTER_EXTENT);
        assert_eq!(fp.rect.left, 400 - FIGHTER_EXTENT / 2);
        assert!(fp.mask.count() > 0);
    }

    #[test]
    fn test_fighter_footprint_grows_when_rotated() {
        let upright = Footprint::fighter(FighterKind::Prop, Vec2::new(400.0, 300.0), 0.0);
        let banked = Footprint::fighter(FighterKind::Prop, Vec2::new(400.0, 300.0), 45.0);
        assert!(banked.rect.width > upright.rect.width);
    }

    #[test]
    fn test_bullet_footprint_rotates_with_heading() {
        let north = Footprint::bullet(Vec2::new(100.0, 100.0), 0.0);
        let east = Footprint::bullet(Vec2::new(100.0, 100.0), 90.0);
        assert_eq!((north.rect.width, north.rect.height), (BULLET_WIDTH, BULLET_LENGTH));
        assert_eq!((east.rect.width, east.rect.height), (BULLET_LENGTH, BULLET_WIDTH));
    }

    #[test]
    fn test_wrapped_noop_inside_field() {
        let fp = Footprint::fighter(FighterKind::Jet, Vec2::new(800.0, 600.0), 0.0);
        let wrapped = fp.wrapped();
        assert!(matches!(wrapped, Cow::Borrowed(_)));
        assert_eq!(wrapped.rect, fp.rect);
        assert_eq!(wrapped.mask.count(), fp.mask.count());
    }

    #[test]
    fn test_wrapped_spans_both_copies_across_left_edge() {
        // Centered near x=0: the rect hangs off the left edge, so the
        // composite must span the primary copy and its mirror on the right.
        let fp = Footprint::fighter(FighterKind::Jet, Vec2::new(5.0, 600.0), 0.0);
        assert!(fp.rect.left < 0);
        let wrapped = fp.wrapped();
        assert_eq!(wrapped.rect.left, fp.rect.left);
        assert_eq!(wrapped.rect.right(), fp.rect.right() + FIELD_WIDTH as i32);
        assert_eq!(wrapped.mask.count(), 2 * fp.mask.count());
    }

    #[test]
    fn test_wrapped_corner_spans_four_quadrants() {
        let fp = Footprint::fighter(FighterKind::Jet, Vec2::new(5.0, 5.0), 0.0);
        let wrapped = fp.wrapped();
        assert!(wrapped.rect.width > FIELD_WIDTH as i32 - FIGHTER_EXTENT);
        assert!(wrapped.rect.height > FIELD_HEIGHT as i32 - FIGHTER_EXTENT);
        // Two copies drawn into the merged box (primary + diagonal mirror).
        assert_eq!(wrapped.mask.count(), 2 * fp.mask.count());
    }
}
