//! Wrap-aware, pixel-accurate collision resolution.
//!
//! Every pair test runs in two phases: a cheap bounding-rect reject, then a
//! per-pixel mask intersection at the rects' relative offset. Entities whose
//! rect straddles a field edge are first expanded to their wrap composite
//! (see `Footprint::wrapped`), so collisions across the seam are detected.

use glam::Vec2;

use aeroduel_shared::IMPACT_SIZE_BULLET;

use crate::sprite::Footprint;
use crate::world::{ImpactEvent, WorldState};

/// Two-phase pair test between wrap-expanded footprints.
pub fn collide(a: &Footprint, b: &Footprint) -> bool {
    collide_wrapped(&a.wrapped(), &b.wrapped())
}

fn collide_wrapped(a: &Footprint, b: &Footprint) -> bool {
    if !a.rect.intersects(&b.rect) {
        return false;
    }
    let offset = (b.rect.left - a.rect.left, b.rect.top - a.rect.top);
    a.mask.overlap(&b.mask, offset).is_some()
}

/// Index of the first candidate colliding with `subject`, scanning in the
/// caller's (creation) order so results are reproducible.
pub fn first_hit<I>(subject: &Footprint, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Footprint>,
{
    let subject = subject.wrapped();
    candidates
        .into_iter()
        .position(|cand| collide_wrapped(&subject, &cand.wrapped()))
}

/// World-space impact point between two footprints known (or believed) to
/// collide. Tries the direct mask overlap first; falls back to the closest
/// outline-pixel pair, and finally to `b`'s rect anchor.
pub fn impact_point(a: &Footprint, b: &Footprint) -> Vec2 {
    let a = a.wrapped();
    let b = b.wrapped();
    let offset = (b.rect.left - a.rect.left, b.rect.top - a.rect.top);

    if let Some((x, y)) = a.mask.overlap(&b.mask, offset) {
        return Vec2::new((a.rect.left + x) as f32, (a.rect.top + y) as f32);
    }
    if let Some((x, y)) = closest_outline_point(&a, &b, offset) {
        return Vec2::new((a.rect.left + x) as f32, (a.rect.top + y) as f32);
    }
    Vec2::new(b.rect.left as f32, b.rect.top as f32)
}

/// Closest pair of outline pixels between the two masks, by Euclidean
/// distance, reported as a pixel of `a`'s mask. Returns the freshly computed
/// point for whatever pair is nearest, even when the masks never touch.
fn closest_outline_point(a: &Footprint, b: &Footprint, offset: (i32, i32)) -> Option<(i32, i32)> {
    let b_outline = b.mask.outline();
    if b_outline.is_empty() {
        return None;
    }
    let mut best = None;
    let mut best_d2 = i64::MAX;
    for (ax, ay) in a.mask.outline() {
        for &(bx, by) in &b_outline {
            let dx = (bx + offset.0 - ax) as i64;
            let dy = (by + offset.1 - ay) as i64;
            let d2 = dx * dx + dy * dy;
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some((ax, ay));
            }
        }
    }
    best
}

/// Per-tick bullet resolution: obstacle impacts first (spawning an impact
/// event), then mileage expiry (silent). Spent bullets are pruned; each
/// bullet dies to exactly one condition.
pub fn resolve_bullets(world: &mut WorldState) {
    if world.is_terminal() {
        return;
    }
    let obstacle_fp = world.obstacle.footprint();
    let mut impacts = Vec::new();
    for bullet in &mut world.bullets {
        if bullet.spent {
            continue;
        }
        let fp = bullet.footprint();
        if collide(&obstacle_fp, &fp) {
            impacts.push(ImpactEvent {
                position: impact_point(&obstacle_fp, &fp),
                size: IMPACT_SIZE_BULLET,
            });
            bullet.spent = true;
        } else if bullet.distance_traveled >= bullet.max_distance {
            bullet.spent = true;
        }
    }
    world.impacts.extend(impacts);
    world.bullets.retain(|b| !b.spent);
}
