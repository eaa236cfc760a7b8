//! Collision detection and response for the ball against the living board
//!
//! The paddles are whatever cells are alive this tick, so contact is found by
//! mapping the ball's bounding box onto the grid and treating every live cell
//! it touches as a solid square. Touching an edge counts as contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::state::{Ball, Side};
use crate::consts::CONTACT_SEPARATION;
use crate::settings::Settings;
use crate::{cell_center, pixel_to_cell};

/// Face of a cell the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactAxis {
    /// Left or right face; flips `vx`
    Horizontal,
    /// Top or bottom face; flips `vy`
    Vertical,
}

/// Top or bottom board wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
}

/// The live cell chosen as the ball's obstacle this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellContact {
    pub col: i32,
    pub row: i32,
    /// Overlap area of the ball's bounding box with the cell
    pub overlap: f32,
    pub axis: ContactAxis,
    /// Unit vector from the cell toward the ball along `axis`
    pub normal: Vec2,
}

/// Result of resolving a cell contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellHit {
    pub contact: CellContact,
    /// False when the ball was already moving away and was only pushed out
    pub reflected: bool,
    pub destroyed: bool,
}

/// Everything the resolver did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    pub cell: Option<CellHit>,
    pub wall: Option<Wall>,
    /// Player awarded the point if the ball left the board
    pub scorer: Option<Side>,
}

/// Find the live cell the ball overlaps most, and the face it came in through.
///
/// Candidates are ranked by overlap area of the ball's bounding box with the
/// cell; exact ties go to the lowest `(col, row)`. The face is taken from the
/// position before this tick's move (`pos - vel`): the axis on which the ball
/// was further clear of the cell is the one it crossed. A face backed by
/// another live cell (or by a top/bottom wall) is never chosen while the
/// other axis offers an open face.
pub fn find_cell_contact(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    grid: &Grid,
    cell_size: f32,
) -> Option<CellContact> {
    let min = pos - Vec2::splat(radius);
    let max = pos + Vec2::splat(radius);

    let col_lo = pixel_to_cell(min.x, cell_size).max(0);
    let col_hi = pixel_to_cell(max.x, cell_size).min(grid.cols() as i32 - 1);
    let row_lo = pixel_to_cell(min.y, cell_size).max(0);
    let row_hi = pixel_to_cell(max.y, cell_size).min(grid.rows() as i32 - 1);

    let mut best: Option<(i32, i32, f32)> = None;
    for col in col_lo..=col_hi {
        for row in row_lo..=row_hi {
            if !grid.is_alive(col, row) {
                continue;
            }
            let cell_min = Vec2::new(col as f32, row as f32) * cell_size;
            let cell_max = cell_min + Vec2::splat(cell_size);
            let extent = (max.min(cell_max) - min.max(cell_min)).max(Vec2::ZERO);
            let overlap = extent.x * extent.y;
            if best.is_none_or(|(_, _, o)| overlap > o) {
                best = Some((col, row, overlap));
            }
        }
    }

    best.map(|(col, row, overlap)| {
        let center = Vec2::new(cell_center(col, cell_size), cell_center(row, cell_size));
        let prev = pos - vel;
        let from = prev - center;
        let normal = Vec2::new(
            face_sign(from.x, pos.x - center.x),
            face_sign(from.y, pos.y - center.y),
        );

        // Separation of the pre-move box from the cell on each axis
        let reach = radius + cell_size / 2.0;
        let gap = from.abs() - Vec2::splat(reach);
        let entered = if gap.x >= gap.y {
            ContactAxis::Horizontal
        } else {
            ContactAxis::Vertical
        };

        let blocked = |axis: ContactAxis| match axis {
            ContactAxis::Horizontal => grid.is_alive(col + normal.x as i32, row),
            ContactAxis::Vertical => {
                let r = row + normal.y as i32;
                !grid.in_bounds(col, r) || grid.is_alive(col, r)
            }
        };
        let other = match entered {
            ContactAxis::Horizontal => ContactAxis::Vertical,
            ContactAxis::Vertical => ContactAxis::Horizontal,
        };
        let axis = if blocked(entered) && !blocked(other) {
            other
        } else {
            entered
        };

        let normal = match axis {
            ContactAxis::Horizontal => Vec2::new(normal.x, 0.0),
            ContactAxis::Vertical => Vec2::new(0.0, normal.y),
        };
        CellContact {
            col,
            row,
            overlap,
            axis,
            normal,
        }
    })
}

/// Which side of a cell centre the ball is on along one axis: where it came
/// from, else where it is now, else positive.
fn face_sign(before: f32, now: f32) -> f32 {
    if before != 0.0 {
        before.signum()
    } else if now != 0.0 {
        now.signum()
    } else {
        1.0
    }
}

/// Point the velocity away from the struck face and move the ball just
/// clear of it.
///
/// Returns whether the velocity actually changed direction.
pub fn resolve_cell_contact(ball: &mut Ball, contact: &CellContact, cell_size: f32) -> bool {
    let gap = ball.radius + CONTACT_SEPARATION;
    match contact.axis {
        ContactAxis::Horizontal => {
            let sign = contact.normal.x;
            let approaching = ball.vel.x * sign < 0.0;
            ball.vel.x = sign * ball.vel.x.abs();
            ball.pos.x = if sign > 0.0 {
                (contact.col + 1) as f32 * cell_size + gap
            } else {
                contact.col as f32 * cell_size - gap
            };
            approaching
        }
        ContactAxis::Vertical => {
            let sign = contact.normal.y;
            let approaching = ball.vel.y * sign < 0.0;
            ball.vel.y = sign * ball.vel.y.abs();
            ball.pos.y = if sign > 0.0 {
                (contact.row + 1) as f32 * cell_size + gap
            } else {
                contact.row as f32 * cell_size - gap
            };
            approaching
        }
    }
}

/// Bounce off the top or bottom wall, clamping the ball back on the board.
///
/// Only the sign of `vy` changes, so speed is preserved.
pub fn resolve_wall_collision(ball: &mut Ball, height_px: f32) -> Option<Wall> {
    let r = ball.radius;
    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        let hit = ball.vel.y < 0.0;
        ball.vel.y = ball.vel.y.abs();
        hit.then_some(Wall::Top)
    } else if ball.pos.y + r >= height_px {
        ball.pos.y = height_px - r;
        let hit = ball.vel.y > 0.0;
        ball.vel.y = -ball.vel.y.abs();
        hit.then_some(Wall::Bottom)
    } else {
        None
    }
}

/// Player who scores if the ball centre has left the board sideways.
///
/// Exactly on the edge is still in play.
pub fn check_exit(pos: Vec2, width_px: f32) -> Option<Side> {
    let breached = if pos.x < 0.0 {
        Side::Left
    } else if pos.x > width_px {
        Side::Right
    } else {
        return None;
    };
    Some(breached.opponent())
}

/// Damage dealt to a cell on impact, higher near top speed
pub fn impact_damage(speed: f32, max_speed: f32) -> u8 {
    let ratio = if max_speed > 0.0 { speed / max_speed } else { 0.0 };
    1 + u8::from(ratio > 0.7) + u8::from(ratio > 0.9)
}

/// Resolve one tick of contacts after the ball has moved.
///
/// Order: live cells, then walls (so the wall clamp wins), then the exit test
/// on the corrected position.
pub fn resolve(ball: &mut Ball, grid: &mut Grid, settings: &Settings) -> CollisionReport {
    let mut report = CollisionReport::default();
    let cell_size = settings.cell_size;

    if let Some(contact) = find_cell_contact(ball.pos, ball.vel, ball.radius, grid, cell_size) {
        let reflected = resolve_cell_contact(ball, &contact, cell_size);
        let mut destroyed = false;
        if reflected {
            ball.set_speed(ball.speed + settings.cell_bounce_boost, settings.ball_max_speed);
            if settings.cell_damage {
                let damage = impact_damage(ball.speed, settings.ball_max_speed);
                destroyed = grid.damage(contact.col, contact.row, damage).1;
            }
        }
        report.cell = Some(CellHit {
            contact,
            reflected,
            destroyed,
        });
    }

    report.wall = resolve_wall_collision(ball, settings.board_height_px());
    report.scorer = check_exit(ball.pos, settings.board_width_px());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const CS: f32 = 10.0;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(Vec2::new(x, y), 4.0, Vec2::new(vx, vy).length());
        ball.vel = Vec2::new(vx, vy);
        ball
    }

    fn settings() -> Settings {
        Settings {
            grid_cols: 10,
            grid_rows: 10,
            ball_radius: 4.0,
            placement_columns: 5,
            ..Settings::default()
        }
    }

    #[test]
    fn test_top_wall_reflects_vy() {
        let mut ball = ball_at(50.0, 0.0, 3.0, -5.0);
        assert_eq!(resolve_wall_collision(&mut ball, 100.0), Some(Wall::Top));
        assert_eq!(ball.vel, Vec2::new(3.0, 5.0));
        assert!(ball.pos.y >= 0.0);
        assert_eq!(ball.pos.y, 4.0);
    }

    #[test]
    fn test_bottom_wall_clamps_overshoot() {
        // Far past the wall in one tick: clamped to the surface, not beyond
        let mut ball = ball_at(50.0, 130.0, 0.0, 12.0);
        assert_eq!(resolve_wall_collision(&mut ball, 100.0), Some(Wall::Bottom));
        assert_eq!(ball.pos.y, 96.0);
        assert_eq!(ball.vel.y, -12.0);
    }

    #[test]
    fn test_wall_bounce_preserves_speed() {
        let mut ball = ball_at(50.0, 2.0, 4.0, -3.0);
        resolve_wall_collision(&mut ball, 100.0);
        assert!((ball.vel.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_approach_flips_vx() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        // Ball centred on row 5, its right edge 2px into column 5
        let mut ball = ball_at(48.0, 55.0, 6.0, 1.0);
        let contact = find_cell_contact(ball.pos, ball.vel, ball.radius, &grid, CS).unwrap();
        assert_eq!((contact.col, contact.row), (5, 5));
        assert_eq!(contact.axis, ContactAxis::Horizontal);
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));

        assert!(resolve_cell_contact(&mut ball, &contact, CS));
        assert_eq!(ball.vel, Vec2::new(-6.0, 1.0));
        // Pushed clear of the cell's left face
        assert_eq!(ball.pos.x, 50.0 - 4.0 - CONTACT_SEPARATION);
        assert!(find_cell_contact(ball.pos, ball.vel, ball.radius, &grid, CS).is_none());
    }

    #[test]
    fn test_vertical_approach_flips_vy() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        // Coming down onto the top face
        let mut ball = ball_at(55.0, 47.0, 1.0, 6.0);
        let contact = find_cell_contact(ball.pos, ball.vel, ball.radius, &grid, CS).unwrap();
        assert_eq!(contact.axis, ContactAxis::Vertical);
        assert!(resolve_cell_contact(&mut ball, &contact, CS));
        assert_eq!(ball.vel, Vec2::new(1.0, -6.0));
        assert_eq!(ball.pos.y, 45.0);
    }

    #[test]
    fn test_touching_edge_counts_as_contact() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        // Right edge of the ball exactly on x = 50
        let contact = find_cell_contact(Vec2::new(46.0, 55.0), Vec2::ZERO, 4.0, &grid, CS).unwrap();
        assert_eq!(contact.overlap, 0.0);
        assert_eq!(contact.axis, ContactAxis::Horizontal);
    }

    #[test]
    fn test_greatest_overlap_wins() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 4, true);
        grid.set(5, 5, true);
        // Box spans y 48..56: 2px into row 4, 6px into row 5
        let contact = find_cell_contact(Vec2::new(48.0, 52.0), Vec2::ZERO, 4.0, &grid, CS).unwrap();
        assert_eq!((contact.col, contact.row), (5, 5));
    }

    #[test]
    fn test_overlap_ties_break_on_lowest_cell() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 4, true);
        grid.set(5, 5, true);
        // Box spans y 46..54: 4px into each row
        let contact = find_cell_contact(Vec2::new(48.0, 50.0), Vec2::ZERO, 4.0, &grid, CS).unwrap();
        assert_eq!((contact.col, contact.row), (5, 4));
    }

    #[test]
    fn test_overlap_ties_break_on_lowest_column_first() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(4, 5, true);
        grid.set(5, 4, true);
        // Box spans 46..54 on both axes: a 4x4 corner of each cell
        let contact = find_cell_contact(Vec2::new(50.0, 50.0), Vec2::ZERO, 4.0, &grid, CS).unwrap();
        assert_eq!((contact.col, contact.row), (4, 5));
        assert_eq!(contact.overlap, 16.0);
    }

    #[test]
    fn test_deep_entry_uses_the_face_crossed() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        // Moved 12px this tick and ended past the cell's centre line
        let mut ball = ball_at(57.0, 55.0, 12.0, 0.0);
        let contact = find_cell_contact(ball.pos, ball.vel, ball.radius, &grid, CS).unwrap();
        assert_eq!(contact.axis, ContactAxis::Horizontal);
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        assert!(resolve_cell_contact(&mut ball, &contact, CS));
        assert_eq!(ball.pos.x, 45.0);
        assert_eq!(ball.vel.x, -12.0);
    }

    #[test]
    fn test_covered_face_is_skipped() {
        let mut grid = Grid::new(10, 10, 1);
        for row in 4..7 {
            grid.set(5, row, true);
        }
        // Came in steeply, but the top face of (5, 5) is backed by (5, 4)
        let contact = find_cell_contact(Vec2::new(49.0, 56.0), Vec2::new(3.0, 11.0), 4.0, &grid, CS).unwrap();
        assert_eq!((contact.col, contact.row), (5, 5));
        assert_eq!(contact.axis, ContactAxis::Horizontal);
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_full_column_is_never_crossed() {
        let settings = Settings::default();
        let mut grid = Grid::new(settings.grid_cols, settings.grid_rows, 1);
        for row in 0..settings.grid_rows as i32 {
            grid.set(110, row, true);
        }
        let face = 110.0 * settings.cell_size;
        let r = settings.ball_radius;
        let headings = [
            Vec2::new(12.0, 0.0),
            Vec2::new(11.0, 3.0),
            Vec2::new(11.0, -3.0),
            Vec2::new(9.0, 7.9),
            Vec2::new(7.0, -9.7),
        ];

        for vel in headings {
            for step in 0..24 {
                // Leading edge anywhere in the last 12px before the column
                let x = face - r - 12.0 + step as f32 * 0.5;
                // Row seams, a row centre, both walls
                for y in [300.0, 295.0, 123.4, r, 600.0 - r] {
                    let mut ball = Ball::new(Vec2::new(x, y), r, vel.length());
                    ball.vel = vel;
                    for _ in 0..4 {
                        ball.advance();
                        let report = resolve(&mut ball, &mut grid, &settings);
                        assert_ne!(report.scorer, Some(Side::Left));
                        assert!(
                            ball.pos.x + r <= face,
                            "{vel} from ({x}, {y}) reached {}",
                            ball.pos
                        );
                    }
                    assert!(ball.vel.x < 0.0, "{vel} from ({x}, {y}) was not turned back");
                }
            }
        }
    }

    #[test]
    fn test_ball_moving_away_is_only_pushed_out() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        let mut ball = ball_at(48.0, 55.0, -6.0, 0.0);
        let contact = find_cell_contact(ball.pos, ball.vel, ball.radius, &grid, CS).unwrap();
        assert!(!resolve_cell_contact(&mut ball, &contact, CS));
        assert_eq!(ball.vel, Vec2::new(-6.0, 0.0));
        assert_eq!(ball.pos.x, 45.0);
    }

    #[test]
    fn test_dead_cells_are_transparent() {
        let grid = Grid::new(10, 10, 1);
        assert!(find_cell_contact(Vec2::new(55.0, 55.0), Vec2::ZERO, 4.0, &grid, CS).is_none());
    }

    #[test]
    fn test_exit_scoring_sides() {
        assert_eq!(check_exit(Vec2::new(-0.1, 10.0), 100.0), Some(Side::Right));
        assert_eq!(check_exit(Vec2::new(100.1, 10.0), 100.0), Some(Side::Left));
        assert_eq!(check_exit(Vec2::new(0.0, 10.0), 100.0), None);
        assert_eq!(check_exit(Vec2::new(100.0, 10.0), 100.0), None);
    }

    #[test]
    fn test_impact_damage_scales_with_speed() {
        assert_eq!(impact_damage(6.0, 12.0), 1);
        assert_eq!(impact_damage(9.0, 12.0), 2);
        assert_eq!(impact_damage(12.0, 12.0), 3);
    }

    #[test]
    fn test_resolve_boosts_speed_up_to_max() {
        let settings = Settings {
            cell_bounce_boost: 1.0,
            ball_max_speed: 6.5,
            ..settings()
        };
        let mut grid = Grid::new(10, 10, 1);
        grid.set(5, 5, true);
        let mut ball = ball_at(48.0, 55.0, 6.0, 0.0);
        let report = resolve(&mut ball, &mut grid, &settings);
        let hit = report.cell.unwrap();
        assert!(hit.reflected);
        assert!(!hit.destroyed);
        assert_eq!(ball.speed, 6.5);
        assert!((ball.vel.length() - 6.5).abs() < 1e-5);
        assert!(ball.vel.x < 0.0);
        assert!(grid.is_alive(5, 5));
    }

    #[test]
    fn test_resolve_damages_cells_when_enabled() {
        let settings = Settings {
            cell_damage: true,
            cell_bounce_boost: 0.0,
            ..settings()
        };
        let mut grid = Grid::new(10, 10, 2);
        grid.set(5, 5, true);
        let mut ball = ball_at(48.0, 55.0, 6.0, 0.0);
        assert!(!resolve(&mut ball, &mut grid, &settings).cell.unwrap().destroyed);
        assert_eq!(grid.health(5, 5), 1);

        let mut ball = ball_at(48.0, 55.0, 6.0, 0.0);
        assert!(resolve(&mut ball, &mut grid, &settings).cell.unwrap().destroyed);
        assert!(!grid.is_alive(5, 5));
    }

    #[test]
    fn test_resolve_reports_exit_when_nothing_blocks() {
        let mut grid = Grid::new(10, 10, 1);
        let mut ball = ball_at(101.0, 50.0, 6.0, 0.0);
        let report = resolve(&mut ball, &mut grid, &settings());
        assert_eq!(report.scorer, Some(Side::Left));
        assert!(report.cell.is_none());
    }
}
