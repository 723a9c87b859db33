use blocksmith_geom::{LatticePos, Vec3, snap_axis};
use blocksmith_world::BlockId;

/// What the renderer reports for one pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pick {
    /// A face of an existing block, with that face's outward normal.
    Face {
        block: BlockId,
        position: LatticePos,
        normal: Vec3,
    },
    /// The ground plane, at a continuous hit point.
    Ground { point: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    BelowGround,
    /// Non-finite or out-of-range coordinates.
    OffLattice,
}

fn grounded(target: LatticePos) -> Result<LatticePos, Rejection> {
    if target.is_grounded() {
        Ok(target)
    } else {
        Err(Rejection::BelowGround)
    }
}

/// Cell across the hit face: `round(position + normal)` per axis.
pub fn resolve_face(position: LatticePos, normal: Vec3) -> Result<LatticePos, Rejection> {
    let axis = |p: i32, n: f32| snap_axis(p as f64 + n as f64).ok_or(Rejection::OffLattice);
    let target = LatticePos::new(
        axis(position.x, normal.x)?,
        axis(position.y, normal.y)?,
        axis(position.z, normal.z)?,
    );
    grounded(target)
}

/// Column under a ground hit, always at y = 0.
pub fn resolve_ground(point: Vec3) -> Result<LatticePos, Rejection> {
    let axis = |v: f32| snap_axis(v as f64).ok_or(Rejection::OffLattice);
    grounded(LatticePos::new(axis(point.x)?, 0, axis(point.z)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_adjacency() {
        let b = LatticePos::new(2, 0, 0);
        assert_eq!(resolve_face(b, Vec3::new(1.0, 0.0, 0.0)), Ok(LatticePos::new(3, 0, 0)));
        assert_eq!(resolve_face(b, Vec3::new(0.0, 1.0, 0.0)), Ok(LatticePos::new(2, 1, 0)));
        assert_eq!(resolve_face(b, Vec3::new(0.0, -1.0, 0.0)), Err(Rejection::BelowGround));
    }

    #[test]
    fn face_normal_noise_is_absorbed() {
        let b = LatticePos::new(0, 3, 0);
        let n = Vec3::new(1e-4, -0.99998, -2e-5);
        assert_eq!(resolve_face(b, n), Ok(LatticePos::new(0, 2, 0)));
    }

    #[test]
    fn ground_snaps_to_nearest_column() {
        assert_eq!(
            resolve_ground(Vec3::new(2.6, -0.5, -1.3)),
            Ok(LatticePos::new(3, 0, -1))
        );
        assert_eq!(
            resolve_ground(Vec3::new(-0.5, -0.5, 0.5)),
            Ok(LatticePos::new(-1, 0, 1))
        );
    }

    #[test]
    fn non_finite_picks_are_rejected() {
        assert_eq!(
            resolve_ground(Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(Rejection::OffLattice)
        );
        assert_eq!(
            resolve_face(LatticePos::ORIGIN, Vec3::new(0.0, f32::INFINITY, 0.0)),
            Err(Rejection::OffLattice)
        );
    }
}
