// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass 2: canonical panel synthesis.
//!
//! Every board gets one canonical child whose local frame puts the panel
//! face in the XY plane with the grain along X. The child's pose relative to
//! the board depends only on the board's toward type:
//!
//! | toward type                    | rotation (deg) | dims    | offset  |
//! |--------------------------------|----------------|---------|---------|
//! | front-lying + grain-horizontal | (0, 0, 0)      | (w,d,h) | (0,0,0) |
//! | front-lying + grain-vertical   | (0, 0, 90)     | (d,w,h) | (w,0,0) |
//! | side-lying + grain-vertical    | (0, -90, 0)    | (h,d,w) | (w,0,0) |
//! | side-lying + grain-horizontal  | (90, -90, 0)   | (d,h,w) | (w,d,0) |
//! | back-lying + grain-vertical    | (0, -90, -90)  | (h,w,d) | (0,0,0) |
//! | back-lying + grain-horizontal  | (90, 0, 0)     | (w,h,d) | (0,d,0) |

use cabinet_lite_core::{
    keys, Grain, Lying, ModuleKind, OutlinePointRecord, Record, RecordId, TowardType,
};
use cabinet_lite_geometry::{
    densify, rectangle, rotate_about_center, Euler, EulerOrder, OutlinePoint, Pose, Vector4,
};
use tracing::debug;

use super::{PassContext, RecordPass};
use crate::error::Result;

/// Suffix appended to a board id to form its canonical panel's id.
pub const CANONICAL_SUFFIX: &str = "::base";

/// Appends one canonical panel record per board.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePanelPass;

impl RecordPass for BasePanelPass {
    fn name(&self) -> &'static str {
        "base_panel"
    }

    fn description(&self) -> &'static str {
        "synthesize one canonical panel per board"
    }

    fn apply(&self, mut records: Vec<Record>, ctx: &PassContext<'_>) -> Result<Vec<Record>> {
        let panels = records
            .iter()
            .filter(|r| r.kind == ModuleKind::Board)
            .map(|r| canonical_panel(r, ctx.config.arc_samples, ctx.config.direction_decimals))
            .collect::<Result<Vec<_>>>()?;
        records.extend(panels);
        Ok(records)
    }
}

/// Placement of a canonical panel inside its board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalLayout {
    pub rotation: Euler,
    pub dimensions: [f64; 3],
    pub offset: [f64; 3],
}

impl CanonicalLayout {
    /// The layout as a pose in the board's frame.
    pub fn relative_pose(&self) -> Pose {
        Pose::new(Vector4::from_array(self.offset, 1.0), self.rotation)
    }
}

/// Layout for a board of dimensions `[w, d, h]`.
pub fn canonical_layout(toward: TowardType, [w, d, h]: [f64; 3]) -> CanonicalLayout {
    let (rotation, dimensions, offset) = match (toward.lying, toward.grain) {
        (Lying::Front, Grain::Horizontal) => ([0.0, 0.0, 0.0], [w, d, h], [0.0, 0.0, 0.0]),
        (Lying::Front, Grain::Vertical) => ([0.0, 0.0, 90.0], [d, w, h], [w, 0.0, 0.0]),
        (Lying::Side, Grain::Vertical) => ([0.0, -90.0, 0.0], [h, d, w], [w, 0.0, 0.0]),
        (Lying::Side, Grain::Horizontal) => ([90.0, -90.0, 0.0], [d, h, w], [w, d, 0.0]),
        (Lying::Back, Grain::Vertical) => ([0.0, -90.0, -90.0], [h, w, d], [0.0, 0.0, 0.0]),
        (Lying::Back, Grain::Horizontal) => ([90.0, 0.0, 0.0], [w, h, d], [0.0, d, 0.0]),
    };
    let [x, y, z] = rotation;
    CanonicalLayout {
        rotation: Euler::zxy(x, y, z),
        dimensions,
        offset,
    }
}

/// Maps a board's exported outline into the canonical panel frame. The
/// exported points are flipped first (a half turn about their planar centre,
/// or a mirror in X for back-lying boards) and the result is flattened to
/// z = 0. Tags are kept.
pub fn remap_outline(
    board: &Record,
    toward: TowardType,
    layout: &CanonicalLayout,
) -> Vec<OutlinePoint> {
    let points: Vec<OutlinePoint> = board.outline.iter().copied().map(OutlinePoint::from).collect();
    let to_canonical = layout.relative_pose().world_to_local();

    let staged: Vec<(Vector4, OutlinePoint)> = match toward.lying {
        Lying::Front => rotate_about_center(&points, 180.0)
            .into_iter()
            .map(|p| (Vector4::point(p.x, p.y, p.z), p))
            .collect(),
        Lying::Side => rotate_about_center(&points, 180.0)
            .into_iter()
            .map(|p| (Vector4::point(p.z, p.y, p.x), p))
            .collect(),
        Lying::Back => points
            .iter()
            .map(|p| (Vector4::point(board.width - p.x, 0.0, p.y), *p))
            .collect(),
    };

    staged
        .into_iter()
        .map(|(v, p)| {
            let q = to_canonical * v;
            OutlinePoint::new(q.x, q.y, 0.0, p.tag)
        })
        .collect()
}

/// Builds the canonical panel record of one board.
pub fn canonical_panel(
    board: &Record,
    arc_samples: usize,
    direction_decimals: u32,
) -> Result<Record> {
    let toward: TowardType = board.toward_label.parse()?;
    let layout = canonical_layout(toward, board.dimensions());

    let parent = Pose::from_arrays(board.position(), board.rotation());
    let absolute = parent.compose(&layout.relative_pose(), EulerOrder::ZXY);

    let outline = if board.outline.is_empty() {
        rectangle(layout.dimensions[0], layout.dimensions[1])
    } else {
        remap_outline(board, toward, &layout)
    };
    let outline = densify(&outline, arc_samples)?;

    let facing = (absolute.rotation_matrix() * Vector4::unit_z()).round(direction_decimals);

    let mut panel = Record {
        id: RecordId::from(format!("{}{}", board.id.canonical(), CANONICAL_SUFFIX)),
        parent_id: RecordId::from(board.id.canonical()),
        name: board.name.clone(),
        kind: ModuleKind::CanonicalBoard,
        ref_code: board.ref_code.clone(),
        texture_name: board.texture_name.clone(),
        toward_label: toward.grain.label().to_owned(),
        outline: outline.into_iter().map(OutlinePointRecord::from).collect(),
        toward_in_world: Some(facing.xyz()),
        ..Default::default()
    };
    [panel.width, panel.depth, panel.height] = layout.dimensions;
    [panel.pos_x, panel.pos_y, panel.pos_z] = absolute.position.xyz();
    [panel.rot_x, panel.rot_y, panel.rot_z] = absolute.rotation.angles();

    for key in [keys::BRAND_GOOD_CODE, keys::SUPPLEMENT_TYPE] {
        if let Some(value) = board.info.get(key) {
            panel.info.set(key, value.clone());
        }
    }

    debug!(board = %board.id, panel = %panel.id, toward = %toward, "canonical panel");
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cabinet_lite_core::PointTag;
    use cabinet_lite_geometry::Matrix4;

    fn board(toward: TowardType, dims: [f64; 3]) -> Record {
        Record {
            id: RecordId::from("7"),
            toward_label: toward.label(),
            width: dims[0],
            depth: dims[1],
            height: dims[2],
            ..Default::default()
        }
    }

    fn assert_matrix_eq(a: &Matrix4, b: &Matrix4) {
        for r in 0..4 {
            for c in 0..4 {
                assert_relative_eq!(a.get(r, c), b.get(r, c), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn front_horizontal_is_identity() {
        let t = TowardType::new(Lying::Front, Grain::Horizontal);
        let panel = canonical_panel(&board(t, [600.0, 400.0, 18.0]), 20, 0).unwrap();
        assert_eq!(panel.id.canonical(), "7::base");
        assert_eq!(panel.parent_id.canonical(), "7");
        assert_eq!(panel.kind, ModuleKind::CanonicalBoard);
        assert_eq!(panel.dimensions(), [600.0, 400.0, 18.0]);
        assert_eq!(panel.position(), [0.0, 0.0, 0.0]);
        assert_eq!(panel.toward_label, "横纹");
        assert_eq!(panel.outline.len(), 4);
        assert_eq!(panel.toward_in_world, Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn front_vertical_swaps_and_offsets() {
        let t = TowardType::new(Lying::Front, Grain::Vertical);
        let panel = canonical_panel(&board(t, [600.0, 400.0, 18.0]), 20, 0).unwrap();
        assert_eq!(panel.dimensions(), [400.0, 600.0, 18.0]);
        assert_relative_eq!(panel.pos_x, 600.0);
        assert_relative_eq!(panel.rot_z, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn canonical_box_fills_the_board_for_every_layout() {
        let dims = [600.0, 400.0, 18.0];
        for toward in TowardType::ALL {
            let layout = canonical_layout(toward, dims);
            let m = layout.relative_pose().local_to_world();
            let [cw, cd, ch] = layout.dimensions;
            // Both corners of the canonical box land on corners of the board box.
            for corner in [Vector4::point(0.0, 0.0, 0.0), Vector4::point(cw, cd, ch)] {
                let p = m * corner;
                for (v, extent) in [(p.x, dims[0]), (p.y, dims[1]), (p.z, dims[2])] {
                    assert!(v.abs() < 1e-9 || (v - extent).abs() < 1e-9, "{} {:?}", toward, p);
                }
            }
            assert_relative_eq!(cw * cd * ch, dims[0] * dims[1] * dims[2]);
        }
    }

    #[test]
    fn absolute_pose_composes_board_and_layout() {
        let t = TowardType::new(Lying::Side, Grain::Horizontal);
        let mut b = board(t, [18.0, 400.0, 720.0]);
        [b.pos_x, b.pos_y, b.pos_z] = [100.0, 50.0, 0.0];
        b.rot_z = 90.0;
        let panel = canonical_panel(&b, 20, 0).unwrap();

        let board_pose = Pose::from_arrays(b.position(), b.rotation());
        let layout = canonical_layout(t, b.dimensions());
        let expected = board_pose.local_to_world() * layout.relative_pose().local_to_world();
        let actual = Pose::from_arrays(panel.position(), panel.rotation()).local_to_world();
        assert_matrix_eq(&actual, &expected);
    }

    #[test]
    fn invalid_label_is_a_configuration_error() {
        let mut b = board(TowardType::new(Lying::Front, Grain::Vertical), [1.0, 1.0, 1.0]);
        b.toward_label = "diagonal".into();
        assert!(canonical_panel(&b, 20, 0).unwrap_err().is_configuration());
    }

    #[test]
    fn front_outline_is_turned_and_densified() {
        let t = TowardType::new(Lying::Front, Grain::Horizontal);
        let mut b = board(t, [100.0, 100.0, 18.0]);
        // Square with one corner rounded about (90, 90).
        let r = 10.0 * std::f64::consts::FRAC_1_SQRT_2;
        b.outline = [
            (0.0, 0.0, PointTag::Normal),
            (100.0, 0.0, PointTag::Normal),
            (100.0, 90.0, PointTag::Arc),
            (90.0 + r, 90.0 + r, PointTag::Arc),
            (90.0, 100.0, PointTag::Normal),
            (0.0, 100.0, PointTag::Normal),
        ]
        .into_iter()
        .map(|(x, y, tag)| OutlinePointRecord { x, y, z: 0.0, tag })
        .collect();

        let panel = canonical_panel(&b, 5, 0).unwrap();
        // 6 points, one triplet of 3 replaced by 5 samples.
        assert_eq!(panel.outline.len(), 8);
        assert!(panel.outline.iter().all(|p| p.tag == PointTag::Normal));
        // The half turn maps (0, 0) onto (100, 100).
        assert_relative_eq!(panel.outline[0].x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(panel.outline[0].y, 100.0, epsilon = 1e-9);
        // The arc now bulges around (10, 10).
        let arc = &panel.outline[2..7];
        for p in arc {
            let radius = ((p.x - 10.0).powi(2) + (p.y - 10.0).powi(2)).sqrt();
            assert_relative_eq!(radius, 10.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn back_outline_is_mirrored_into_xz() {
        let t = TowardType::new(Lying::Back, Grain::Horizontal);
        let mut b = board(t, [600.0, 18.0, 720.0]);
        b.outline = vec![OutlinePointRecord {
            x: 100.0,
            y: 200.0,
            z: 0.0,
            tag: PointTag::Normal,
        }];
        let layout = canonical_layout(t, b.dimensions());
        let mapped = remap_outline(&b, t, &layout);
        // Board-frame point (500, 0, 200) seen from the canonical frame.
        let expected = layout.relative_pose().world_to_local() * Vector4::point(500.0, 0.0, 200.0);
        assert_relative_eq!(mapped[0].x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(mapped[0].y, expected.y, epsilon = 1e-9);
        assert_eq!(mapped[0].z, 0.0);
    }

    #[test]
    fn brand_code_and_supplement_are_inherited() {
        let mut b = board(TowardType::new(Lying::Front, Grain::Horizontal), [1.0, 1.0, 1.0]);
        b.info.set(keys::BRAND_GOOD_CODE, "BG-1");
        b.info.set("bdtype2", "A");
        b.info.set(keys::SCENE_ID, "S1");
        let panel = canonical_panel(&b, 20, 0).unwrap();
        assert_eq!(panel.brand_good_code(), Some("BG-1"));
        assert_eq!(panel.info.get_str(keys::SUPPLEMENT_TYPE), Some("A"));
        assert!(panel.scene_id().is_none());
    }
}
