// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placing holes and grooves into panels.
//!
//! Features are exported anywhere in the hierarchy, not necessarily under the
//! panel they are machined into. Placement tests every feature against every
//! panel in the local space of the panel's canonical child, where the panel
//! face lies in XY and the thickness runs along Z.

use cabinet_lite_core::ModuleKind;
use cabinet_lite_geometry::{
    classify_edge, compare_float, contained_pairs, Euler, FeatureShape, PanelEdge, PanelFrame, Pose,
};
use tracing::{debug, warn};

use crate::arena::ModuleForest;
use crate::error::{Error, Result};
use crate::keys::ModuleKey;
use crate::module::Module;
use crate::transform::{propagate_absolute, propagate_relative, RELATIVE_ORDER};

/// Features found inside one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePlacement {
    pub panel: ModuleKey,
    pub features: Vec<ModuleKey>,
}

fn features_of(forest: &ModuleForest) -> (Vec<ModuleKey>, Vec<FeatureShape>) {
    forest
        .pre_order()
        .into_iter()
        .filter_map(|k| forest.get(k).and_then(Module::feature_shape).map(|p| (k, p)))
        .unzip()
}

/// The canonical child of `board`, if it has one.
pub fn canonical_child(forest: &ModuleForest, board: ModuleKey) -> Option<ModuleKey> {
    forest
        .children(board)
        .iter()
        .copied()
        .find(|k| forest.get(*k).is_some_and(|m| m.kind == ModuleKind::CanonicalBoard))
}

/// Frame features are tested in: a board's canonical child, or the module
/// itself when it already is a canonical panel.
fn placement_frame(forest: &ModuleForest, panel: ModuleKey) -> Result<PanelFrame> {
    let module = forest.get(panel).ok_or(Error::NotFound(panel))?;
    match module.kind {
        ModuleKind::CanonicalBoard => Ok(module.panel_frame()),
        ModuleKind::Board => canonical_child(forest, panel)
            .and_then(|k| forest.get(k))
            .map(Module::panel_frame)
            .ok_or_else(|| Error::MissingCanonicalPanel(module.id.clone())),
        _ => Err(Error::NotAPanel(module.id.clone())),
    }
}

/// Holes and grooves of the whole forest that lie inside `panel`.
pub fn panel_features(
    forest: &ModuleForest,
    panel: ModuleKey,
    hole_tolerance: f64,
) -> Result<Vec<ModuleKey>> {
    let frame = placement_frame(forest, panel)?;
    let (keys, shapes) = features_of(forest);
    let pairs = contained_pairs(&shapes, &[frame], hole_tolerance)?;
    Ok(pairs.into_iter().map(|(fi, _)| keys[fi]).collect())
}

/// Places every feature into every board that contains it. Boards are listed
/// in pre-order; boards without features are included with an empty list.
/// Boards without a canonical child are skipped.
pub fn place_features(forest: &ModuleForest, hole_tolerance: f64) -> Result<Vec<FeaturePlacement>> {
    let mut boards = Vec::new();
    let mut frames = Vec::new();
    for key in forest.pre_order() {
        let Some(board) = forest.get(key).filter(|m| m.kind == ModuleKind::Board) else {
            continue;
        };
        match placement_frame(forest, key) {
            Ok(frame) => {
                boards.push(key);
                frames.push(frame);
            }
            Err(_) => warn!(board = %board.id, "board has no canonical panel; skipped"),
        }
    }
    let (keys, shapes) = features_of(forest);

    let mut placements: Vec<FeaturePlacement> = boards
        .iter()
        .map(|&panel| FeaturePlacement {
            panel,
            features: Vec::new(),
        })
        .collect();
    for (fi, pi) in contained_pairs(&shapes, &frames, hole_tolerance)? {
        placements[pi].features.push(keys[fi]);
    }
    debug!(boards = boards.len(), features = keys.len(), "features placed");
    Ok(placements)
}

/// A standalone forest showing one board with its canonical panel and
/// machined features, laid out so the canonical panel sits at the origin.
pub fn panel_assembly(
    forest: &ModuleForest,
    board: ModuleKey,
    hole_tolerance: f64,
    direction_decimals: u32,
) -> Result<ModuleForest> {
    let board_module = forest.get(board).ok_or(Error::NotFound(board))?;
    if board_module.kind != ModuleKind::Board {
        return Err(Error::NotAPanel(board_module.id.clone()));
    }

    let mut assembly = ModuleForest::new();
    let root = assembly.add_root(board_module.clone());
    for &child in forest.children(board) {
        if let Some(m) = forest.get(child).filter(|m| m.kind == ModuleKind::CanonicalBoard) {
            assembly.add_child(root, m.clone())?;
        }
    }
    for feature in panel_features(forest, board, hole_tolerance)? {
        if let Some(m) = forest.get(feature) {
            let mut m = m.clone();
            m.parent_id = board_module.id.clone();
            assembly.add_child(root, m)?;
        }
    }
    propagate_relative(&mut assembly, direction_decimals);

    // Place the board so that its canonical panel lands on the identity.
    let canonical = canonical_child(&assembly, root)
        .and_then(|k| assembly.get(k))
        .map(|m| m.relative);
    if let Some(relative) = canonical {
        let to_local = relative.world_to_local();
        let rotation =
            Euler::from_rotation_matrix(&relative.inverse_rotation_matrix(), RELATIVE_ORDER);
        propagate_absolute(&mut assembly, root, Pose::new(to_local.translation_part(), rotation));
    }
    Ok(assembly)
}

/// Holes grouped by the panel edge they sit on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeHoles {
    pub left: Vec<ModuleKey>,
    pub right: Vec<ModuleKey>,
    pub back: Vec<ModuleKey>,
    pub front: Vec<ModuleKey>,
}

/// Buckets `holes` by edge of `panel`, in the panel's canonical frame.
/// Left/right buckets are ordered along the panel's local x, back/front along
/// its local y. Holes off every edge are skipped.
pub fn classify_edge_holes(
    forest: &ModuleForest,
    panel: ModuleKey,
    holes: &[ModuleKey],
) -> Result<EdgeHoles> {
    let frame = placement_frame(forest, panel)?;
    let to_local = frame.world_to_local();
    let mut buckets: [Vec<(f64, ModuleKey)>; 4] = Default::default();
    for &key in holes {
        let Some(hole) = forest.get(key).filter(|m| m.kind == ModuleKind::Hole) else {
            continue;
        };
        let local = to_local * hole.absolute.position;
        let (bucket, along) = match classify_edge(&frame, &hole.absolute.position) {
            Some(PanelEdge::Left) => (0, local.x),
            Some(PanelEdge::Right) => (1, local.x),
            Some(PanelEdge::Back) => (2, local.y),
            Some(PanelEdge::Front) => (3, local.y),
            None => continue,
        };
        buckets[bucket].push((along, key));
    }

    let [left, right, back, front] = buckets.map(|mut bucket| {
        bucket.sort_by(|a, b| compare_float(a.0, b.0));
        bucket.into_iter().map(|(_, k)| k).collect()
    });
    Ok(EdgeHoles {
        left,
        right,
        back,
        front,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::FeatureParameters;
    use cabinet_lite_geometry::{Error as GeometryError, Vector4};

    fn hole(id: &str, x: f64, y: f64, z: f64) -> Module {
        let mut m = Module::new(id, ModuleKind::Hole);
        m.absolute = Pose::new(Vector4::point(x, y, z), Euler::identity());
        m.toward_in_world = Vector4::direction(0.0, 0.0, -1.0);
        m.parameters = FeatureParameters::Hole {
            diameter: Some(5.0),
            depth: Some(10.0),
        };
        m
    }

    fn groove(id: &str, origin: [f64; 3], dims: [f64; 3], axis: Vector4) -> Module {
        let mut m = Module::new(id, ModuleKind::Groove);
        m.absolute = Pose::new(Vector4::from_array(origin, 1.0), Euler::identity());
        m.dimensions = Vector4::from_array(dims, 0.0);
        m.parameters = FeatureParameters::Groove {
            depth: Some(dims[2]),
            width: Some(dims[0]),
            length: Some(dims[1]),
            axis_in_world: axis,
            axis_in_parent: axis,
        };
        m
    }

    /// A cabinet holding one board at the origin with its canonical child.
    fn cabinet_with_board(
        board_dims: [f64; 3],
        canonical_dims: [f64; 3],
        canonical_pose: Pose,
    ) -> (ModuleForest, ModuleKey, ModuleKey) {
        let mut forest = ModuleForest::new();
        let cabinet = forest.add_root(Module::new("cab", ModuleKind::Unknown));
        let mut board = Module::new("board", ModuleKind::Board);
        board.dimensions = Vector4::from_array(board_dims, 0.0);
        let board = forest.add_child(cabinet, board).unwrap();
        let mut canonical = Module::new("board::base", ModuleKind::CanonicalBoard);
        canonical.dimensions = Vector4::from_array(canonical_dims, 0.0);
        canonical.absolute = canonical_pose;
        forest.add_child(board, canonical).unwrap();
        (forest, cabinet, board)
    }

    /// Front-lying, grain-vertical 600x400x18 board; holes hang off the
    /// cabinet, not the board.
    fn setup() -> (ModuleForest, ModuleKey) {
        let (mut forest, cabinet, board) = cabinet_with_board(
            [600.0, 400.0, 18.0],
            [400.0, 600.0, 18.0],
            Pose::from_arrays([600.0, 0.0, 0.0], [0.0, 0.0, 90.0]),
        );
        forest.add_child(cabinet, hole("in", 100.0, 100.0, 18.0)).unwrap();
        forest.add_child(cabinet, hole("out", 900.0, 100.0, 18.0)).unwrap();
        forest.add_child(cabinet, hole("edge-left-b", 600.0, 300.0, 18.0)).unwrap();
        forest.add_child(cabinet, hole("edge-left-a", 600.0, 50.0, 18.0)).unwrap();
        (forest, board)
    }

    /// Side-lying 18x560x720 board: the canonical panel stands upright with
    /// its thickness along world X.
    fn side_lying() -> (ModuleForest, ModuleKey, ModuleKey) {
        cabinet_with_board(
            [18.0, 560.0, 720.0],
            [720.0, 560.0, 18.0],
            Pose::from_arrays([18.0, 0.0, 0.0], [0.0, -90.0, 0.0]),
        )
    }

    /// Back-lying 600x18x720 board: thickness along world Y.
    fn back_lying() -> (ModuleForest, ModuleKey, ModuleKey) {
        cabinet_with_board(
            [600.0, 18.0, 720.0],
            [600.0, 720.0, 18.0],
            Pose::from_arrays([0.0, 18.0, 0.0], [90.0, 0.0, 0.0]),
        )
    }

    fn ids(forest: &ModuleForest, keys: &[ModuleKey]) -> Vec<String> {
        keys.iter().map(|k| forest.get(*k).unwrap().id.clone()).collect()
    }

    #[test]
    fn finds_features_across_the_tree() {
        let (forest, board) = setup();
        let found = panel_features(&forest, board, 0.5).unwrap();
        assert_eq!(ids(&forest, &found), ["in", "edge-left-b", "edge-left-a"]);

        let placements = place_features(&forest, 0.5).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].panel, board);
        assert_eq!(placements[0].features, found);
    }

    #[test]
    fn side_lying_groove_checked_against_thickness() {
        let (mut forest, cabinet, board) = side_lying();
        let y = Vector4::direction(0.0, 1.0, 0.0);
        // Spans x = -5..25 across an 18 thick panel.
        forest
            .add_child(cabinet, groove("wide", [-5.0, 100.0, 300.0], [30.0, 200.0, 10.0], y))
            .unwrap();
        forest
            .add_child(cabinet, groove("milled", [2.0, 100.0, 300.0], [8.0, 200.0, 10.0], y))
            .unwrap();

        let placements = place_features(&forest, 0.5).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].panel, board);
        assert_eq!(ids(&forest, &placements[0].features), ["milled"]);
    }

    #[test]
    fn back_lying_features() {
        let (mut forest, cabinet, board) = back_lying();
        let x = Vector4::direction(1.0, 0.0, 0.0);
        forest
            .add_child(cabinet, groove("deep", [100.0, -5.0, 300.0], [200.0, 30.0, 10.0], x))
            .unwrap();
        forest
            .add_child(cabinet, groove("milled", [100.0, 4.0, 300.0], [200.0, 8.0, 10.0], x))
            .unwrap();
        let mut drilled = hole("drilled", 100.0, 0.0, 300.0);
        drilled.toward_in_world = Vector4::direction(0.0, 1.0, 0.0);
        forest.add_child(cabinet, drilled).unwrap();
        // Starts 12 clear of the panel.
        let mut through = hole("through", 100.0, 30.0, 300.0);
        through.toward_in_world = Vector4::direction(0.0, -1.0, 0.0);
        through.parameters = FeatureParameters::Hole {
            diameter: Some(5.0),
            depth: Some(40.0),
        };
        forest.add_child(cabinet, through).unwrap();

        let found = panel_features(&forest, board, 0.5).unwrap();
        assert_eq!(ids(&forest, &found), ["milled", "drilled"]);
    }

    #[test]
    fn misaligned_groove_axis_is_a_configuration_error() {
        let (mut forest, cabinet, _) = side_lying();
        let bad = groove("bad", [2.0, 100.0, 300.0], [8.0, 200.0, 10.0], Vector4::zero());
        forest.add_child(cabinet, bad).unwrap();
        let err = place_features(&forest, 0.5).unwrap_err();
        assert!(matches!(err, Error::Geometry(GeometryError::InvalidGrooveAxis(_))));
        assert!(err.is_configuration());
    }

    #[test]
    fn boards_need_a_canonical_panel() {
        let mut forest = ModuleForest::new();
        let board = forest.add_root(Module::new("bare", ModuleKind::Board));
        forest.add_child(board, hole("h", 10.0, 10.0, 0.0)).unwrap();
        assert!(place_features(&forest, 0.5).unwrap().is_empty());
        assert!(matches!(
            panel_features(&forest, board, 0.5),
            Err(Error::MissingCanonicalPanel(_))
        ));
    }

    #[test]
    fn assembly_centres_canonical_panel() {
        let (forest, board) = setup();
        let assembly = panel_assembly(&forest, board, 0.5, 0).unwrap();
        assert_eq!(assembly.roots().len(), 1);
        assert_eq!(assembly.len(), 1 + 1 + 3);
        let canonical = assembly.find_by_id("board::base").unwrap();
        assert!(assembly.get(canonical).unwrap().absolute.approx_eq(&Pose::identity(), 1e-9));
    }

    #[test]
    fn assembly_requires_a_board() {
        let (forest, _) = setup();
        let cabinet = forest.roots()[0];
        assert!(matches!(panel_assembly(&forest, cabinet, 0.5, 0), Err(Error::NotAPanel(_))));
    }

    #[test]
    fn edge_holes_sorted_along_edge() {
        let (forest, board) = setup();
        let holes = panel_features(&forest, board, 0.5).unwrap();
        let edges = classify_edge_holes(&forest, board, &holes).unwrap();
        // World x = 600 is the canonical panel's y = 0 edge.
        assert_eq!(ids(&forest, &edges.left), ["edge-left-a", "edge-left-b"]);
        assert!(edges.right.is_empty() && edges.front.is_empty() && edges.back.is_empty());
    }
}
