// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cabinet-Lite Tree
//!
//! Hierarchical spatial model rebuilt from flat cabinet records.
//!
//! Modules live in a slot-map arena ([`ModuleForest`]) with parent
//! back-references and ordered child lists. [`TreeBuilder`] links records
//! through their scene ids first and falls back to the structural parent id;
//! [`propagate_relative`] then derives every pose and direction in the
//! parent's frame. Holes and grooves are matched to the panels they are
//! machined into by [`place_features`].
//!
//! ## Example
//!
//! ```rust
//! use cabinet_lite_core::parse_records;
//! use cabinet_lite_tree::{propagate_relative, retain_board_roots, TreeBuilder};
//!
//! let records = parse_records(r#"[
//!     {"ObjID": "1", "ParentId": "-1", "ObjName": "Cabinet"},
//!     {"ObjID": "2", "ParentId": "1", "ObjName": "Side", "ObjType": "Board"}
//! ]"#).unwrap();
//!
//! let mut forest = TreeBuilder::new().build(&records);
//! retain_board_roots(&mut forest);
//! propagate_relative(&mut forest, 0);
//! assert_eq!(forest.roots().len(), 1);
//! ```

pub mod arena;
pub mod builders;
pub mod error;
pub mod features;
pub mod keys;
pub mod module;
pub mod serialization;
pub mod transform;
pub mod traversal;

pub use arena::{ModuleForest, ModuleNode};
pub use builders::{module_from_record, retain_board_roots, TreeBuilder};
pub use error::{Error, Result};
pub use features::{
    canonical_child, classify_edge_holes, panel_assembly, panel_features, place_features, EdgeHoles,
    FeaturePlacement,
};
pub use keys::ModuleKey;
pub use module::{FeatureParameters, Module, ModuleInfo, TextureType};
pub use serialization::{ForestSnapshot, ModuleSnapshot, ParametersSnapshot, PoseSnapshot};
pub use transform::{propagate_absolute, propagate_relative, RELATIVE_ORDER};
