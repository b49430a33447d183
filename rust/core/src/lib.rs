// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cabinet-Lite Core
//!
//! Record model for flat cabinet CAD exports.
//!
//! ## Overview
//!
//! - **Records**: [`Record`] mirrors one exported object; ids, numbers and
//!   nulls are absorbed leniently during deserialization
//! - **Attributes**: [`InfoBlock`] gives case-insensitive access to the
//!   free-form `Info` bag
//! - **Descriptions**: [`parse_description`] splits `key:=value!key:=value`
//!   strings with [nom](https://docs.rs/nom)
//! - **Vocabularies**: module kinds, panel toward types, direction strings
//!
//! ## Quick Start
//!
//! ```rust
//! use cabinet_lite_core::{parse_records, parse_description};
//!
//! let records = parse_records(r#"[{"ObjID": 1, "ParentId": "-1", "ObjDesc": "ZJ:=5"}]"#).unwrap();
//! assert_eq!(records[0].id.canonical(), "1");
//! assert_eq!(parse_description(&records[0].description).get("ZJ"), Some("5"));
//! ```

pub mod description;
pub mod direction;
pub mod error;
pub mod info;
pub mod kind;
pub mod record;
pub mod toward;

pub use description::{parse_description, Description, DescriptionField};
pub use direction::{Axis, AxisDirection};
pub use error::{Error, Result};
pub use info::{keys, parse_leading_f64, InfoBlock};
pub use kind::ModuleKind;
pub use record::{parse_records, OutlinePointRecord, PointTag, Record, RecordId};
pub use toward::{
    has_reversed_texture, swap_texture_marker, Grain, Lying, TowardType, REVERSED_TEXTURE_CODES,
    THICKNESS_TOLERANCE,
};

/// Parent id marking a top-level record.
pub const ROOT_SENTINEL: &str = "-1";
