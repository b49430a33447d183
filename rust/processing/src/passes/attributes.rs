// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass 1: attribute inference and kind classification.

use cabinet_lite_core::{
    has_reversed_texture, keys, parse_description, swap_texture_marker, ModuleKind, Record,
    TowardType,
};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::{PassContext, RecordPass};
use crate::error::Result;

const HOLE_MARKERS: [&str; 3] = [keys::HOLE_DIAMETER, keys::HOLE_DEPTH, keys::HOLE_DIRECTION];
const GROOVE_PREFIX: &str = "Groove_";
const DOOR_PREFIXES: [&str; 4] = ["GJ_CMGJ_", "GJ_FMGJ_", "GJ_MXHQGJ_", "GJ_PKGJ_"];

/// Normalizes ids, refreshes the brand good code from the description and
/// classifies every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributePass;

impl RecordPass for AttributePass {
    fn name(&self) -> &'static str {
        "attribute_inference"
    }

    fn description(&self) -> &'static str {
        "normalize ids and infer kind, thickness and toward type"
    }

    fn apply(&self, mut records: Vec<Record>, ctx: &PassContext<'_>) -> Result<Vec<Record>> {
        for record in &mut records {
            record.id.normalize();
            record.parent_id.normalize();
            refresh_brand_good_code(record);
            classify(record, ctx.board_codes);
        }
        Ok(records)
    }
}

/// The description's brand good code replaces the info block's. Records
/// without an info block are left alone.
fn refresh_brand_good_code(record: &mut Record) {
    if record.info.is_empty() {
        return;
    }
    match parse_description(&record.description).brand_good_code() {
        Some(code) => record.info.set(keys::BRAND_GOOD_CODE, code),
        None => {
            record.info.remove(keys::BRAND_GOOD_CODE);
        }
    }
}

fn is_hole(record: &Record) -> bool {
    HOLE_MARKERS.iter().all(|m| record.description.contains(m))
}

fn is_groove(record: &Record) -> bool {
    record.brand_good_code().is_some_and(|c| c.starts_with(GROOVE_PREFIX))
}

fn is_door_board(record: &Record) -> bool {
    record
        .brand_good_code()
        .is_some_and(|c| DOOR_PREFIXES.iter().any(|p| c.starts_with(p)))
}

/// Assigns the kind; first match wins.
pub fn classify(record: &mut Record, board_codes: &FxHashSet<String>) {
    record.kind = if !record.ref_code.is_empty() && board_codes.contains(&record.ref_code) {
        classify_board(record);
        ModuleKind::Board
    } else if is_hole(record) {
        ModuleKind::Hole
    } else if is_groove(record) {
        ModuleKind::Groove
    } else if is_door_board(record) {
        ModuleKind::DoorBoard
    } else {
        ModuleKind::Unknown
    };
    debug!(record = %record.id, kind = %record.kind, "classified");
}

/// Thickness, texture marker and toward label of a board.
fn classify_board(record: &mut Record) {
    let thickness = record.width.min(record.depth).min(record.height);
    record.panel_thickness = Some(thickness);

    if has_reversed_texture(&record.ref_code) {
        record.texture_code = swap_texture_marker(&record.texture_code);
    }

    if record.toward_label.parse::<TowardType>().is_ok() {
        return;
    }
    let derived = TowardType::derive(
        record.width,
        record.depth,
        record.height,
        thickness,
        &record.texture_code,
    );
    match derived {
        Some(toward) => record.toward_label = toward.label(),
        None => {
            warn!(
                record = %record.id,
                texture_code = %record.texture_code,
                "cannot derive board orientation"
            );
            record.toward_label.clear();
        }
    }
}
