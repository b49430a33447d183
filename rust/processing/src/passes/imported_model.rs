// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass 3: panels for imported models.
//!
//! Records with a `BDImportModelType` describe geometry imported from an
//! external model rather than drawn panels. They pass through unchanged for
//! now.

use cabinet_lite_core::Record;
use tracing::debug;

use super::{PassContext, RecordPass};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportedModelPass;

impl RecordPass for ImportedModelPass {
    fn name(&self) -> &'static str {
        "imported_model"
    }

    fn description(&self) -> &'static str {
        "synthesize panels for imported models"
    }

    fn apply(&self, records: Vec<Record>, _ctx: &PassContext<'_>) -> Result<Vec<Record>> {
        let imported = records.iter().filter(|r| r.import_model_type().is_some()).count();
        debug!(imported, "imported-model records left as exported");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateConfig;
    use rustc_hash::FxHashSet;

    #[test]
    fn returns_input_unchanged() {
        let codes = FxHashSet::default();
        let config = TranslateConfig::default();
        let ctx = PassContext {
            board_codes: &codes,
            config: &config,
        };
        let mut r = Record::default();
        r.info.set("BDImportModelType", "3");
        let input = vec![r, Record::default()];
        let out = ImportedModelPass.apply(input.clone(), &ctx).unwrap();
        assert_eq!(out, input);
    }
}
