// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered list-to-list passes over the flat record set.
//!
//! Each pass takes ownership of the records and returns the next list. The
//! [`Pipeline`] owns the ordered passes; nothing is registered globally.

pub mod attributes;
pub mod base_panel;
pub mod imported_model;

use cabinet_lite_core::Record;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::Result;

pub use attributes::AttributePass;
pub use base_panel::{
    canonical_layout, canonical_panel, remap_outline, BasePanelPass, CanonicalLayout,
};
pub use imported_model::ImportedModelPass;

/// Shared, read-only inputs of a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    /// Reference codes known to be boards.
    pub board_codes: &'a FxHashSet<String>,
    pub config: &'a TranslateConfig,
}

/// One classification or synthesis step.
pub trait RecordPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn apply(&self, records: Vec<Record>, ctx: &PassContext<'_>) -> Result<Vec<Record>>;
}

/// Ordered passes.
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn RecordPass>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute inference, base-panel synthesis, imported-model synthesis.
    pub fn standard() -> Self {
        Self::new()
            .with_pass(AttributePass)
            .with_pass(BasePanelPass)
            .with_pass(ImportedModelPass)
    }

    pub fn with_pass(mut self, pass: impl RecordPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass in order. The first error aborts the run.
    pub fn run(&self, mut records: Vec<Record>, ctx: &PassContext<'_>) -> Result<Vec<Record>> {
        for pass in &self.passes {
            let before = records.len();
            debug!(pass = pass.name(), description = pass.description(), "running pass");
            records = pass.apply(records, ctx)?;
            info!(pass = pass.name(), before, after = records.len(), "pass finished");
        }
        Ok(records)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("passes", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag(&'static str);

    impl RecordPass for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, mut records: Vec<Record>, _ctx: &PassContext<'_>) -> Result<Vec<Record>> {
            for r in &mut records {
                r.name.push_str(self.0);
            }
            Ok(records)
        }
    }

    #[test]
    fn passes_run_in_order() {
        let codes = FxHashSet::default();
        let config = TranslateConfig::default();
        let ctx = PassContext {
            board_codes: &codes,
            config: &config,
        };
        let pipeline = Pipeline::new().with_pass(Tag("a")).with_pass(Tag("b"));
        let out = pipeline.run(vec![Record::default()], &ctx).unwrap();
        assert_eq!(out[0].name, "ab");
        assert_eq!(pipeline.names(), ["a", "b"]);
    }

    #[test]
    fn standard_order() {
        assert_eq!(
            Pipeline::standard().names(),
            ["attribute_inference", "base_panel", "imported_model"]
        );
    }
}
