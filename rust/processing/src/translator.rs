// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The translation orchestrator.
//!
//! One translation fetches the board catalog once, runs the ordered passes
//! over the flat records, rebuilds the hierarchy, prunes trees without boards
//! and derives relative poses. It either fully succeeds or fully fails; only
//! a catalog failure is absorbed (classification then sees no boards).

use std::time::Duration;

use cabinet_lite_core::{parse_records, Record};
use cabinet_lite_tree::{
    panel_assembly, place_features, propagate_relative, retain_board_roots, FeaturePlacement,
    ModuleForest, ModuleKey, TreeBuilder,
};
use rustc_hash::FxHashSet;
use tracing::{error, info};

use crate::catalog::{AnyCatalog, BoardCatalog, HttpCatalog, StaticCatalog};
use crate::config::TranslateConfig;
use crate::error::Result;
use crate::passes::{PassContext, Pipeline};

/// Turns flat exports into module forests.
#[derive(Debug)]
pub struct Translator<C> {
    catalog: C,
    pipeline: Pipeline,
    config: TranslateConfig,
}

impl Translator<AnyCatalog> {
    /// Uses the HTTP catalog when `config.catalog_url` is set, an empty
    /// catalog otherwise.
    pub fn from_config(config: TranslateConfig) -> Result<Self> {
        let catalog = match &config.catalog_url {
            Some(url) => {
                let timeout = Duration::from_secs(config.http_timeout_secs);
                AnyCatalog::Http(HttpCatalog::new(url, timeout)?)
            }
            None => AnyCatalog::Static(StaticCatalog::default()),
        };
        Ok(Self::new(catalog, config))
    }
}

impl<C: BoardCatalog> Translator<C> {
    pub fn new(catalog: C, config: TranslateConfig) -> Self {
        Self {
            catalog,
            pipeline: Pipeline::standard(),
            config,
        }
    }

    /// Replaces the standard passes.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Parses a JSON record list and translates it.
    pub async fn translate_json(&self, json: &str) -> Result<ModuleForest> {
        let records = parse_records(json)?;
        self.translate(records).await
    }

    pub async fn translate(&self, records: Vec<Record>) -> Result<ModuleForest> {
        self.config.validate()?;
        let board_codes = self.fetch_board_codes(&records).await;
        self.translate_with_codes(records, &board_codes)
    }

    /// The synchronous part of a translation, with the board codes already
    /// resolved.
    pub fn translate_with_codes(
        &self,
        records: Vec<Record>,
        board_codes: &FxHashSet<String>,
    ) -> Result<ModuleForest> {
        let input = records.len();
        let ctx = PassContext {
            board_codes,
            config: &self.config,
        };
        let records = self.pipeline.run(records, &ctx)?;

        let mut forest = TreeBuilder::new()
            .with_root_sentinel(self.config.root_sentinel.clone())
            .with_direction_decimals(self.config.direction_decimals)
            .build(&records);
        let pruned = retain_board_roots(&mut forest);
        propagate_relative(&mut forest, self.config.direction_decimals);

        info!(
            input,
            records = records.len(),
            modules = forest.len(),
            roots = forest.roots().len(),
            pruned,
            "translation finished"
        );
        Ok(forest)
    }

    /// Matches every hole and groove of a translated forest to the boards
    /// containing it, with the configured hole tolerance.
    pub fn place_features(&self, forest: &ModuleForest) -> Result<Vec<FeaturePlacement>> {
        Ok(place_features(forest, self.config.hole_tolerance)?)
    }

    /// One board of a translated forest as a standalone assembly.
    pub fn panel_assembly(&self, forest: &ModuleForest, board: ModuleKey) -> Result<ModuleForest> {
        Ok(panel_assembly(
            forest,
            board,
            self.config.hole_tolerance,
            self.config.direction_decimals,
        )?)
    }

    async fn fetch_board_codes(&self, records: &[Record]) -> FxHashSet<String> {
        let mut codes: Vec<String> = records
            .iter()
            .filter(|r| !r.ref_code.is_empty())
            .map(|r| r.ref_code.clone())
            .collect();
        codes.sort_unstable();
        codes.dedup();

        match self.catalog.board_codes(&codes).await {
            Ok(found) => {
                info!(requested = codes.len(), boards = found.len(), "board codes resolved");
                found
            }
            Err(err) => {
                error!(error = %err, "board catalog unavailable; classifying without boards");
                FxHashSet::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FailingCatalog;

    impl BoardCatalog for FailingCatalog {
        async fn board_codes(&self, _codes: &[String]) -> Result<FxHashSet<String>> {
            Err(Error::Catalog("offline".into()))
        }
    }

    const ONE_BOARD: &str = r#"[
        {"ObjID": 1, "ParentId": -1, "ObjName": "Cabinet"},
        {"ObjID": 2, "ParentId": 1, "ObjName": "Shelf", "ObjRefCode": "KuCB",
         "ObjWidth": 600, "ObjDepth": 400, "ObjHeight": 18, "TextureCode": "N"}
    ]"#;

    #[tokio::test]
    async fn catalog_failure_is_not_fatal() {
        let translator = Translator::new(FailingCatalog, TranslateConfig::default());
        let forest = translator.translate_json(ONE_BOARD).await.unwrap();
        // Without boards every tree is pruned.
        assert!(forest.is_empty());
    }

    #[tokio::test]
    async fn board_gets_a_canonical_child() {
        let translator = Translator::new(StaticCatalog::new(["KuCB"]), TranslateConfig::default());
        let forest = translator.translate_json(ONE_BOARD).await.unwrap();
        assert_eq!(forest.roots().len(), 1);
        let board = forest.find_by_id("2").unwrap();
        let canonical = forest.find_by_id("2::base").unwrap();
        assert_eq!(forest.parent(canonical), Some(board));
    }

    #[tokio::test]
    async fn invalid_config_fails_early() {
        let config = TranslateConfig {
            arc_samples: 0,
            ..Default::default()
        };
        let translator = Translator::new(StaticCatalog::default(), config);
        let err = translator.translate(Vec::new()).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn features_land_in_their_board() {
        let json = r#"[
            {"ObjID": 1, "ParentId": -1, "ObjName": "Cabinet"},
            {"ObjID": 2, "ParentId": 1, "ObjName": "Shelf", "ObjRefCode": "KuCB",
             "ObjWidth": 600, "ObjDepth": 400, "ObjHeight": 18, "TextureCode": "N"},
            {"ObjID": 3, "ParentId": 1, "ObjName": "Dowel", "ObjDesc": "ZJ:=8!GD:=12!YSFX:=Z-",
             "ObjPosX": 100, "ObjPosY": 100, "ObjPosZ": 18, "ObjPosOZ": 180}
        ]"#;
        let translator = Translator::new(StaticCatalog::new(["KuCB"]), TranslateConfig::default());
        let forest = translator.translate_json(json).await.unwrap();
        let board = forest.find_by_id("2").unwrap();
        let hole = forest.find_by_id("3").unwrap();

        let placements = translator.place_features(&forest).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].panel, board);
        assert_eq!(placements[0].features, vec![hole]);

        let assembly = translator.panel_assembly(&forest, board).unwrap();
        assert_eq!(assembly.len(), 3);
        assert!(translator.panel_assembly(&forest, hole).is_err());
    }

    #[test]
    fn from_config_picks_catalog() {
        let translator = Translator::from_config(TranslateConfig::default()).unwrap();
        assert!(matches!(translator.catalog, AnyCatalog::Static(_)));
        let config = TranslateConfig {
            catalog_url: Some("http://catalog.local/boards".into()),
            ..Default::default()
        };
        let translator = Translator::from_config(config).unwrap();
        assert!(matches!(translator.catalog, AnyCatalog::Http(_)));
    }
}
