// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cabinet-Lite Processing
//!
//! End-to-end translation of flat cabinet exports into module forests.
//!
//! A [`Translator`] resolves board reference codes against a
//! [`BoardCatalog`], runs the ordered record passes of a [`Pipeline`]
//! (attribute inference, canonical base panels, imported models) and hands
//! the result to the tree builder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cabinet_lite_processing::{StaticCatalog, TranslateConfig, Translator};
//!
//! # async fn run() -> cabinet_lite_processing::Result<()> {
//! let translator = Translator::new(StaticCatalog::new(["KuCB"]), TranslateConfig::from_env());
//! let forest = translator
//!     .translate_json(r#"[{"ObjID": 1, "ParentId": -1, "ObjRefCode": "KuCB"}]"#)
//!     .await?;
//! println!("{}", forest.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod passes;
pub mod translator;

pub use catalog::{AnyCatalog, BoardCatalog, HttpCatalog, StaticCatalog};
pub use config::TranslateConfig;
pub use error::{Error, Result};
pub use passes::{
    canonical_layout, canonical_panel, AttributePass, BasePanelPass, CanonicalLayout,
    ImportedModelPass, PassContext, Pipeline, RecordPass,
};
pub use translator::Translator;
