// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module key type for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid when other modules
//! are removed (generational indices), so pruning a subtree never invalidates
//! keys held for the rest of the forest.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a module node in a [`ModuleForest`](crate::ModuleForest).
    pub struct ModuleKey;
}
