// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod carc;
pub mod columns;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod ids;
pub mod listview;
pub mod modal;
pub mod model;
pub mod selector;
pub mod state;

pub use fetch::*;
pub use ids::*;
pub use model::*;
pub use state::*;
