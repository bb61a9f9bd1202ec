// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod model;
pub mod search;
pub mod state;

pub use model::*;
pub use search::*;
pub use state::*;
