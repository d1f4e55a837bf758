// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod detail;
pub mod filter;
pub mod forms;
pub mod gateway;
pub mod ids;
pub mod model;
pub mod prefs;
pub mod state;
pub mod summary;

pub use detail::*;
pub use filter::*;
pub use forms::*;
pub use gateway::*;
pub use ids::*;
pub use model::*;
pub use prefs::*;
pub use state::*;
pub use summary::*;
