// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod credential;
pub mod run;

pub use activity::{ActivityDetail, ActivityFields, ActivityMap, ActivitySummary};
pub use credential::AccessCredential;
pub use run::NormalizedRunRow;
