//! # JSON Output Module
//!
//! Report strutturato in JSON dei byte risparmiati da una conversione.
//!
//! ## Formato:
//! ```json
//! {
//!   "files": 12,
//!   "beforeBytes": 48213377,
//!   "afterBytes": 3120044,
//!   "savingsPct": 93.5
//! }
//! ```
//!
//! `savingsPct` è `null` quando non è stato letto alcun byte.

use serde::{Deserialize, Serialize};

/// Totals for one optimizer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
    pub files: usize,
    pub before_bytes: u64,
    pub after_bytes: u64,
    pub savings_pct: Option<f64>,
}

impl SavingsReport {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Emette il report su stdout
    pub fn emit(&self) {
        if let Ok(json) = self.to_json() {
            println!("{}", json);
        }
    }
}
