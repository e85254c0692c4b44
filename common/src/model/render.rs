use serde::{Deserialize, Serialize};

/// Where the data substituted into a preview came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    /// Real tenant, member and contract records.
    Live,
    /// Stand-in records, because none existed or the lookup failed.
    Synthetic,
    /// No substitution at all (unsaved template preview).
    None,
}

/// Final, flat output of a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub markup: String,
    pub stylesheet: String,
    pub sample_source: SampleSource,
}
