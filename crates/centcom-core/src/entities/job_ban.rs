//! Job ban - a restriction scoped to one in-game role

use serde::{Deserialize, Serialize};

/// Role-scoped restriction owned by a single [`Ban`](super::Ban)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobBan {
    pub job: String,
}

impl JobBan {
    pub fn new(job: impl Into<String>) -> Self {
        Self { job: job.into() }
    }
}
