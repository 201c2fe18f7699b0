use serde::{Deserialize, Serialize};

// One extracurricular offering. The activity name is the catalog key and is
// not repeated inside the record, matching the wire shape of `GET /activities`
// (a JSON object keyed by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: usize,
    pub participants: Vec<String>,
}
