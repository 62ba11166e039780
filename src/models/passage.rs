use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared reading passage referenced by zero or more questions.
///
/// Selection guarantees at most one question per passage appears in a
/// generated paper; rendering groups questions under their passage text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: Option<String>,
    pub body: String,
}
