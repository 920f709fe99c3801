use serde::Deserialize;

/// Acknowledgement the backend returns for writes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    #[serde(default)]
    pub inserted_id: Option<String>,
    #[serde(default)]
    pub modified_count: Option<u64>,
    #[serde(default)]
    pub deleted_count: Option<u64>,
}

impl WriteResult {
    pub fn inserted(&self) -> bool {
        self.inserted_id.is_some()
    }
}
