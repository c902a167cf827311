#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit {
        request_id: crate::RequestId,
        inputs: crate::ValidatedInputs,
    },
    DownloadUrl { url: String, filename: String },
}
