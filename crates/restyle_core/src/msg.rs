use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL field.
    InputUrlChanged(String),
    /// User edited the topic field.
    TopicChanged(String),
    /// User submitted the form.
    SubmitClicked,
    /// Engine progress for a submission: total body bytes received so far.
    Progress {
        request_id: crate::RequestId,
        bytes: u64,
    },
    /// Engine completion for a submission.
    SubmitDone {
        request_id: crate::RequestId,
        result: crate::SubmitResult,
    },
    /// User asked to fetch the response's `download_url` again.
    DownloadAgainClicked,
    /// Engine completion for a repeat download.
    DownloadAgainDone { result: Result<PathBuf, String> },
    /// Fallback for placeholder wiring.
    NoOp,
}
