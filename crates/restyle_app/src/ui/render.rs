use restyle_core::{AppViewModel, StatusView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Overwritten in place; only shown while a request is running.
    Progress,
    Information,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub severity: Severity,
    pub text: String,
}

impl Line {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

pub fn render(view: &AppViewModel) -> Vec<Line> {
    let mut lines = Vec::new();

    if view.loading {
        let text = match view.received_bytes {
            Some(bytes) => format!(
                "{} {} bytes received",
                view.submit_label,
                format_with_commas(bytes)
            ),
            None => view.submit_label.to_string(),
        };
        lines.push(Line::new(Severity::Progress, text));
    }

    match &view.status {
        StatusView::None => {}
        StatusView::Error(message) => {
            lines.push(Line::new(Severity::Error, format!("Error: {message}")));
        }
        StatusView::Success {
            message,
            filename,
            download_url,
            saved_path,
        } => {
            lines.push(Line::new(Severity::Success, format!("Success! {message}")));
            if let Some(filename) = filename {
                lines.push(Line::new(
                    Severity::Information,
                    format!("Downloaded: {filename}"),
                ));
            }
            if let Some(path) = saved_path {
                lines.push(Line::new(
                    Severity::Information,
                    format!("Saved to: {}", path.display()),
                ));
            }
            if let Some(url) = download_url {
                lines.push(Line::new(
                    Severity::Information,
                    format!("Download again available: {url}"),
                ));
            }
        }
        StatusView::Response(text) => {
            lines.push(Line::new(Severity::Warning, format!("Response: {text}")));
        }
    }

    if let Some(notice) = &view.download_notice {
        lines.push(Line::new(Severity::Information, notice.clone()));
    }

    lines
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
