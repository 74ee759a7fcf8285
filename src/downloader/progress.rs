//! Progress event parsing and log-line rendering
//!
//! The engine is launched with `--newline --progress-template` so every
//! progress update arrives as one machine-readable stdout line. Each parsed
//! event produces exactly one log line, in arrival order; no aggregation or
//! rate limiting.

/// Template handed to the engine. The filename comes last so a separator
/// inside it cannot corrupt the numeric fields; missing totals print as NA.
pub const PROGRESS_TEMPLATE: &str = "download:%(progress.status)s|%(progress.downloaded_bytes|0)s|%(progress.total_bytes|NA)s|%(progress.total_bytes_estimate|NA)s|%(progress.filename)s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Downloading,
    Finished,
}

/// One progress update emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub filename: String,
    pub downloaded_bytes: u64,
    /// Exact total when the engine knows it, else its estimate, else None
    pub total_bytes: Option<u64>,
}

/// Decode one stdout line into an event. Lines that are not progress
/// updates (merger output, informational messages) return None.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let mut parts = line.trim().splitn(5, '|');

    let status = match parts.next()? {
        "downloading" => ProgressStatus::Downloading,
        "finished" => ProgressStatus::Finished,
        _ => return None,
    };
    let downloaded_bytes = parse_bytes(parts.next()?).unwrap_or(0);
    let total = parse_bytes(parts.next()?);
    let estimate = parse_bytes(parts.next()?);
    let filename = parts.next()?.to_string();

    Some(ProgressEvent {
        status,
        filename,
        downloaded_bytes,
        total_bytes: total.or(estimate),
    })
}

/// Byte counters may print as integers or floats depending on the engine's
/// bookkeeping; anything else (NA) is an unknown
fn parse_bytes(field: &str) -> Option<u64> {
    let value: f64 = field.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Render one event as a human-readable log line
pub fn render(event: &ProgressEvent) -> String {
    match event.status {
        ProgressStatus::Downloading => match event.total_bytes {
            Some(total) if total > 0 => {
                let percent = event.downloaded_bytes as f64 / total as f64 * 100.0;
                format!("Downloading: {} - {:.1}%", event.filename, percent)
            }
            _ => {
                let megabytes = event.downloaded_bytes as f64 / (1024.0 * 1024.0);
                format!("Downloading: {} - {:.2}MB", event.filename, megabytes)
            }
        },
        ProgressStatus::Finished => format!("Finished downloading: {}", event.filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_downloading_with_total() {
        let event = parse_progress_line("downloading|512|2048|NA|clip.mp4").unwrap();
        assert_eq!(event.status, ProgressStatus::Downloading);
        assert_eq!(event.filename, "clip.mp4");
        assert_eq!(event.downloaded_bytes, 512);
        assert_eq!(event.total_bytes, Some(2048));
    }

    #[test]
    fn test_parse_falls_back_to_estimate() {
        let event = parse_progress_line("downloading|512|NA|4096.7|clip.mp4").unwrap();
        assert_eq!(event.total_bytes, Some(4096));
    }

    #[test]
    fn test_parse_keeps_separator_in_filename() {
        let event = parse_progress_line("downloading|1|2|NA|odd|name.mp4").unwrap();
        assert_eq!(event.filename, "odd|name.mp4");
    }

    #[test]
    fn test_parse_rejects_non_progress_lines() {
        assert_eq!(parse_progress_line("[Merger] Merging formats"), None);
        assert_eq!(parse_progress_line(""), None);
        assert_eq!(parse_progress_line("error|1|2|3|x"), None);
    }

    #[test]
    fn test_render_percent_one_decimal() {
        let event = ProgressEvent {
            status: ProgressStatus::Downloading,
            filename: "clip.mp4".to_string(),
            downloaded_bytes: 333,
            total_bytes: Some(1000),
        };
        assert_eq!(render(&event), "Downloading: clip.mp4 - 33.3%");
    }

    #[test]
    fn test_render_megabytes_when_total_unknown() {
        let event = ProgressEvent {
            status: ProgressStatus::Downloading,
            filename: "clip.mp4".to_string(),
            downloaded_bytes: 3 * 1024 * 1024 / 2,
            total_bytes: None,
        };
        assert_eq!(render(&event), "Downloading: clip.mp4 - 1.50MB");
    }

    #[test]
    fn test_render_finished_names_the_file() {
        let event = ProgressEvent {
            status: ProgressStatus::Finished,
            filename: "clip.mp4".to_string(),
            downloaded_bytes: 0,
            total_bytes: None,
        };
        assert_eq!(render(&event), "Finished downloading: clip.mp4");
    }
}
