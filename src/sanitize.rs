use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 ]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turns a dashboard title into a file-friendly name:
/// "Telegraf: Workshop System Dashboard (Windows)" becomes
/// `telegraf_workshop_system_dashboard_windows`.
pub fn title_for_file(title: &str) -> String {
    let cleaned = NON_ALPHANUMERIC.replace_all(title, " ");
    let collapsed = WHITESPACE.replace_all(&cleaned, " ");
    collapsed.trim().to_lowercase().replace(' ', "_")
}

/// First word of the file-friendly title, used as the export subdirectory.
pub fn title_first_word(title: &str) -> String {
    title_for_file(title)
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string()
}
