use std::hash::{Hash, Hasher};
use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::types::{ClusterRow, ColorMode, OutputConfig, OutputMode};

const KEY_COL_WIDTH: usize = 28;
const SERVER_COL_WIDTH: usize = 40;

pub fn format_row(row: &ClusterRow, out: &OutputConfig) -> String {
    match out.mode {
        OutputMode::Human => format_human(row, should_color(out.color)),
        OutputMode::Json => format_json(row),
    }
}

fn format_json(row: &ClusterRow) -> String {
    serde_json::to_string(row).unwrap_or_else(|e| {
        serde_json::json!({ "key": row.key, "error": e.to_string() }).to_string()
    })
}

fn format_human(row: &ClusterRow, color: bool) -> String {
    let key_padded = pad(&row.key, KEY_COL_WIDTH);

    let key_final = if color {
        colorize(key_padded, &row.cluster)
    } else {
        key_padded
    };

    let mut flags = Vec::new();
    if row.primary {
        flags.push("primary");
    }
    if row.insecure {
        flags.push("insecure");
    }

    let line = format!(
        "{key_final} │ {} │ {}",
        pad(&row.server, SERVER_COL_WIDTH),
        row.auth
    );

    if flags.is_empty() {
        line
    } else {
        format!("{line} [{}]", flags.join(","))
    }
}

fn pad(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_string()
    } else {
        format!("{s:<width$}", width = width)
    }
}

fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Never => false,
        ColorMode::Always => true,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Every namespace of one cluster shares a color.
fn colorize(padded: String, cluster: &str) -> String {
    match stable_color_index(cluster) {
        0 => padded.bright_blue().to_string(),
        1 => padded.bright_green().to_string(),
        2 => padded.bright_magenta().to_string(),
        3 => padded.bright_cyan().to_string(),
        4 => padded.bright_yellow().to_string(),
        5 => padded.blue().to_string(),
        6 => padded.green().to_string(),
        7 => padded.magenta().to_string(),
        _ => padded.cyan().to_string(),
    }
}

fn stable_color_index(s: &str) -> usize {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut h);
    (h.finish() as usize) % 9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthKind;

    fn row(primary: bool, insecure: bool) -> ClusterRow {
        ClusterRow {
            key: "east.argo".to_string(),
            cluster: "east".to_string(),
            namespace: Some("argo".to_string()),
            server: "https://east.example:6443/".to_string(),
            auth: AuthKind::Token,
            insecure,
            primary,
        }
    }

    fn plain(mode: OutputMode) -> OutputConfig {
        OutputConfig {
            mode,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn human_line_has_columns_and_flags() {
        let line = format_row(&row(true, true), &plain(OutputMode::Human));
        assert!(line.starts_with("east.argo "));
        assert!(line.contains("│ https://east.example:6443/"));
        assert!(line.contains("│ token"));
        assert!(line.ends_with("[primary,insecure]"));
    }

    #[test]
    fn human_line_without_flags() {
        let line = format_row(&row(false, false), &plain(OutputMode::Human));
        assert!(line.ends_with("token"));
    }

    #[test]
    fn json_line_is_a_row_object() {
        let line = format_row(&row(false, true), &plain(OutputMode::Json));
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["key"], "east.argo");
        assert_eq!(v["namespace"], "argo");
        assert_eq!(v["auth"], "token");
        assert_eq!(v["insecure"], true);
        assert_eq!(v["primary"], false);
    }

    #[test]
    fn colored_key_keeps_text() {
        let out = OutputConfig {
            mode: OutputMode::Human,
            color: ColorMode::Always,
        };
        let line = format_row(&row(false, false), &out);
        assert!(line.contains("east.argo"));
        assert!(line.contains('\u{1b}'));
    }

    #[test]
    fn color_index_is_stable() {
        assert_eq!(stable_color_index("east"), stable_color_index("east"));
    }
}
