use merit_core::TableRenderer;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table for string rows. Cells may span several lines;
/// each row is as tall as its tallest cell.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .flat_map(|cell| cell.lines())
                .map(display_len)
                .max()
                .unwrap_or(0)
                .max(display_len(header))
                .max(6)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| {
            let text = truncate_text(header, *width);
            format_cell(&text, *width, false)
        })
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(display_len(&header_line));

    let mut lines = vec![header_line.trim_end().to_string(), divider];
    for row in rows {
        let cells: Vec<Vec<&str>> = widths
            .iter()
            .enumerate()
            .map(|(index, _)| {
                row.get(index)
                    .map_or_else(|| vec!["-"], |cell| cell.lines().collect())
            })
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);

        for line_index in 0..height {
            let line = widths
                .iter()
                .zip(cells.iter())
                .map(|(width, cell)| {
                    let value = cell.get(line_index).copied().unwrap_or("");
                    let truncated = truncate_text(value, *width);
                    let numeric = height == 1 && looks_numeric(&truncated);
                    let colored = if options.color {
                        colorize_status(&truncated)
                    } else {
                        truncated
                    };
                    format_cell(&colored, *width, numeric)
                })
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(line.trim_end().to_string());
        }
    }
    lines.join("\n")
}

/// Two-column renderer handed to [`merit_core::Handler::prettyprint`].
#[derive(Clone, Copy, Debug)]
pub struct EntityTable {
    pub color: bool,
}

impl TableRenderer for EntityTable {
    fn render(&self, headers: [&str; 2], rows: &[[String; 2]], max_width: usize) -> String {
        let rows = rows.iter().map(|row| row.to_vec()).collect::<Vec<_>>();
        render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: Some(max_width),
                color: self.color,
            },
        )
    }
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let mut candidate_idx = None;
        let mut candidate_width = 0usize;
        for (idx, width) in widths.iter().enumerate() {
            let min_width = display_len(headers[idx]).max(6);
            if *width > min_width && *width > candidate_width {
                candidate_idx = Some(idx);
                candidate_width = *width;
            }
        }

        let Some(idx) = candidate_idx else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if display_len(value) <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
}

fn format_cell(value: &str, width: usize, numeric: bool) -> String {
    let pad = width.saturating_sub(display_len(value));
    if numeric {
        format!("{}{}", " ".repeat(pad), value)
    } else {
        format!("{}{}", value, " ".repeat(pad))
    }
}

fn colorize_status(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let code = if matches!(lower.as_str(), "ok" | "true" | "valid") {
        Some("32")
    } else if matches!(lower.as_str(), "false" | "missing" | "invalid") {
        Some("31")
    } else {
        None
    };

    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}

/// Visible width: characters outside ANSI color sequences.
fn display_len(value: &str) -> usize {
    let mut len = 0;
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        len += 1;
    }
    len
}
