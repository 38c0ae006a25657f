//! Text rendering for tool observations.
//!
//! Observations use the literal notation models see most often in dataframe
//! tutorials: single-quoted strings, `['a', 'b']` lists, `{k: v}` mappings and
//! `nan` for missing floats.

/// Quote a string the way a Python `repr` would.
pub fn py_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// `['a', 'b']`
pub fn py_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| py_str(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Float rendering: integral values keep a trailing `.0`, non-finite values
/// are `nan` / `inf` / `-inf`.
pub fn py_float(v: f64) -> String {
    if v.is_nan() {
        "nan".into()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".into() } else { "-inf".into() }
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// `True` / `False`
pub const fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Fixed six-decimal rendering used inside summary tables.
pub fn table_float(v: f64) -> String {
    if v.is_nan() { "NaN".into() } else { format!("{v:.6}") }
}

/// Render a table with left-aligned row labels and right-aligned columns.
///
/// Every column must hold one cell per row label.
pub fn render_table(row_labels: &[&str], columns: &[(String, Vec<String>)]) -> String {
    let label_width = row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|(header, cells)| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(row_labels.len() + 1);

    let mut header = " ".repeat(label_width);
    for ((name, _), width) in columns.iter().zip(&widths) {
        header.push_str(&format!("  {name:>width$}"));
    }
    lines.push(header);

    for (row, label) in row_labels.iter().enumerate() {
        let mut line = format!("{label:<label_width$}");
        for ((_, cells), width) in columns.iter().zip(&widths) {
            let cell = cells.get(row).map_or("", String::as_str);
            line.push_str(&format!("  {cell:>width$}"));
        }
        lines.push(line);
    }

    lines.join("\n")
}
