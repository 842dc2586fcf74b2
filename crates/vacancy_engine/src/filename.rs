/// Export file name for a search term: spaces become underscores, characters
/// not allowed in file names become `_`, and `.json` is appended.
pub fn export_filename(query: &str) -> String {
    let mut stem: String = query
        .trim()
        .chars()
        .map(|c| if c == ' ' || is_forbidden(c) { '_' } else { c })
        .collect();
    stem = stem.trim_matches('.').to_string();
    if stem.is_empty() {
        stem = "vacancies".to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    format!("{stem}.json")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
