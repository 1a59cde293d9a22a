use deunicode::deunicode;

/// Turn a spreadsheet column header into the field key used across the crate.
///
/// Lowercases, drops newlines, BOMs and parentheses, turns `" - "`, `", "`,
/// any whitespace and `.` into `_`, then folds accented characters to ASCII.
///
/// # Examples
///
/// ```
/// use recon::rbac::normalize_key;
///
/// assert_eq!(normalize_key("Número de Usuario"), "numero_de_usuario");
/// assert_eq!(normalize_key("Tipo de Usuario(Interno/Externo)"), "tipo_de_usuariointerno/externo");
/// ```
pub fn normalize_key(raw: &str) -> String {
    let lowered: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\u{feff}' | '(' | ')'))
        .collect();

    let mut out = String::with_capacity(lowered.len());
    let mut rest = lowered.as_str();
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(" - ").or_else(|| rest.strip_prefix(", ")) {
            out.push('_');
            rest = tail;
            continue;
        }
        if c.is_whitespace() || c == '.' {
            out.push('_');
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    deunicode(&out)
}
