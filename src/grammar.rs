//! Grammar validation helpers for MIME tokens and boundaries.
//!
//! Based on RFC 2045 token and RFC 2046 boundary definitions.

/// Longest boundary RFC 2046 allows.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Reports whether the character is in 'tspecials' as defined by RFC 2045.
///
/// tspecials := "(" / ")" / "<" / ">" / "@" / "," / ";" / ":" / "\" / <"> / "/" / "[" / "]" / "?" / "="
pub fn is_tspecial(c: char) -> bool {
    matches!(c, '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '=')
}

/// Reports whether the character is in 'token' as defined by RFC 2045.
///
/// token := 1*<any (US-ASCII) CHAR except SPACE, CTLs, or tspecials>
pub fn is_token_char(c: char) -> bool {
    c > '\x20' && c < '\x7f' && !is_tspecial(c)
}

/// Reports whether the string is a valid 'token' as defined by RFC 2045.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// Reports whether the character is in 'bcharsnospace' as defined by RFC 2046.
///
/// bcharsnospace := DIGIT / ALPHA / "'" / "(" / ")" / "+" / "_" / "," / "-" / "." / "/" / ":" / "=" / "?"
pub fn is_bchar_nospace(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '\'' | '(' | ')' | '+' | '_' | ',' | '-' | '.' | '/' | ':' | '=' | '?')
}

/// Reports whether the string is a valid multipart boundary.
///
/// boundary := 0*69<bchars> bcharsnospace, with at least one character.
pub fn is_boundary(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_BOUNDARY_LEN {
        return false;
    }
    let last = s.len() - 1;
    s.char_indices()
        .all(|(i, c)| is_bchar_nospace(c) || (c == ' ' && i != last))
}
