/// Default placeholder sigil.
pub const DEFAULT_SIGIL: char = '$';

/// Return the reference key of a placeholder string, or `None` when the
/// string is ordinary text.
///
/// Only the single leading sigil is stripped; `"$$x"` references `"$x"` and
/// a lone `"$"` references the empty key. There is no escape syntax.
pub fn reference_key(text: &str, sigil: char) -> Option<&str> {
    text.strip_prefix(sigil)
}
