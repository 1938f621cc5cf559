/// Replace `${ENV_VAR}` placeholders in raw config text from the process
/// environment.
///
/// Unset variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_vars(input, |name| std::env::var(name).ok())
}

/// Replace `${NAME}` placeholders using `resolve`.
///
/// Unresolved names, empty `${}` and an unterminated `${` are emitted
/// literally.
pub fn substitute_vars(input: &str, mut resolve: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match (!name.is_empty()).then(|| resolve(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
