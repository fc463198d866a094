/// Lowercased command name of a prefixed message such as `!wife`.
///
/// Returns `None` when the content does not start with `prefix` or names no
/// command. Anything after the name is ignored.
pub fn parse_command(content: &str, prefix: char) -> Option<String> {
    let content = content.trim().strip_prefix(prefix)?.trim_start();

    content
        .split_whitespace()
        .next()
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_command() {
        assert_eq!(parse_command("!wife", '!'), Some("wife".to_owned()));
    }

    #[test]
    fn lowercases_name_and_drops_tail() {
        assert_eq!(
            parse_command("  !WIFE  please now ", '!'),
            Some("wife".to_owned())
        );
    }

    #[test]
    fn ignores_unprefixed_and_empty() {
        assert_eq!(parse_command("wife", '!'), None);
        assert_eq!(parse_command("!", '!'), None);
        assert_eq!(parse_command("!   ", '!'), None);
    }
}
