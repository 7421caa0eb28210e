use std::collections::HashMap;

/// A message successfully split into command name, positionals, and flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    /// First positional token with the prefix stripped.
    pub name: String,
    /// Candidate arguments in original left-to-right order.
    pub args: Vec<String>,
    /// Flag key (without the leading `-`) to raw value.
    pub flags: HashMap<String, String>,
}

#[derive(Debug)]
struct Token {
    text: String,
    quoted: bool,
}

/// Split raw message text into tokens, treating double-quoted substrings as
/// single tokens with the quotes stripped. An unterminated quote runs to the
/// end of the input.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' {
            chars.next();
            let mut text = String::new();
            for next in chars.by_ref() {
                if next == '"' {
                    break;
                }
                text.push(next);
            }
            tokens.push(Token { text, quoted: true });
            continue;
        }

        let mut text = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_whitespace() {
                break;
            }
            text.push(next);
            chars.next();
        }
        tokens.push(Token {
            text,
            quoted: false,
        });
    }

    tokens
}

/// The flag key of an unquoted token like `-f`, or `None` if the token is
/// positional. A leading `-` followed by a non-letter (e.g. `-5`) does not
/// introduce a flag.
fn flag_key(token: &Token) -> Option<&str> {
    if token.quoted {
        return None;
    }
    let key = token.text.strip_prefix('-')?;
    let mut chars = key.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric()) {
        Some(key)
    } else {
        None
    }
}

/// Parse raw message text against the configured prefix.
///
/// Returns `None` ("not a command", not an error) when the trimmed content
/// does not start with the prefix or produces no tokens.
pub fn parse_message(content: &str, prefix: &str) -> Option<ParsedCommand> {
    let content = content.trim();
    if prefix.is_empty() || !content.starts_with(prefix) {
        return None;
    }

    let tokens = tokenize(content);
    if tokens.is_empty() {
        return None;
    }

    let mut positionals: Vec<String> = Vec::new();
    let mut flags: HashMap<String, String> = HashMap::new();

    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if let Some(key) = flag_key(&token) {
            let key = key.to_owned();
            // A flag immediately followed by another flag, or trailing, is a
            // bare switch and maps to "true".
            let value = match iter.peek() {
                Some(next) if flag_key(next).is_none() => {
                    iter.next().map(|t| t.text).unwrap_or_default()
                }
                _ => "true".to_owned(),
            };
            flags.insert(key, value);
        } else {
            positionals.push(token.text);
        }
    }

    if positionals.is_empty() {
        return None;
    }

    let name = positionals.remove(0).replacen(prefix, "", 1);

    Some(ParsedCommand {
        name,
        args: positionals,
        flags,
    })
}
