// 🏗️ Command Line Parser
// Turns one raw console line into an ordered token list.
//
// Rules:
// 1. Shell-style word splitting (whitespace, quotes, backslash escapes)
// 2. Commas stripped from both ends of every word ("Foo," → "Foo")
// 3. A {...} literal, else a [...] literal, ends tokenization: the prefix is
//    split with rules 1-2 and the literal is appended verbatim

use crate::error::CommandError;

// ============================================================================
// LINE PARSER
// ============================================================================

/// Tokenize a console line.
///
/// Only the first brace literal is honored (braces win over brackets);
/// anything after its closing delimiter is dropped.
///
/// # Examples
/// ```
/// use hbnb_console::parser::parse_line;
///
/// let tokens = parse_line(r#"Foo {"a": 1} [2,3]"#).unwrap();
/// assert_eq!(tokens, vec!["Foo".to_string(), r#"{"a": 1}"#.to_string()]);
/// ```
pub fn parse_line(line: &str) -> Result<Vec<String>, CommandError> {
    let literal = find_literal(line, '{', '}').or_else(|| find_literal(line, '[', ']'));

    match literal {
        Some((start, end)) => {
            let mut tokens = tokenize(&line[..start])?;
            tokens.push(line[start..end].to_string());
            Ok(tokens)
        }
        None => tokenize(line),
    }
}

/// Word-split then strip commas, no literal handling
pub fn tokenize(text: &str) -> Result<Vec<String>, CommandError> {
    Ok(split_words(text)?
        .into_iter()
        .map(|word| word.trim_matches(',').to_string())
        .collect())
}

/// Byte range of the first `open ... close` span (non-greedy: ends at the
/// first `close` after the first `open`)
fn find_literal(line: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = line.find(open)?;
    let close_offset = line[start..].find(close)?;
    Some((start, start + close_offset + close.len_utf8()))
}

// ============================================================================
// SHELL-STYLE SPLITTING
// ============================================================================

/// POSIX-shell word splitting.
///
/// - Single quotes: everything literal until the closing quote
/// - Double quotes: `\"` and `\\` are escapes, other backslashes are kept
/// - Outside quotes: backslash escapes the next character
/// - Adjacent quoted/unquoted pieces join into one word; `""` is an empty word
pub fn split_words(text: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnbalancedQuotes),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\')) => current.push(ch),
                            Some(ch) => {
                                current.push('\\');
                                current.push(ch);
                            }
                            None => return Err(CommandError::UnbalancedQuotes),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnbalancedQuotes),
                    }
                }
            }
            '\\' => {
                in_word = true;
                // A trailing backslash stands for itself
                current.push(chars.next().unwrap_or('\\'));
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}

// ============================================================================
// TESTS
// ============================================================================
