//! Conversions from SQL identifiers to GraphQL identifiers.

use compact_str::{CompactString, format_compact};

use crate::error::{CompileError, CompileResult};

/// `user_id` -> `userId`.
///
/// The input is lowercased first. A `-` or `_` directly followed by a letter is
/// removed and the letter uppercased. Any other separator is kept as is.
pub fn to_camel(snake: &str) -> CompactString {
    let lowercase = snake.to_lowercase();
    let mut output = CompactString::with_capacity(lowercase.len());
    let mut chars = lowercase.chars().peekable();

    while let Some(ch) = chars.next() {
        if matches!(ch, '-' | '_') {
            if let Some(next) = chars.next_if(char::is_ascii_lowercase) {
                output.push(next.to_ascii_uppercase());
                continue;
            }
        }
        output.push(ch);
    }

    output
}

/// `user_account` -> `UserAccount`
pub fn to_pascal(snake: &str) -> CompileResult<CompactString> {
    let camel = to_camel(snake);
    let mut chars = camel.chars();
    let first = chars.next().ok_or(CompileError::EmptyName)?;

    Ok(first.to_uppercase().chain(chars).collect())
}

/// Naive plural: always appends `s`.
pub fn pluralize(identifier: &str) -> CompactString {
    format_compact!("{identifier}s")
}

/// Naive singular: strips one trailing `s`, except after `s`, `u` or `i`
/// (`address`, `status`, `analysis` stay as they are). Never yields an empty name.
pub fn singularize(identifier: &str) -> &str {
    match identifier.strip_suffix('s') {
        Some(stem)
            if !stem.is_empty()
                && !(stem.ends_with('s') || stem.ends_with('u') || stem.ends_with('i')) =>
        {
            stem
        }
        _ => identifier,
    }
}

/// The GraphQL names derived from one table name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EntityNames {
    /// `blog_posts` -> `BlogPost`
    pub type_name: CompactString,
    /// `blog_posts` -> `blogPost`
    pub singular: CompactString,
    /// `blog_posts` -> `blogPosts`
    pub plural: CompactString,
}

impl EntityNames {
    pub fn from_table(table_name: &str) -> CompileResult<Self> {
        let singular_table = singularize(table_name);
        let singular = to_camel(singular_table);

        Ok(Self {
            type_name: to_pascal(singular_table)?,
            plural: pluralize(&singular),
            singular,
        })
    }
}
