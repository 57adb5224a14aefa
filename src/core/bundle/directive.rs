//! Line classification for the handful of directive shapes the bundler cares about.

/// What a (trimmed) source line means to the bundler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a>
{
    /// `#pragma once`
    PragmaOnce,
    /// `#include <...>`; deduplicated by its exact trimmed text
    SystemInclude,
    /// `using namespace std;`
    UsingStd,
    /// `#include "path"` with the quoted path
    LocalInclude(&'a str),
    /// Anything else, emitted verbatim
    Other,
}

impl<'a> Directive<'a>
{
    /// Classify an already-trimmed line
    pub fn classify(trimmed: &'a str) -> Self
    {
        match trimmed
        {
            "#pragma once" => return Directive::PragmaOnce,
            "using namespace std;" => return Directive::UsingStd,
            _ =>
            {}
        }

        let Some(rest) = trimmed.strip_prefix("#include")
        else
        {
            return Directive::Other;
        };
        let rest = rest.trim_start();

        if let Some(inner) = rest.strip_prefix('<')
        {
            // at least one character before the closing '>'
            if delimited(inner, '>').is_some()
            {
                return Directive::SystemInclude;
            }
        }
        else if let Some(inner) = rest.strip_prefix('"')
        {
            if let Some(path) = delimited(inner, '"')
            {
                return Directive::LocalInclude(path);
            }
        }

        Directive::Other
    }
}

/// Shortest non-empty prefix of `s` followed by `close`.
/// Anything after the closing delimiter (a trailing comment, say) is ignored.
fn delimited(
    s: &str,
    close: char,
) -> Option<&str>
{
    let mut chars = s.char_indices();

    // the first character is always part of the payload, even if it is `close`
    let (_, first) = chars.next()?;
    if first == '\n'
    {
        return None;
    }

    for (i, c) in chars
    {
        if c == close
        {
            return Some(&s[..i]);
        }
        if c == '\n'
        {
            return None;
        }
    }

    None
}

/// Quoted includes naming a debug helper stay external on purpose
pub fn is_debug_header(path: &str) -> bool
{
    path.to_ascii_lowercase()
        .contains("debug")
}
