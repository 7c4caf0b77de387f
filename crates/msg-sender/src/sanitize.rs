//! Text sanitation for untrusted contact-form input.
//!
//! [`escape_html`] makes text safe to embed in HTML or in Telegram's HTML
//! subset. The `strip_*` helpers drop characters that have no business in a
//! contact form, decided by Unicode general category.

use std::sync::LazyLock;

use regex::Regex;
use unicode_general_category::{GeneralCategory, get_general_category};

static MAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-0-9A-Za-z!#$%&'*+/=?^_`{|}~.]+@[-0-9A-Za-z_.~]+\.[A-Za-z]+$")
        .expect("mail pattern is valid")
});

/// Escape the five reserved markup characters.
///
/// Every occurrence is replaced in a single pass, so references produced for
/// one character are never escaped again.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep only printable characters. Names are single-line, so control
/// characters (newlines included) are dropped too.
pub fn strip_unprintable_name(name: &str) -> String {
    name.chars().filter(|&c| is_printable(c)).collect()
}

/// Keep printable and control characters, so line structure survives.
pub fn strip_unprintable_body(body: &str) -> String {
    body.chars()
        .filter(|&c| is_printable(c) || c.is_control())
        .collect()
}

/// Loose `local@domain.tld` check for the sender's reply address.
pub fn looks_like_mail(mail: &str) -> bool {
    MAIL_PATTERN.is_match(mail)
}

/// Printable: letters, marks, numbers, punctuation, symbols and the ASCII
/// space. Format, private-use, unassigned and surrogate code points are not,
/// and neither is any separator other than U+0020.
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    if c == ' ' {
        return true;
    }
    match get_general_category(c) {
        UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter => true,
        NonspacingMark | SpacingMark | EnclosingMark => true,
        DecimalNumber | LetterNumber | OtherNumber => true,
        ConnectorPunctuation | DashPunctuation | OpenPunctuation | ClosePunctuation
        | InitialPunctuation | FinalPunctuation | OtherPunctuation => true,
        MathSymbol | CurrencySymbol | ModifierSymbol | OtherSymbol => true,
        _ => false,
    }
}
