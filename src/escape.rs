//! Entity unescaping for document text handed over in escaped form.
//!
//! Editors that store markup inside HTML often deliver it with the five
//! basic entities escaped. Only those five are recognised; every other `&`
//! sequence is copied through untouched so the document parser can judge it.

use std::borrow::Cow;

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#x27;", '\''),
];

/// Replace `&amp;`, `&lt;`, `&gt;`, `&quot;` and `&#x27;` with the characters
/// they stand for.
///
/// Decoding is a single left-to-right pass, so `&amp;lt;` becomes `&lt;` and
/// not `<`. Input without any `&` is returned borrowed.
pub fn unescape_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        output.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            Some((entity, replacement)) => {
                output.push(*replacement);
                rest = &tail[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    Cow::Owned(output)
}
