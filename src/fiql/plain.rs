//! Conversion of plain `name=value` queries into FIQL

use crate::fiql::operators::{AND, OR};

const FROM_SUFFIX: &str = "From";
const TILL_SUFFIX: &str = "Till";

/// Build a FIQL expression from decoded query pairs
///
/// Values of a repeated name are OR-ed, distinct names are AND-ed. A
/// `From`/`Till` suffix turns into a `=ge=`/`=le=` bound on the stripped name.
/// Pairs with an empty name or value are skipped. Returns `None` when nothing
/// is left.
pub fn to_fiql<I, K, V>(pairs: I) -> Option<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    // Groups keep first-seen order
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in pairs {
        let (name, value) = (name.as_ref(), value.as_ref());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        let term = term(name, value);
        match groups.iter_mut().find(|(key, _)| key == name) {
            Some((_, terms)) => terms.push(term),
            None => groups.push((name.to_string(), vec![term])),
        }
    }

    let members: Vec<String> = groups
        .into_iter()
        .map(|(_, terms)| bracket(terms, OR))
        .collect();
    match members.len() {
        0 => None,
        _ => Some(bracket(members, AND)),
    }
}

fn term(name: &str, value: &str) -> String {
    let (property, token) = match (name.strip_suffix(FROM_SUFFIX), name.strip_suffix(TILL_SUFFIX)) {
        (Some(property), _) if !property.is_empty() => (property, "=ge="),
        (_, Some(property)) if !property.is_empty() => (property, "=le="),
        _ => (name, "=="),
    };
    format!("{}{}{}", property, token, value)
}

fn bracket(mut members: Vec<String>, separator: char) -> String {
    if members.len() == 1 {
        return members.pop().unwrap_or_default();
    }
    format!("({})", members.join(&separator.to_string()))
}
