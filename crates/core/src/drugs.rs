//! Drug list parsing.

/// Split raw comma-separated input into drug identifiers.
///
/// Tokens are trimmed, empty tokens are dropped, and repeated tokens keep only
/// their first occurrence. The result is in input order.
pub fn parse_drug_list(input: &str) -> Vec<String> {
    let mut drugs: Vec<String> = Vec::new();

    for token in input.split(',') {
        let name = token.trim();
        if name.is_empty() || drugs.iter().any(|d| d == name) {
            continue;
        }
        drugs.push(name.to_string());
    }

    drugs
}
