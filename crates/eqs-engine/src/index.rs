//! Inverted word → keys index over a catalog.

use std::collections::{BTreeSet, HashMap};

use eqs_protocol::{Catalog, InvertedIndex};

use crate::tokenizer::Tokenizer;

/// Leading `ReferenceText` tokens indexed per entry.
pub const REFERENCE_TOKEN_LIMIT: usize = 50;
/// Leading `Text` tokens indexed per entry.
pub const TEXT_TOKEN_LIMIT: usize = 30;

/// Populate `catalog.inverted_index`.
///
/// Idempotent: a catalog that already carries an index is left untouched and
/// `false` is returned. Every key-path token is indexed; free text is capped
/// at [`REFERENCE_TOKEN_LIMIT`] and [`TEXT_TOKEN_LIMIT`] tokens.
pub fn build_inverted_index(catalog: &mut Catalog, tokenizer: &Tokenizer) -> bool {
    if catalog.is_indexed() {
        return false;
    }

    let mut postings: HashMap<String, BTreeSet<String>> = HashMap::new();

    for (key, entry) in &catalog.table {
        let words = tokenizer
            .tokenize(key)
            .into_iter()
            .chain(
                tokenizer
                    .tokenize(&entry.reference_text)
                    .into_iter()
                    .take(REFERENCE_TOKEN_LIMIT),
            )
            .chain(tokenizer.tokenize(&entry.text).into_iter().take(TEXT_TOKEN_LIMIT));

        for word in words {
            postings.entry(word).or_default().insert(key.clone());
        }
    }

    let index: InvertedIndex = postings
        .into_iter()
        .map(|(word, keys)| (word, keys.into_iter().collect()))
        .collect();

    tracing::debug!(
        entries = catalog.len(),
        words = index.len(),
        "inverted index built"
    );

    catalog.inverted_index = index;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqs_protocol::CatalogEntry;

    fn catalog() -> Catalog {
        [
            (
                ".namespace.node.srl.interface".to_string(),
                CatalogEntry::with_info("network interfaces", "Interface state", &["name"]),
            ),
            (
                ".namespace.node.srl.interface.statistics".to_string(),
                CatalogEntry::with_info("interface counters", "Counters", &["in-octets"]),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn indexes_key_tokens_for_every_entry() {
        let mut c = catalog();
        assert!(build_inverted_index(&mut c, &Tokenizer::new()));
        assert_eq!(
            c.postings("interface"),
            &[
                ".namespace.node.srl.interface".to_string(),
                ".namespace.node.srl.interface.statistics".to_string(),
            ]
        );
        assert_eq!(c.postings("statistics").len(), 1);
        assert_eq!(c.postings("counters").len(), 1);
    }

    #[test]
    fn postings_are_deduplicated() {
        let mut c = catalog();
        build_inverted_index(&mut c, &Tokenizer::new());
        // "interface" appears in the key, the reference text and the description
        for keys in c.inverted_index.values() {
            let unique: BTreeSet<&String> = keys.iter().collect();
            assert_eq!(unique.len(), keys.len());
        }
    }

    #[test]
    fn second_build_is_a_no_op() {
        let mut c = catalog();
        let t = Tokenizer::new();
        assert!(build_inverted_index(&mut c, &t));
        c.inverted_index.insert("sentinel".into(), vec!["x".into()]);
        assert!(!build_inverted_index(&mut c, &t));
        assert_eq!(c.postings("sentinel"), &["x".to_string()]);
    }

    #[test]
    fn reference_text_is_capped() {
        let long_text: String = (0..200).map(|i| format!("word{i} ")).collect();
        let mut c: Catalog = [(".a.b".to_string(), CatalogEntry::new(long_text, ""))]
            .into_iter()
            .collect();
        build_inverted_index(&mut c, &Tokenizer::new());
        assert_eq!(c.postings("word0").len(), 1);
        assert_eq!(c.postings("word49").len(), 1);
        assert!(c.postings("word50").is_empty());
    }
}
