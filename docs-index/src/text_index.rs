//! Search and replace over a [`FlatDocument`], tying the extractor, search
//! engine, mapper and planner together.

use serde::Serialize;

use crate::error::Result;
use crate::extract::{DocRange, FlatDocument, FlatRange};
use crate::mapper::{flat_range_for, map_to_doc_range};
use crate::replace::{plan_replacements, ReplacePlan};
use crate::search::{find_all, find_all_in};
use crate::units::floor_char_boundary;

/// A found occurrence. `doc` is `None` when the text spans non-text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub flat: FlatRange,
    pub doc: Option<DocRange>,
}

/// Options for [`FlatDocument::find`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    pub case_sensitive: bool,
    /// Only report matches lying entirely inside this document range
    pub within: Option<DocRange>,
    pub max_results: Option<usize>,
}

impl FlatDocument {
    /// All matches of `query`, with their document ranges resolved.
    pub fn find(&self, query: &str, options: FindOptions) -> Result<Vec<Match>> {
        let scan = match options.within {
            Some(doc) => match flat_range_for(self.runs(), doc) {
                // Bounds inside a surrogate pair snap down to the pair start
                Some(scan) => Some(FlatRange::new(
                    floor_char_boundary(self.text(), scan.start),
                    floor_char_boundary(self.text(), scan.end),
                )),
                // No text inside the range; still reject an empty query
                None => Some(FlatRange::new(0, 0)),
            },
            None => None,
        };
        let matches = match scan {
            Some(scan) => find_all_in(self.text(), query, options.case_sensitive, scan)?,
            None => find_all(self.text(), query, options.case_sensitive)?,
        };

        let mut found = Vec::new();
        for flat in matches.take(options.max_results.unwrap_or(usize::MAX)) {
            let doc = map_to_doc_range(self.runs(), flat).ok();
            found.push(Match { flat, doc });
        }
        Ok(found)
    }

    /// Plan replacing `query` with `replacement`
    pub fn plan_replace(
        &self,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
        replace_all: bool,
    ) -> Result<ReplacePlan> {
        let matches: Vec<FlatRange> = find_all(self.text(), query, case_sensitive)?.collect();
        plan_replacements(self.runs(), &matches, replacement, replace_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ParagraphElement, StructuralElement};
    use crate::error::IndexError;
    use crate::extract::extract;

    fn doc() -> FlatDocument {
        extract(&[StructuralElement::paragraph(vec![
            ParagraphElement::text(1, "Cat and ca"),
            ParagraphElement::object(11, 1),
            ParagraphElement::text(12, "t and cat\n"),
        ])])
    }

    #[test]
    fn test_find_reports_unmappable_matches() {
        let found = doc().find("cat", FindOptions::default()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].doc, None);
        assert_eq!(found[0].flat, FlatRange::new(8, 11));
        assert_eq!(found[1].doc, Some(DocRange::new(18, 21)));

        let found = doc()
            .find("cat", FindOptions { case_sensitive: false, ..Default::default() })
            .unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].doc, Some(DocRange::new(1, 4)));
    }

    #[test]
    fn test_find_within_and_cap() {
        let options = FindOptions {
            case_sensitive: false,
            within: Some(DocRange::new(12, 30)),
            max_results: None,
        };
        let found = doc().find("cat", options).unwrap();
        assert_eq!(found.len(), 1);

        let options = FindOptions { max_results: Some(1), ..options };
        assert_eq!(doc().find("and", options).unwrap().len(), 1);

        let options = FindOptions { within: Some(DocRange::new(40, 50)), ..options };
        assert!(doc().find("cat", options).unwrap().is_empty());
        assert_eq!(doc().find("", options), Err(IndexError::InvalidQuery));
    }

    #[test]
    fn test_find_within_snaps_bounds_inside_surrogate_pairs() {
        let doc = extract(&[StructuralElement::paragraph(vec![ParagraphElement::text(1, "😀cat😀\n")])]);
        let options = FindOptions { within: Some(DocRange::new(2, 7)), ..Default::default() };
        let found = doc.find("cat", options).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].doc, Some(DocRange::new(3, 6)));

        let options = FindOptions { within: Some(DocRange::new(2, 4)), ..Default::default() };
        assert!(doc.find("cat", options).unwrap().is_empty());
    }

    #[test]
    fn test_plan_replace_accounts_for_skips() {
        let plan = doc().plan_replace("cat", "dog", true, true).unwrap();
        assert_eq!(plan.applied, 1);
        assert_eq!(plan.skipped.len(), 1);
    }
}
