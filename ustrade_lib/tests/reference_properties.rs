use std::collections::HashSet;

use ustrade_lib::{CodeTree, CountryField, CountryIndex, SearchMode, UsTradeError};

#[test]
fn every_country_resolves_to_its_code_from_any_identifier() {
    let index = CountryIndex::bundled().unwrap();
    assert!(index.len() > 50);
    for country in index.iter() {
        for input in [
            country.code.clone(),
            country.iso2.clone(),
            country.iso2.to_lowercase(),
            country.name.clone(),
            country.name.to_uppercase(),
        ] {
            assert_eq!(
                index.resolve((&input).into(), CountryField::Code).unwrap(),
                country.code,
                "{} should resolve to {}",
                input,
                country.code
            );
        }
    }
}

#[test]
fn every_code_is_listed_once_under_its_parent() {
    let tree = CodeTree::bundled().unwrap();
    for node in tree.iter() {
        let code = &node.code;
        if code.parent.is_empty() {
            continue;
        }
        let siblings = tree.children_of(code.parent.as_str().into()).unwrap();
        let hits = siblings.iter().filter(|c| **c == code.hscode).count();
        assert_eq!(hits, 1, "{} under {}", code.hscode, code.parent);
    }
}

#[test]
fn every_code_is_reachable_from_a_chapter() {
    let tree = CodeTree::bundled().unwrap();
    let mut reached = HashSet::new();
    for root in tree.roots() {
        reached.insert(root.to_string());
        for code in tree.descendants(root.into()).unwrap() {
            reached.insert(code.to_string());
        }
    }
    assert_eq!(reached.len(), tree.len());
}

#[test]
fn wheat_children() {
    let tree = CodeTree::bundled().unwrap();
    let children: HashSet<&str> = tree
        .children_of("1001".into())
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    let expected: HashSet<&str> = ["100111", "100119", "100191", "100199"].into_iter().collect();
    assert_eq!(children, expected);
}

#[test]
fn scoped_and_search_matches_every_term() {
    let tree = CodeTree::bundled().unwrap();
    let results = tree
        .search(&["durum", "wheat"], SearchMode::And, Some("1001".into()))
        .unwrap();
    assert!(results.iter().any(|m| m.code == "100111"));
    for m in &results {
        let description = m.description.to_lowercase();
        assert!(description.contains("durum") && description.contains("wheat"));
        assert!(m.code.starts_with("1001") && m.code != "1001");
    }
}

#[test]
fn single_digit_chapter_suggests_padded_code() {
    let tree = CodeTree::bundled().unwrap();
    let err = tree.description_of("9".into()).unwrap_err();
    assert!(matches!(err, UsTradeError::CodeNotFound { .. }));
    assert!(err.to_string().contains("'09'"));
}

#[test]
fn bundled_table_lists_every_heading_under_its_chapter() {
    let tree = CodeTree::bundled().unwrap();
    for (heading, chapter) in [("0101", "01"), ("3004", "30"), ("8517", "85"), ("8542", "85")] {
        let code = tree.get(heading.into()).unwrap();
        assert_eq!(code.parent, chapter);
        assert_eq!(code.level, 4);
    }
    assert_eq!(tree.get("010121".into()).unwrap().parent, "0101");
    assert!(tree
        .children_of("8542".into())
        .unwrap()
        .contains(&"854231".to_string()));
    let headings = tree.iter().filter(|n| n.code.level == 4).count();
    assert!(headings > 1200, "only {} headings", headings);
}

#[test]
fn bundled_countries_cover_smaller_partners() {
    let index = CountryIndex::bundled().unwrap();
    assert!(index.len() > 200);
    for (input, code) in [("Iceland", "4000"), ("QA", "5180"), ("Korea, North", "5790"), ("LS", "7990")] {
        assert_eq!(index.resolve(input.into(), CountryField::Code).unwrap(), code);
    }
}
