//! Harmonized System code tree and description search.
//!
//! Codes form a forest: chapters (2 digits) at the roots, headings (4) and
//! subheadings (6) below them, linked through each record's `parent` field.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsTradeError;
use crate::reference::{self, ReferenceDataError};

/// One HS code record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsCode {
    pub section: String,
    pub hscode: String,
    pub description: String,
    /// Code of the enclosing level. Empty for chapters.
    #[serde(default)]
    pub parent: String,
    pub level: u32,
}

/// A code together with the codes directly below it, in load order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTreeNode {
    pub code: HsCode,
    pub children: Vec<String>,
}

/// A code and its description, as returned by searches and child listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMatch {
    pub code: String,
    pub description: String,
}

impl From<&HsCode> for CodeMatch {
    fn from(code: &HsCode) -> Self {
        Self {
            code: code.hscode.clone(),
            description: code.description.clone(),
        }
    }
}

/// An HS code argument: a raw code string or an already-resolved record.
#[derive(Clone, Copy, Debug)]
pub enum CodeRef<'a> {
    Id(&'a str),
    Resolved(&'a HsCode),
}

impl CodeRef<'_> {
    fn key(&self) -> &str {
        match self {
            CodeRef::Id(code) => code.trim(),
            CodeRef::Resolved(code) => &code.hscode,
        }
    }
}

impl<'a> From<&'a str> for CodeRef<'a> {
    fn from(value: &'a str) -> Self {
        CodeRef::Id(value)
    }
}

impl<'a> From<&'a String> for CodeRef<'a> {
    fn from(value: &'a String) -> Self {
        CodeRef::Id(value.as_str())
    }
}

impl<'a> From<&'a HsCode> for CodeRef<'a> {
    fn from(value: &'a HsCode) -> Self {
        CodeRef::Resolved(value)
    }
}

/// How multiple search terms combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every term must appear in the description.
    #[default]
    And,
    /// At least one term must appear.
    Or,
}

impl SearchMode {
    fn matches(&self, description: &str, terms: &[String]) -> bool {
        match self {
            SearchMode::And => terms.iter().all(|t| description.contains(t.as_str())),
            SearchMode::Or => terms.iter().any(|t| description.contains(t.as_str())),
        }
    }
}

impl FromStr for SearchMode {
    type Err = UsTradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" | "all" => Ok(SearchMode::And),
            "or" | "any" => Ok(SearchMode::Or),
            _ => Err(UsTradeError::InvalidInput(format!(
                "Invalid search mode: '{}' (expected AND or OR)",
                s
            ))),
        }
    }
}

/// HS codes indexed by code, with parent/child links.
#[derive(Debug, Clone)]
pub struct CodeTree {
    nodes: Vec<CodeTreeNode>,
    index: HashMap<String, usize>,
}

impl CodeTree {
    /// Builds the forest from flat records.
    ///
    /// Children are listed in input order. Every nonempty parent must name a
    /// code in the set (it may appear later in the input), and every code must
    /// hang off a root, which rules out parent cycles.
    pub fn build(codes: Vec<HsCode>) -> Result<Self, ReferenceDataError> {
        let mut index = HashMap::with_capacity(codes.len());
        for (i, code) in codes.iter().enumerate() {
            if index.insert(code.hscode.clone(), i).is_some() {
                return Err(ReferenceDataError::DuplicateCode(code.hscode.clone()));
            }
        }

        let mut nodes: Vec<CodeTreeNode> = codes
            .into_iter()
            .map(|code| CodeTreeNode {
                code,
                children: Vec::new(),
            })
            .collect();

        for i in 0..nodes.len() {
            if nodes[i].code.parent.is_empty() {
                continue;
            }
            let parent = match index.get(&nodes[i].code.parent) {
                Some(&p) => p,
                None => {
                    return Err(ReferenceDataError::UnknownParent {
                        code: nodes[i].code.hscode.clone(),
                        parent: nodes[i].code.parent.clone(),
                    })
                }
            };
            let child = nodes[i].code.hscode.clone();
            nodes[parent].children.push(child);
        }

        let mut reached = vec![false; nodes.len()];
        let mut stack: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.code.parent.is_empty())
            .map(|(i, _)| i)
            .collect();
        while let Some(i) = stack.pop() {
            if reached[i] {
                continue;
            }
            reached[i] = true;
            stack.extend(nodes[i].children.iter().map(|child| index[child]));
        }
        if let Some(i) = reached.iter().position(|r| !r) {
            return Err(ReferenceDataError::Cycle {
                code: nodes[i].code.hscode.clone(),
            });
        }

        tracing::debug!("Built HS code tree with {} codes", nodes.len());
        Ok(Self { nodes, index })
    }

    /// Builds the tree from the embedded HS table.
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::build(reference::load_hs_codes()?)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in load order.
    pub fn iter(&self) -> impl Iterator<Item = &CodeTreeNode> {
        self.nodes.iter()
    }

    /// Codes without a parent, in load order.
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.code.parent.is_empty())
            .map(|node| node.code.hscode.as_str())
            .collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn node(&self, code: CodeRef<'_>) -> Result<&CodeTreeNode, UsTradeError> {
        let key = code.key();
        match self.index.get(key) {
            Some(&i) => Ok(&self.nodes[i]),
            None => Err(self.not_found(key)),
        }
    }

    pub fn get(&self, code: CodeRef<'_>) -> Result<&HsCode, UsTradeError> {
        Ok(&self.node(code)?.code)
    }

    /// The commodity value to send to the API for `code`.
    ///
    /// Codes in the tree pass as-is. Deeper statistical codes (6, 8 or 10
    /// digits) that the table does not list pass too, as long as their
    /// 4-digit heading is known.
    pub fn query_code(&self, code: CodeRef<'_>) -> Result<String, UsTradeError> {
        let key = code.key();
        if self.index.contains_key(key) {
            return Ok(key.to_string());
        }
        let deep = matches!(key.len(), 6 | 8 | 10) && key.bytes().all(|b| b.is_ascii_digit());
        if deep && self.index.contains_key(&key[..4]) {
            tracing::debug!("Passing {} through under heading {}", key, &key[..4]);
            return Ok(key.to_string());
        }
        Err(self.not_found(key))
    }

    pub fn description_of(&self, code: CodeRef<'_>) -> Result<&str, UsTradeError> {
        Ok(&self.node(code)?.code.description)
    }

    /// Direct children only.
    pub fn children_of(&self, code: CodeRef<'_>) -> Result<&[String], UsTradeError> {
        Ok(&self.node(code)?.children)
    }

    pub fn children_with_descriptions(
        &self,
        code: CodeRef<'_>,
    ) -> Result<Vec<CodeMatch>, UsTradeError> {
        let node = self.node(code)?;
        Ok(node
            .children
            .iter()
            .map(|child| CodeMatch::from(&self.nodes[self.index[child]].code))
            .collect())
    }

    /// Searches descriptions for `terms`, case-insensitively.
    ///
    /// With a `scope`, only strict descendants of that code are candidates.
    /// Results keep load order.
    pub fn search<S: AsRef<str>>(
        &self,
        terms: &[S],
        mode: SearchMode,
        scope: Option<CodeRef<'_>>,
    ) -> Result<Vec<CodeMatch>, UsTradeError> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Err(UsTradeError::InvalidInput(
                "search needs at least one non-blank term".to_string(),
            ));
        }

        let in_scope = match scope {
            Some(scope) => Some(self.descendants(scope)?),
            None => None,
        };

        Ok(self
            .nodes
            .iter()
            .filter(|node| {
                in_scope
                    .as_ref()
                    .map_or(true, |set| set.contains(node.code.hscode.as_str()))
            })
            .filter(|node| mode.matches(&node.code.description.to_lowercase(), &terms))
            .map(|node| CodeMatch::from(&node.code))
            .collect())
    }

    /// Every code below `root`, at any depth. `root` itself is excluded.
    pub fn descendants(&self, root: CodeRef<'_>) -> Result<HashSet<&str>, UsTradeError> {
        let node = self.node(root)?;
        let mut found = HashSet::new();
        let mut stack: Vec<&str> = node.children.iter().map(String::as_str).collect();
        while let Some(code) = stack.pop() {
            if found.insert(code) {
                let child = &self.nodes[self.index[code]];
                stack.extend(child.children.iter().map(String::as_str));
            }
        }
        Ok(found)
    }

    fn not_found(&self, key: &str) -> UsTradeError {
        UsTradeError::CodeNotFound {
            code: key.to_string(),
            suggestion: self.suggest(key),
        }
    }

    /// Corrections for common input slips: a dropped leading zero (`9` for
    /// `09`, `901` for `0901`) and dotted or spaced codes (`10.01`).
    fn suggest(&self, code: &str) -> Option<String> {
        let compact: String = code
            .chars()
            .filter(|c| *c != '.' && !c.is_whitespace())
            .collect();
        if compact.is_empty() {
            return None;
        }
        if compact != code && self.index.contains_key(&compact) {
            return Some(compact);
        }
        if compact.len() % 2 == 1 {
            let padded = format!("0{}", compact);
            if self.index.contains_key(&padded) {
                return Some(padded);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(hscode: &str, description: &str, parent: &str) -> HsCode {
        HsCode {
            section: "II".to_string(),
            hscode: hscode.to_string(),
            description: description.to_string(),
            parent: parent.to_string(),
            level: hscode.len() as u32,
        }
    }

    fn cereals() -> CodeTree {
        CodeTree::build(vec![
            code("09", "Coffee, tea, mate and spices", ""),
            code("10", "Cereals", ""),
            code("1001", "Wheat and meslin", "10"),
            code("100111", "Wheat and meslin; durum wheat, seed", "1001"),
            code("100199", "Wheat and meslin; other than durum wheat, other than seed", "1001"),
            code("1002", "Rye", "10"),
            code("100210", "Rye; seed", "1002"),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_tree_simple() {
        let tree = CodeTree::build(vec![
            code("10", "Cereals", ""),
            code("1001", "Wheat", "10"),
            code("100190", "Other wheat", "1001"),
        ])
        .unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children_of("10".into()).unwrap(), &["1001".to_string()]);
        assert_eq!(tree.children_of("1001".into()).unwrap(), &["100190".to_string()]);
        assert!(tree.children_of("100190".into()).unwrap().is_empty());
        assert_eq!(tree.roots(), vec!["10"]);
    }

    #[test]
    fn test_children_keep_input_order() {
        let tree = CodeTree::build(vec![
            code("10", "Cereals", ""),
            code("1008", "Buckwheat", "10"),
            code("1001", "Wheat", "10"),
            code("1005", "Maize", "10"),
        ])
        .unwrap();
        assert_eq!(
            tree.children_of("10".into()).unwrap(),
            &["1008".to_string(), "1001".to_string(), "1005".to_string()]
        );
    }

    #[test]
    fn test_forward_parent_reference_is_linked() {
        let tree = CodeTree::build(vec![
            code("1001", "Wheat", "10"),
            code("10", "Cereals", ""),
        ])
        .unwrap();
        assert_eq!(tree.children_of("10".into()).unwrap(), &["1001".to_string()]);
        assert_eq!(tree.roots(), vec!["10"]);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let result = CodeTree::build(vec![code("1001", "Wheat", "10")]);
        assert!(matches!(
            result,
            Err(ReferenceDataError::UnknownParent { ref code, ref parent })
                if code == "1001" && parent == "10"
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let result = CodeTree::build(vec![
            code("01", "Animals", ""),
            code("1001", "Wheat", "100111"),
            code("100111", "Durum", "1001"),
        ]);
        assert!(matches!(result, Err(ReferenceDataError::Cycle { .. })));

        let result = CodeTree::build(vec![code("10", "Cereals", "10")]);
        assert!(matches!(result, Err(ReferenceDataError::Cycle { .. })));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let result = CodeTree::build(vec![code("10", "Cereals", ""), code("10", "Again", "")]);
        assert!(matches!(result, Err(ReferenceDataError::DuplicateCode(ref c)) if c == "10"));
    }

    #[test]
    fn test_description_and_suggestions() {
        let tree = cereals();
        assert_eq!(tree.description_of("1001".into()).unwrap(), "Wheat and meslin");
        assert_eq!(tree.description_of(" 1002 ".into()).unwrap(), "Rye");

        let err = tree.description_of("9".into()).unwrap_err();
        assert!(err.to_string().contains("Did you mean '09'?"), "{}", err);

        match tree.description_of("10.01".into()) {
            Err(UsTradeError::CodeNotFound { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("1001"))
            }
            other => panic!("expected CodeNotFound, got {:?}", other),
        }

        match tree.description_of("8".into()) {
            Err(UsTradeError::CodeNotFound { code, suggestion }) => {
                assert_eq!(code, "8");
                assert!(suggestion.is_none());
            }
            other => panic!("expected CodeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_query_code_passes_deep_codes_under_known_headings() {
        let tree = cereals();
        assert_eq!(tree.query_code("1001".into()).unwrap(), "1001");
        assert_eq!(tree.query_code(" 100111 ".into()).unwrap(), "100111");
        // not listed, but under heading 1001
        assert_eq!(tree.query_code("100119".into()).unwrap(), "100119");
        assert_eq!(tree.query_code("1001190010".into()).unwrap(), "1001190010");
        assert_eq!(tree.query_code("10021000".into()).unwrap(), "10021000");
    }

    #[test]
    fn test_query_code_rejects_unknown_headings_and_odd_shapes() {
        let tree = cereals();
        for bad in ["1003", "100310", "1001x1", "10011", "100111000", "12345678901"] {
            assert!(
                matches!(tree.query_code(bad.into()), Err(UsTradeError::CodeNotFound { .. })),
                "{} should be rejected",
                bad
            );
        }
        match tree.query_code("9".into()) {
            Err(UsTradeError::CodeNotFound { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("09"))
            }
            other => panic!("expected CodeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolved_code_accepted() {
        let tree = cereals();
        let wheat = tree.get("1001".into()).unwrap().clone();
        assert_eq!(tree.children_of((&wheat).into()).unwrap().len(), 2);
        let named = tree.children_with_descriptions((&wheat).into()).unwrap();
        assert_eq!(named[0].code, "100111");
        assert!(named[0].description.contains("durum"));
    }

    #[test]
    fn test_search_and_or() {
        let tree = cereals();
        let and: Vec<String> = tree
            .search(&["DURUM", "seed"], SearchMode::And, None)
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(and, vec!["100111", "100199"]);

        let or: Vec<String> = tree
            .search(&["rye", "coffee"], SearchMode::Or, None)
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(or, vec!["09", "1002", "100210"]);
    }

    #[test]
    fn test_search_scope_excludes_root_and_outsiders() {
        let tree = cereals();
        let hits: Vec<String> = tree
            .search(&["wheat"], SearchMode::And, Some("1001".into()))
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(hits, vec!["100111", "100199"]);

        let hits: Vec<String> = tree
            .search(&["seed"], SearchMode::And, Some("10".into()))
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(hits, vec!["100111", "100199", "100210"]);
    }

    #[test]
    fn test_search_rejects_blank_terms_and_unknown_scope() {
        let tree = cereals();
        let empty: [&str; 0] = [];
        assert!(matches!(
            tree.search(&empty, SearchMode::Or, None),
            Err(UsTradeError::InvalidInput(_))
        ));
        assert!(matches!(
            tree.search(&["  "], SearchMode::And, None),
            Err(UsTradeError::InvalidInput(_))
        ));
        assert!(matches!(
            tree.search(&["wheat"], SearchMode::And, Some("99".into())),
            Err(UsTradeError::CodeNotFound { .. })
        ));
    }

    #[test]
    fn test_search_mode_from_str() {
        assert_eq!("AND".parse::<SearchMode>().unwrap(), SearchMode::And);
        assert_eq!("or".parse::<SearchMode>().unwrap(), SearchMode::Or);
        assert_eq!("any".parse::<SearchMode>().unwrap(), SearchMode::Or);
        assert!("xor".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_bundled_children_listed_once() {
        let tree = CodeTree::bundled().unwrap();
        for node in tree.iter() {
            if node.code.parent.is_empty() {
                continue;
            }
            let siblings = tree.children_of(node.code.parent.as_str().into()).unwrap();
            let count = siblings.iter().filter(|c| **c == node.code.hscode).count();
            assert_eq!(count, 1, "{} listed {} times", node.code.hscode, count);
        }
    }
}
