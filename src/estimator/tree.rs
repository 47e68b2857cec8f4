//! Binary decision trees shared by the forest estimators

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

const fn default_one() -> usize {
    1
}

/// One node of a fitted tree
///
/// A node without a split feature is a leaf.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    /// Feature index the node splits on
    #[serde(default)]
    pub feature: Option<usize>,
    /// Samples with `x[feature] <= threshold` go left
    #[serde(default)]
    pub threshold: f64,
    /// Index of the left child
    #[serde(default)]
    pub left: Option<usize>,
    /// Index of the right child
    #[serde(default)]
    pub right: Option<usize>,
    /// Leaf output (regression trees)
    #[serde(default)]
    pub value: f64,
    /// Training samples that reached this node (isolation trees)
    #[serde(default = "default_one")]
    pub n_node_samples: usize,
    /// Where a `NaN` feature value is routed
    #[serde(default = "default_true")]
    pub missing_go_to_left: bool,
}

/// A fitted binary tree stored as a node list rooted at index 0
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    /// Nodes; children refer to positions in this list
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check the structure against the expected feature count
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(feature) = node.feature else {
                continue;
            };
            if feature >= n_features {
                return Err(format!(
                    "node {index} splits on feature {feature} but the model has {n_features} features"
                ));
            }
            for child in [node.left, node.right] {
                match child {
                    Some(c) if c > index && c < self.nodes.len() => {}
                    Some(c) => return Err(format!("node {index} has invalid child {c}")),
                    None => return Err(format!("split node {index} is missing a child")),
                }
            }
        }
        Ok(())
    }

    /// Leaf reached by `sample` and its depth
    ///
    /// Assumes a validated tree: children always point forward, so the walk
    /// terminates.
    #[must_use]
    pub fn leaf(&self, sample: &[f64]) -> (&TreeNode, usize) {
        let mut index = 0;
        let mut depth = 0;
        loop {
            let node = &self.nodes[index];
            let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right) else {
                return (node, depth);
            };
            let x = sample[feature];
            let go_left = if x.is_nan() {
                node.missing_go_to_left
            } else {
                x <= node.threshold
            };
            index = if go_left { left } else { right };
            depth += 1;
        }
    }
}
