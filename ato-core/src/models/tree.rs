use crate::ports::{ReductionError, ScenarioReducer};

/// One node of a scenario tree.
///
/// Nodes are stored in an arena owned by the tree and addressed by integer
/// id. The parent link is a back-reference for path reconstruction, never an
/// ownership reference; children are not stored explicitly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioNode {
    /// Arena index of this node
    pub id: usize,
    /// The stage (decision epoch) this node belongs to; the root is stage 0
    pub stage: usize,
    /// The observation realized at this node
    pub observation: Vec<f64>,
    /// Unconditional probability of reaching this node: the product of the
    /// conditional probabilities along the path from the root
    pub probability: f64,
    /// Arena index of the parent node; `None` only for the root
    pub parent: Option<usize>,
}

/// A branching tree of probability-weighted observations representing the
/// unfolding of uncertainty over a multi-period horizon.
///
/// The tree is built once, top-down, one stage at a time: a scenario
/// reduction is performed per stage and its representatives are attached as
/// children of every node on the current frontier. Downstream multi-stage
/// model builders create one set of recourse variables per node and use the
/// parent links to tie ancestor decisions together.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioTree {
    dim_observations: usize,
    branching_factors: Vec<usize>,
    nodes: Vec<ScenarioNode>,
    leaves: Vec<usize>,
}

impl ScenarioTree {
    /// Builds a tree from one scenario reducer per stage.
    ///
    /// The root holds `initial_observation` with probability 1. For stage
    /// `i`, `reducers[i].reduce(branching_factors[i])` is called once and
    /// the resulting representatives are shared by every frontier node of
    /// that stage, each child weighted by its parent's probability times the
    /// conditional reduced probability.
    ///
    /// # Errors
    ///
    /// Fails if the factor and reducer lists differ in length, any factor is
    /// zero, an observation has the wrong dimension, or a reduction fails.
    pub fn build(
        branching_factors: Vec<usize>,
        dim_observations: usize,
        initial_observation: Vec<f64>,
        reducers: &[&dyn ScenarioReducer],
    ) -> Result<Self, TreeError> {
        if branching_factors.len() != reducers.len() {
            return Err(TreeError::StageMismatch {
                factors: branching_factors.len(),
                reducers: reducers.len(),
            });
        }
        if let Some(stage) = branching_factors.iter().position(|&b| b == 0) {
            return Err(TreeError::ZeroBranching { stage });
        }
        if initial_observation.len() != dim_observations {
            return Err(TreeError::DimensionMismatch {
                expected: dim_observations,
                found: initial_observation.len(),
            });
        }

        let mut nodes = vec![ScenarioNode {
            id: 0,
            stage: 0,
            observation: initial_observation,
            probability: 1.0,
            parent: None,
        }];
        let mut frontier = vec![0];

        for (stage, (&factor, reducer)) in
            branching_factors.iter().zip(reducers.iter()).enumerate()
        {
            let reduced = reducer.reduce(factor)?;
            if reduced.dim() != dim_observations {
                return Err(TreeError::DimensionMismatch {
                    expected: dim_observations,
                    found: reduced.dim(),
                });
            }
            if reduced.n_scenarios() != factor {
                return Err(TreeError::BranchCount {
                    stage,
                    expected: factor,
                    found: reduced.n_scenarios(),
                });
            }

            let mut next = Vec::with_capacity(frontier.len() * factor);
            for &parent in frontier.iter() {
                for j in 0..factor {
                    let id = nodes.len();
                    nodes.push(ScenarioNode {
                        id,
                        stage: stage + 1,
                        observation: reduced.column(j).to_vec(),
                        probability: nodes[parent].probability * reduced.probabilities()[j],
                        parent: Some(parent),
                    });
                    next.push(id);
                }
            }
            frontier = next;
        }

        tracing::debug!(
            stages = branching_factors.len(),
            n_nodes = nodes.len(),
            n_leaves = frontier.len(),
            "scenario tree built"
        );

        Ok(Self {
            dim_observations,
            branching_factors,
            nodes,
            leaves: frontier,
        })
    }

    /// The number of components of each observation
    pub fn dim_observations(&self) -> usize {
        self.dim_observations
    }

    /// The number of stages below the root
    pub fn depth(&self) -> usize {
        self.branching_factors.len()
    }

    /// The per-stage branching factors the tree was built with
    pub fn branching_factors(&self) -> &[usize] {
        &self.branching_factors
    }

    /// Total number of nodes, root included
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The number of distinct root-to-leaf scenarios: the product of the
    /// branching factors. Informational; equals the leaf count.
    pub fn n_scenarios(&self) -> usize {
        self.branching_factors.iter().product()
    }

    /// All nodes in arena order (ids are contiguous from 0)
    pub fn nodes(&self) -> &[ScenarioNode] {
        &self.nodes
    }

    /// The node with the given id, if it exists
    pub fn node(&self, id: usize) -> Option<&ScenarioNode> {
        self.nodes.get(id)
    }

    /// Ids of the final-stage nodes, in construction order
    pub fn leaves(&self) -> &[usize] {
        &self.leaves
    }

    /// The observations along the path from the root to `id`, root first.
    ///
    /// A node at stage `t` yields `t + 1` rows; the root alone yields a
    /// single row. Returns `None` for an unknown id.
    pub fn history(&self, id: usize) -> Option<Vec<&[f64]>> {
        let mut node = self.nodes.get(id)?;
        let mut rows = vec![node.observation.as_slice()];
        while let Some(parent) = node.parent {
            node = &self.nodes[parent];
            rows.push(node.observation.as_slice());
        }
        rows.reverse();
        Some(rows)
    }

    /// Overwrites the observations along the single chain of the tree with
    /// the provided stage-by-stage columns.
    ///
    /// This is the perfect-information variant: the tree must have been
    /// built with every branching factor equal to 1, so that node ids
    /// `0..depth` form the chain. One column per stage is consumed in order;
    /// extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Fails if any branching factor exceeds 1, fewer than `depth` columns
    /// are supplied, or a column has the wrong dimension.
    pub fn set_scenario_chain(&mut self, columns: &[Vec<f64>]) -> Result<(), TreeError> {
        if self.branching_factors.iter().any(|&b| b != 1) {
            return Err(TreeError::NotAChain);
        }
        if columns.len() < self.depth() {
            return Err(TreeError::ChainTooShort {
                expected: self.depth(),
                found: columns.len(),
            });
        }
        for column in columns.iter().take(self.depth()) {
            if column.len() != self.dim_observations {
                return Err(TreeError::DimensionMismatch {
                    expected: self.dim_observations,
                    found: column.len(),
                });
            }
        }
        let depth = self.depth();
        for (node, column) in self.nodes.iter_mut().take(depth).zip(columns.iter()) {
            node.observation.clone_from(column);
        }
        Ok(())
    }
}

/// The various ways in which building or editing a scenario tree can fail
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Error when the branching factor and reducer lists differ in length
    #[error("{factors} branching factors but {reducers} reducers")]
    StageMismatch {
        /// Number of branching factors supplied
        factors: usize,
        /// Number of reducers supplied
        reducers: usize,
    },
    /// Error when a stage would branch into zero children
    #[error("branching factor at stage {stage} is zero")]
    ZeroBranching {
        /// The offending stage index
        stage: usize,
    },
    /// Error when an observation does not match the tree dimension
    #[error("observation dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The tree's observation dimension
        expected: usize,
        /// The dimension actually provided
        found: usize,
    },
    /// Error when a stage reduction returns the wrong number of representatives
    #[error("stage {stage} reduction returned {found} representatives, expected {expected}")]
    BranchCount {
        /// The offending stage index
        stage: usize,
        /// The requested branching factor
        expected: usize,
        /// The cardinality actually returned
        found: usize,
    },
    /// Error from the scenario reduction of some stage
    #[error("stage reduction failed: {0}")]
    Reduction(#[from] ReductionError),
    /// Error when a chain replacement is attempted on a branching tree
    #[error("scenario chain replacement requires unit branching factors")]
    NotAChain,
    /// Error when a chain replacement supplies too few columns
    #[error("scenario chain needs {expected} columns, found {found}")]
    ChainTooShort {
        /// The tree depth
        expected: usize,
        /// Number of columns supplied
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScenarioSet, ScenarioSetError};
    use approx::assert_abs_diff_eq;

    /// Hands out a fixed two-scenario reduction regardless of the request.
    struct Fixed;

    impl ScenarioReducer for Fixed {
        fn reduce(&self, n_scenarios: usize) -> Result<ScenarioSet, ReductionError> {
            assert_eq!(n_scenarios, 2);
            Ok(ScenarioSet::weighted(1, vec![10.0, 20.0], vec![0.25, 0.75])?)
        }
    }

    #[test]
    fn test_shape_and_probabilities() {
        let tree =
            ScenarioTree::build(vec![2, 2], 1, vec![0.0], &[&Fixed, &Fixed]).unwrap();
        assert_eq!(tree.n_nodes(), 1 + 2 + 4);
        assert_eq!(tree.n_scenarios(), 4);
        assert_eq!(tree.leaves().len(), 4);
        assert_eq!(tree.depth(), 2);

        let total: f64 = tree
            .leaves()
            .iter()
            .map(|&leaf| tree.node(leaf).unwrap().probability)
            .sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);

        // first child of the root carries 0.25, its own first child 0.0625
        assert_abs_diff_eq!(tree.node(1).unwrap().probability, 0.25);
        assert_abs_diff_eq!(tree.node(3).unwrap().probability, 0.0625);
    }

    #[test]
    fn test_history() {
        let tree =
            ScenarioTree::build(vec![2, 2], 1, vec![0.0], &[&Fixed, &Fixed]).unwrap();

        let root = tree.history(0).unwrap();
        assert_eq!(root, vec![&[0.0][..]]);

        let leaf = *tree.leaves().last().unwrap();
        let rows = tree.history(leaf).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], &[0.0][..]);
        assert_eq!(rows[2], tree.node(leaf).unwrap().observation.as_slice());

        assert!(tree.history(99).is_none());
    }

    #[test]
    fn test_stage_mismatch() {
        let err = ScenarioTree::build(vec![2], 1, vec![0.0], &[]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::StageMismatch {
                factors: 1,
                reducers: 0
            }
        ));
    }

    #[test]
    fn test_zero_branching() {
        let err = ScenarioTree::build(vec![2, 0], 1, vec![0.0], &[&Fixed, &Fixed]).unwrap_err();
        assert!(matches!(err, TreeError::ZeroBranching { stage: 1 }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = ScenarioTree::build(vec![2], 1, vec![0.0, 1.0], &[&Fixed]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    /// Collapses to a single observation, as the unit-branching stages of a
    /// perfect-information tree do.
    struct Single;

    impl ScenarioReducer for Single {
        fn reduce(&self, n_scenarios: usize) -> Result<ScenarioSet, ReductionError> {
            assert_eq!(n_scenarios, 1);
            Ok(ScenarioSet::weighted(1, vec![5.0], vec![1.0])?)
        }
    }

    #[test]
    fn test_scenario_chain_replacement() {
        let mut tree =
            ScenarioTree::build(vec![1, 1, 1], 1, vec![0.0], &[&Single, &Single, &Single])
                .unwrap();
        assert_eq!(tree.n_nodes(), 4);

        tree.set_scenario_chain(&[vec![7.0], vec![8.0], vec![9.0]])
            .unwrap();
        assert_eq!(tree.node(0).unwrap().observation, vec![7.0]);
        assert_eq!(tree.node(2).unwrap().observation, vec![9.0]);
        // the final node keeps its reduced observation
        assert_eq!(tree.node(3).unwrap().observation, vec![5.0]);

        assert!(matches!(
            tree.set_scenario_chain(&[vec![7.0]]),
            Err(TreeError::ChainTooShort {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_scenario_chain_requires_unit_branching() {
        let mut tree =
            ScenarioTree::build(vec![2], 1, vec![0.0], &[&Fixed]).unwrap();
        assert!(matches!(
            tree.set_scenario_chain(&[vec![1.0]]),
            Err(TreeError::NotAChain)
        ));
    }

    #[test]
    fn test_reduction_failure_propagates() {
        struct Broken;
        impl ScenarioReducer for Broken {
            fn reduce(&self, _n: usize) -> Result<ScenarioSet, ReductionError> {
                Err(ReductionError::Set(ScenarioSetError::NonFinite))
            }
        }
        let err = ScenarioTree::build(vec![2], 1, vec![0.0], &[&Broken]).unwrap_err();
        assert!(matches!(err, TreeError::Reduction(_)));
    }
}
