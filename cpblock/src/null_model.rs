//! Significance of a core-periphery fit against configuration-model graphs.
//!
//! The observed quality is compared with the qualities reached by the same
//! optimizer on `R` degree-preserving randomizations of the graph. A
//! Gaussian KDE over the null qualities gives `p = P(Q ≤ Q_obs)`.

use crate::error::CorePeripheryError;
use crate::graph::Graph;
use crate::kde::GaussianKde;
use crate::label_switch::{CorePeripheryFit, LabelSwitch, LabelSwitchOptions};
use crate::objective::ObjectiveKind;
use crate::randomize::{randomize_graph, trial_seed};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

/// Options for the null-model test.
#[derive(Debug, Clone)]
pub struct NullModelOptions {
    /// Number of randomized graphs `R`. Default: 100
    pub num_randomizations: usize,
    /// Significance level. Default: 0.05
    pub alpha: f64,
    /// Optimizer settings shared by the observed and null runs. Its seed
    /// also seeds the randomizations.
    pub optimizer: LabelSwitchOptions,
    /// Return the raw null qualities. Default: false
    pub keep_null_samples: bool,
    /// Show a progress bar over the trials. Default: false
    pub show_progress: bool,
}

impl Default for NullModelOptions {
    fn default() -> Self {
        NullModelOptions {
            num_randomizations: 100,
            alpha: 0.05,
            optimizer: LabelSwitchOptions::default(),
            keep_null_samples: false,
            show_progress: false,
        }
    }
}

/// Verdict of the null-model test.
#[derive(Debug, Clone, Serialize)]
pub struct SignificanceTest {
    /// Objective variant
    pub kind: ObjectiveKind,
    /// Quality of the observed graph
    pub observed: f64,
    /// `P_KDE(Q ≤ Q_obs)`
    pub p_value: f64,
    /// `p_value < alpha`
    pub significant: bool,
    /// Level the verdict was taken at
    pub alpha: f64,
    /// KDE bandwidth over the null qualities
    pub bandwidth: f64,
    /// Number of randomized graphs
    pub num_randomizations: usize,
    /// Null qualities in trial order, if requested
    pub null_samples: Option<Vec<f64>>,
}

/// Optimize `graph` and test the result.
///
/// Returns the observed fit along with the verdict.
pub fn test_significance(
    graph: &Graph,
    kind: ObjectiveKind,
    options: &NullModelOptions,
) -> anyhow::Result<(CorePeripheryFit, SignificanceTest)> {
    check_options(options)?;
    let base_seed = options
        .optimizer
        .seed
        .unwrap_or_else(|| rand::rng().random::<u64>());

    let optimizer = LabelSwitch::new(
        kind,
        LabelSwitchOptions {
            seed: Some(base_seed),
            ..options.optimizer.clone()
        },
    );
    let fit = optimizer.optimize(graph)?;
    let test = run_trials(graph, kind, fit.quality, base_seed, options)?;
    Ok((fit, test))
}

/// Test a fit that was already computed on `graph`.
pub fn test_fit_significance(
    graph: &Graph,
    fit: &CorePeripheryFit,
    options: &NullModelOptions,
) -> anyhow::Result<SignificanceTest> {
    check_options(options)?;
    if fit.partition.len() != graph.num_nodes() {
        return Err(CorePeripheryError::InvalidInput(format!(
            "fit covers {} nodes, graph has {}",
            fit.partition.len(),
            graph.num_nodes()
        ))
        .into());
    }
    let base_seed = options
        .optimizer
        .seed
        .unwrap_or_else(|| rand::rng().random::<u64>());
    run_trials(graph, fit.kind, fit.quality, base_seed, options)
}

fn check_options(options: &NullModelOptions) -> anyhow::Result<()> {
    if options.num_randomizations < 2 {
        return Err(CorePeripheryError::Validation(format!(
            "need at least 2 randomizations, got {}",
            options.num_randomizations
        ))
        .into());
    }
    if !(options.alpha > 0.0 && options.alpha < 1.0) {
        return Err(CorePeripheryError::InvalidInput(format!(
            "alpha must lie in (0, 1), got {}",
            options.alpha
        ))
        .into());
    }
    Ok(())
}

/// Quality reached on one randomized graph
fn null_quality(
    graph: &Graph,
    kind: ObjectiveKind,
    seed: u64,
    options: &LabelSwitchOptions,
) -> anyhow::Result<f64> {
    let null_graph = randomize_graph(graph, seed)?;
    let optimizer = LabelSwitch::new(
        kind,
        LabelSwitchOptions {
            seed: Some(trial_seed(seed, 0)),
            record_moves: false,
            ..options.clone()
        },
    );
    Ok(optimizer.optimize(&null_graph)?.quality)
}

fn run_trials(
    graph: &Graph,
    kind: ObjectiveKind,
    observed: f64,
    base_seed: u64,
    options: &NullModelOptions,
) -> anyhow::Result<SignificanceTest> {
    let ntrials = options.num_randomizations;

    let pb = if options.show_progress {
        ProgressBar::new(ntrials as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} randomizations")?,
    );

    let null_samples = (0..ntrials)
        .into_par_iter()
        .progress_with(pb.clone())
        .map(|t| null_quality(graph, kind, trial_seed(base_seed, t), &options.optimizer))
        .collect::<anyhow::Result<Vec<f64>>>()?;
    pb.finish_and_clear();

    let kde = GaussianKde::fit(&null_samples)?;
    let p_value = kde.cdf(observed);
    let significant = p_value < options.alpha;

    info!(
        "null model [{}]: Q_obs = {:.6}, p = {:.4e} over {} randomizations ({})",
        kind,
        observed,
        p_value,
        ntrials,
        if significant {
            "significant"
        } else {
            "not significant"
        }
    );

    Ok(SignificanceTest {
        kind,
        observed,
        p_value,
        significant,
        alpha: options.alpha,
        bandwidth: kde.bandwidth(),
        num_randomizations: ntrials,
        null_samples: options.keep_null_samples.then_some(null_samples),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::test_util::{complete_graph, random_graph};

    fn options(r: usize, seed: u64) -> NullModelOptions {
        NullModelOptions {
            num_randomizations: r,
            optimizer: LabelSwitchOptions {
                seed: Some(seed),
                ..Default::default()
            },
            keep_null_samples: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_too_few_randomizations() {
        let g = complete_graph(5).unwrap();
        for r in [0, 1] {
            let err = test_significance(&g, ObjectiveKind::Er, &options(r, 1)).unwrap_err();
            assert!(matches!(
                error_kind(&err),
                Some(CorePeripheryError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_bad_alpha() {
        let g = complete_graph(5).unwrap();
        let opts = NullModelOptions {
            alpha: 1.5,
            ..options(10, 1)
        };
        assert!(test_significance(&g, ObjectiveKind::Er, &opts).is_err());
    }

    #[test]
    fn test_zero_variance_null_fails() {
        // every null graph is edgeless, so every null Q is zero
        let g = Graph::from_edges(6, &[]).unwrap();
        let err = test_significance(&g, ObjectiveKind::Er, &options(5, 2)).unwrap_err();
        assert!(matches!(
            error_kind(&err),
            Some(CorePeripheryError::Validation(_))
        ));
    }

    #[test]
    fn test_reproducible_null_samples() -> anyhow::Result<()> {
        let g = random_graph(30, 0.15, 12)?;
        for kind in [ObjectiveKind::Er, ObjectiveKind::Config] {
            let (fit_a, a) = test_significance(&g, kind, &options(8, 77))?;
            let (fit_b, b) = test_significance(&g, kind, &options(8, 77))?;
            assert_eq!(fit_a.partition, fit_b.partition);
            assert_eq!(a.null_samples, b.null_samples);
            assert_eq!(a.p_value, b.p_value);
            assert!((0.0..=1.0).contains(&a.p_value));
            assert_eq!(a.null_samples.as_ref().map(|s| s.len()), Some(8));
        }
        Ok(())
    }

    #[test]
    fn test_fit_significance_matches_full_run() -> anyhow::Result<()> {
        let g = random_graph(25, 0.2, 4)?;
        let opts = options(6, 9);
        let (fit, full) = test_significance(&g, ObjectiveKind::Er, &opts)?;
        let again = test_fit_significance(&g, &fit, &opts)?;
        assert_eq!(full.null_samples, again.null_samples);
        assert_eq!(full.p_value, again.p_value);
        assert_eq!(full.significant, full.p_value < full.alpha);
        Ok(())
    }

    fn rescaled(graph: &Graph, scale: f64) -> anyhow::Result<Graph> {
        let edges: Vec<_> = graph
            .edges()
            .iter()
            .map(|&(i, j, w)| (i, j, scale * w))
            .collect();
        Graph::from_edges(graph.num_nodes(), &edges)
    }

    #[test]
    fn test_verdict_invariant_to_weight_units() -> anyhow::Result<()> {
        let base = random_graph(30, 0.2, 5)?;
        let edges: Vec<_> = base
            .edges()
            .iter()
            .enumerate()
            .map(|(e, &(i, j, _))| (i, j, 0.5 + (e % 3) as f64))
            .collect();
        let g = Graph::from_edges(30, &edges)?;
        let opts = options(20, 5);

        for kind in [ObjectiveKind::Er, ObjectiveKind::Config] {
            let (_, reference) = test_significance(&g, kind, &opts)?;
            for scale in [8.0, 0.125] {
                let (_, test) = test_significance(&rescaled(&g, scale)?, kind, &opts)?;
                assert!(
                    (test.p_value - reference.p_value).abs() < 1e-12,
                    "{} x{}: p = {} vs {}",
                    kind,
                    scale,
                    test.p_value,
                    reference.p_value
                );
                assert_eq!(test.significant, reference.significant);

                let expected = match kind {
                    ObjectiveKind::Er => scale * reference.observed,
                    ObjectiveKind::Config => reference.observed,
                };
                assert!((test.observed - expected).abs() < 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_samples_dropped_unless_requested() -> anyhow::Result<()> {
        let g = random_graph(20, 0.2, 6)?;
        let opts = NullModelOptions {
            keep_null_samples: false,
            ..options(4, 3)
        };
        let (_, test) = test_significance(&g, ObjectiveKind::Er, &opts)?;
        assert!(test.null_samples.is_none());
        Ok(())
    }
}
