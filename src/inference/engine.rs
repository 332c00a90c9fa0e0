//! Inference Engine
//!
//! Forward pass: z1 = x·W1 + b1 → ReLU → z2 = a1·W2 + b2 → sigmoid.
//!
//! Two execution paths implement [`ForwardPass`] with identical arithmetic:
//! - [`CompiledNetwork`] (primary): weights re-laid out input-major once at
//!   initialization, shared read-only by every caller
//! - [`RequestScopedExecutor`] (fallback): builds a fresh [`InferRequest`]
//!   per call from the borrowed weight tables
//!
//! [`InferenceEngine::forward`] tries the primary path and retries once on the
//! fallback. Per output element both paths accumulate in the same order
//! (input 0 first, bias last), so they return bit-identical scores.

use std::sync::OnceLock;

use serde::Serialize;

use super::weights::{NetworkWeights, HIDDEN_UNITS, OUTPUT_UNITS};
use crate::error::{AgroMindError, InferenceError};
use crate::features::{FeatureVector, FEATURE_COUNT};

/// Raw sigmoid outputs, each in (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorePair {
    pub irrigation: f32,
    pub fertilization: f32,
}

impl ScorePair {
    fn from_outputs(out: [f32; OUTPUT_UNITS]) -> Result<Self, InferenceError> {
        if let Some(index) = out.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFiniteOutput { index });
        }
        Ok(Self {
            irrigation: out[0],
            fertilization: out[1],
        })
    }
}

/// Which execution path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceOutcome {
    pub scores: ScorePair,
    pub path: ExecutionPath,
}

/// One way of running the forward pass
pub trait ForwardPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, features: &FeatureVector) -> Result<ScorePair, InferenceError>;
}

#[inline]
fn relu(x: f32) -> f32 {
    x.max(0.0)
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn check_input(features: &FeatureVector) -> Result<(), InferenceError> {
    match features.as_array().iter().position(|v| !v.is_finite()) {
        Some(index) => Err(InferenceError::NonFiniteInput {
            index,
            value: features.as_array()[index],
        }),
        None => Ok(()),
    }
}

// ============================================================================
// Primary path
// ============================================================================

/// Prepared network, built once per process
#[derive(Debug, Clone)]
pub struct CompiledNetwork {
    w1: [[f32; HIDDEN_UNITS]; FEATURE_COUNT],
    b1: [f32; HIDDEN_UNITS],
    w2: [[f32; OUTPUT_UNITS]; HIDDEN_UNITS],
    b2: [f32; OUTPUT_UNITS],
}

impl CompiledNetwork {
    /// Validate the weight tables and lay them out input-major
    pub fn compile(weights: &NetworkWeights) -> Result<Self, AgroMindError> {
        if let Some(index) = weights.parameters().position(|p| !p.is_finite()) {
            return Err(AgroMindError::EngineInitialization(format!(
                "parameter {} is not finite",
                index
            )));
        }

        let mut w1 = [[0.0; HIDDEN_UNITS]; FEATURE_COUNT];
        for (j, row) in weights.hidden.iter().enumerate() {
            for (i, w) in row.iter().enumerate() {
                w1[i][j] = *w;
            }
        }

        let mut w2 = [[0.0; OUTPUT_UNITS]; HIDDEN_UNITS];
        for (k, row) in weights.output.iter().enumerate() {
            for (j, w) in row.iter().enumerate() {
                w2[j][k] = *w;
            }
        }

        Ok(Self {
            w1,
            b1: *weights.hidden_bias,
            w2,
            b2: *weights.output_bias,
        })
    }
}

impl ForwardPass for CompiledNetwork {
    fn name(&self) -> &'static str {
        "compiled"
    }

    fn run(&self, features: &FeatureVector) -> Result<ScorePair, InferenceError> {
        check_input(features)?;

        let mut z1 = [0.0f32; HIDDEN_UNITS];
        for (i, x) in features.as_array().iter().enumerate() {
            for (z, w) in z1.iter_mut().zip(self.w1[i].iter()) {
                *z += x * w;
            }
        }
        let mut a1 = [0.0f32; HIDDEN_UNITS];
        for j in 0..HIDDEN_UNITS {
            a1[j] = relu(z1[j] + self.b1[j]);
        }

        let mut z2 = [0.0f32; OUTPUT_UNITS];
        for (j, a) in a1.iter().enumerate() {
            for (z, w) in z2.iter_mut().zip(self.w2[j].iter()) {
                *z += a * w;
            }
        }
        let mut out = [0.0f32; OUTPUT_UNITS];
        for k in 0..OUTPUT_UNITS {
            out[k] = sigmoid(z2[k] + self.b2[k]);
        }

        ScorePair::from_outputs(out)
    }
}

// ============================================================================
// Fallback path
// ============================================================================

/// Single-use execution object holding its own input and activations
#[derive(Debug)]
pub struct InferRequest {
    weights: NetworkWeights,
    input: Option<FeatureVector>,
    hidden: [f32; HIDDEN_UNITS],
    output: Option<[f32; OUTPUT_UNITS]>,
}

impl InferRequest {
    pub fn new(weights: NetworkWeights) -> Self {
        Self {
            weights,
            input: None,
            hidden: [0.0; HIDDEN_UNITS],
            output: None,
        }
    }

    pub fn set_input(&mut self, features: FeatureVector) {
        self.input = Some(features);
        self.output = None;
    }

    pub fn infer(&mut self) -> Result<(), InferenceError> {
        let features = self
            .input
            .ok_or_else(|| InferenceError::Backend("no input tensor set".to_string()))?;
        check_input(&features)?;
        let x = features.as_array();

        for (j, row) in self.weights.hidden.iter().enumerate() {
            let mut acc = 0.0f32;
            for i in 0..FEATURE_COUNT {
                acc += x[i] * row[i];
            }
            self.hidden[j] = relu(acc + self.weights.hidden_bias[j]);
        }

        let mut out = [0.0f32; OUTPUT_UNITS];
        for (k, row) in self.weights.output.iter().enumerate() {
            let mut acc = 0.0f32;
            for j in 0..HIDDEN_UNITS {
                acc += self.hidden[j] * row[j];
            }
            out[k] = sigmoid(acc + self.weights.output_bias[k]);
        }

        self.output = Some(out);
        Ok(())
    }

    pub fn hidden_activations(&self) -> &[f32; HIDDEN_UNITS] {
        &self.hidden
    }

    pub fn output(&self) -> Option<[f32; OUTPUT_UNITS]> {
        self.output
    }
}

/// Runs each forward pass on a fresh [`InferRequest`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestScopedExecutor {
    weights: NetworkWeights,
}

impl RequestScopedExecutor {
    pub fn new(weights: NetworkWeights) -> Self {
        Self { weights }
    }
}

impl ForwardPass for RequestScopedExecutor {
    fn name(&self) -> &'static str {
        "infer_request"
    }

    fn run(&self, features: &FeatureVector) -> Result<ScorePair, InferenceError> {
        let mut request = InferRequest::new(self.weights);
        request.set_input(*features);
        request.infer()?;
        let out = request
            .output()
            .ok_or_else(|| InferenceError::Backend("no output tensor".to_string()))?;
        ScorePair::from_outputs(out)
    }
}

// ============================================================================
// Engine
// ============================================================================

static GLOBAL_ENGINE: OnceLock<Result<InferenceEngine, AgroMindError>> = OnceLock::new();

/// Forward-pass runner with a primary path and one fallback retry
pub struct InferenceEngine {
    primary: Box<dyn ForwardPass>,
    fallback: Box<dyn ForwardPass>,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl InferenceEngine {
    /// Process-wide engine, compiled on first use
    ///
    /// Every call returns the same instance. Concurrent first callers block
    /// until it is built. An initialization failure is memoized and returned
    /// to every later caller.
    pub fn initialize() -> Result<&'static InferenceEngine, AgroMindError> {
        Self::initialize_in(&GLOBAL_ENGINE, Self::build)
    }

    /// Build a fresh engine over the fixed network (not memoized)
    pub fn build() -> Result<Self, AgroMindError> {
        Self::build_with(NetworkWeights::fixed())
    }

    /// Build a fresh engine over `weights`
    pub fn build_with(weights: NetworkWeights) -> Result<Self, AgroMindError> {
        let compiled = CompiledNetwork::compile(&weights)?;
        tracing::info!(
            "Compiled advisory network ({} -> {} -> {})",
            FEATURE_COUNT,
            HIDDEN_UNITS,
            OUTPUT_UNITS
        );
        Ok(Self::with_paths(
            Box::new(compiled),
            Box::new(RequestScopedExecutor::new(weights)),
        ))
    }

    pub fn with_paths(primary: Box<dyn ForwardPass>, fallback: Box<dyn ForwardPass>) -> Self {
        Self { primary, fallback }
    }

    fn initialize_in<F>(
        cell: &OnceLock<Result<InferenceEngine, AgroMindError>>,
        build: F,
    ) -> Result<&InferenceEngine, AgroMindError>
    where
        F: FnOnce() -> Result<InferenceEngine, AgroMindError>,
    {
        cell.get_or_init(|| {
            let engine = build();
            if let Err(e) = &engine {
                tracing::error!("{}", e);
            }
            engine
        })
        .as_ref()
        .map_err(Clone::clone)
    }

    /// Run one sample, retrying on the fallback path if the primary fails
    pub fn forward(&self, features: &FeatureVector) -> Result<InferenceOutcome, AgroMindError> {
        let primary_err = match self.primary.run(features) {
            Ok(scores) => {
                return Ok(InferenceOutcome {
                    scores,
                    path: ExecutionPath::Primary,
                })
            }
            Err(e) => e,
        };

        tracing::warn!(
            "{} path failed ({}), retrying on {}",
            self.primary.name(),
            primary_err,
            self.fallback.name()
        );

        match self.fallback.run(features) {
            Ok(scores) => Ok(InferenceOutcome {
                scores,
                path: ExecutionPath::Fallback,
            }),
            Err(fallback_err) => Err(AgroMindError::InferenceExecution {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingPath;

    impl ForwardPass for FailingPath {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&self, _: &FeatureVector) -> Result<ScorePair, InferenceError> {
            Err(InferenceError::Backend("device unavailable".to_string()))
        }
    }

    struct CountingPath {
        calls: Arc<AtomicUsize>,
        inner: CompiledNetwork,
    }

    impl ForwardPass for CountingPath {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn run(&self, features: &FeatureVector) -> Result<ScorePair, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.run(features)
        }
    }

    fn compiled() -> CompiledNetwork {
        CompiledNetwork::compile(&NetworkWeights::fixed()).unwrap()
    }

    const SAMPLES: [[f32; FEATURE_COUNT]; 5] = [
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [25.0, 70.0, 5.0, 6.0, 0.5, 0.9],
        [16.0, 45.0, 0.0, 2.0, 0.0, 0.5],
        [34.0, 95.0, 40.0, 10.0, 1.0, 0.9],
        [20.0, 50.0, 0.0, 3.0, 0.2, 0.5],
    ];

    #[test]
    fn test_zero_input_hits_biases_only() {
        // a1 = relu(b1); z2 = a1·W2 + b2 = [0.0174, 0.0259]
        let scores = compiled().run(&FeatureVector::new([0.0; 6])).unwrap();
        assert_abs_diff_eq!(scores.irrigation, 0.504_349_9, epsilon = 1e-6);
        assert_abs_diff_eq!(scores.fertilization, 0.506_474_6, epsilon = 1e-6);
    }

    #[test]
    fn test_reference_scores() {
        let scores = compiled()
            .run(&FeatureVector::new([25.0, 70.0, 5.0, 6.0, 0.5, 0.9]))
            .unwrap();
        assert_abs_diff_eq!(scores.irrigation, 0.884_911_9, epsilon = 1e-5);
        assert_abs_diff_eq!(scores.fertilization, 0.853_073_1, epsilon = 1e-5);

        let scores = compiled()
            .run(&FeatureVector::new([34.0, 95.0, 40.0, 10.0, 1.0, 0.9]))
            .unwrap();
        assert_abs_diff_eq!(scores.irrigation, 0.961_806_2, epsilon = 1e-5);
        assert_abs_diff_eq!(scores.fertilization, 0.927_004_5, epsilon = 1e-5);
    }

    #[test]
    fn test_hidden_activations_match_reference() {
        let mut request = InferRequest::new(NetworkWeights::fixed());
        request.set_input(FeatureVector::new([16.0, 45.0, 0.0, 2.0, 0.0, 0.5]));
        request.infer().unwrap();
        let expected = [5.46, 2.61, 0.0, 0.88, 2.735, 3.465, 1.1, 1.795];
        for (got, want) in request.hidden_activations().iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_paths_bit_identical() {
        let primary = compiled();
        let fallback = RequestScopedExecutor::new(NetworkWeights::fixed());
        for sample in SAMPLES {
            let f = FeatureVector::new(sample);
            let a = primary.run(&f).unwrap();
            let b = fallback.run(&f).unwrap();
            assert_eq!(a.irrigation.to_bits(), b.irrigation.to_bits());
            assert_eq!(a.fertilization.to_bits(), b.fertilization.to_bits());
        }
    }

    #[test]
    fn test_outputs_strictly_inside_unit_interval() {
        let net = compiled();
        for sample in SAMPLES {
            let s = net.run(&FeatureVector::new(sample)).unwrap();
            assert!(s.irrigation > 0.0 && s.irrigation < 1.0);
            assert!(s.fertilization > 0.0 && s.fertilization < 1.0);
        }
    }

    #[test]
    fn test_forward_is_idempotent() {
        let engine = InferenceEngine::build().unwrap();
        let f = FeatureVector::new(SAMPLES[1]);
        let first = engine.forward(&f).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.forward(&f).unwrap(), first);
        }
        assert_eq!(first.path, ExecutionPath::Primary);
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let engine = InferenceEngine::with_paths(
            Box::new(FailingPath),
            Box::new(RequestScopedExecutor::new(NetworkWeights::fixed())),
        );
        let f = FeatureVector::new(SAMPLES[1]);
        let outcome = engine.forward(&f).unwrap();
        assert_eq!(outcome.path, ExecutionPath::Fallback);
        assert_eq!(outcome.scores, compiled().run(&f).unwrap());
    }

    #[test]
    fn test_fallback_not_called_when_primary_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = InferenceEngine::with_paths(
            Box::new(compiled()),
            Box::new(CountingPath {
                calls: Arc::clone(&calls),
                inner: compiled(),
            }),
        );
        engine.forward(&FeatureVector::new(SAMPLES[0])).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_both_paths_failing_is_an_error() {
        let engine = InferenceEngine::with_paths(Box::new(FailingPath), Box::new(FailingPath));
        let err = engine.forward(&FeatureVector::new(SAMPLES[0])).unwrap_err();
        assert!(matches!(err, AgroMindError::InferenceExecution { .. }));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let engine = InferenceEngine::build().unwrap();
        let err = engine
            .forward(&FeatureVector::new([f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(err.to_string().contains("Feature 0 is not finite"));
    }

    #[test]
    fn test_infer_without_input_fails() {
        let mut request = InferRequest::new(NetworkWeights::fixed());
        assert!(request.infer().is_err());
        assert!(request.output().is_none());
    }

    #[test]
    fn test_global_engine_single_instance_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| InferenceEngine::initialize().unwrap() as *const _ as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_initialize_reuses_one_instance() {
        let a = InferenceEngine::initialize().unwrap();
        let b = InferenceEngine::initialize().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    static NAN_HIDDEN: [[f32; FEATURE_COUNT]; HIDDEN_UNITS] = [[f32::NAN; FEATURE_COUNT]; HIDDEN_UNITS];
    static INF_OUTPUT_BIAS: [f32; OUTPUT_UNITS] = [0.01, f32::INFINITY];

    fn corrupt_weights() -> NetworkWeights {
        NetworkWeights {
            hidden: &NAN_HIDDEN,
            ..NetworkWeights::fixed()
        }
    }

    #[test]
    fn test_compile_rejects_non_finite_weights() {
        let err = CompiledNetwork::compile(&corrupt_weights()).unwrap_err();
        assert!(matches!(err, AgroMindError::EngineInitialization(_)));
        assert!(!err.is_validation());
        assert!(err.to_string().contains("parameter 0 is not finite"));

        // Last parameter in iteration order: 73 = 48 + 8 + 16 + 1
        let weights = NetworkWeights {
            output_bias: &INF_OUTPUT_BIAS,
            ..NetworkWeights::fixed()
        };
        let err = CompiledNetwork::compile(&weights).unwrap_err();
        assert_eq!(
            err,
            AgroMindError::EngineInitialization("parameter 73 is not finite".to_string())
        );
    }

    #[test]
    fn test_build_reports_initialization_failure() {
        let err = InferenceEngine::build_with(corrupt_weights()).unwrap_err();
        assert!(matches!(err, AgroMindError::EngineInitialization(_)));
    }

    #[test]
    fn test_initialization_failure_is_memoized() {
        let cell = OnceLock::new();
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            InferenceEngine::build_with(corrupt_weights())
        };

        let first = InferenceEngine::initialize_in(&cell, build).unwrap_err();
        let second = InferenceEngine::initialize_in(&cell, build).unwrap_err();

        assert_eq!(first, second);
        assert!(matches!(first, AgroMindError::EngineInitialization(_)));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }
}
