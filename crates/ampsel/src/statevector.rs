//! Statevector simulation engine.
//!
//! Gates mutate the amplitude vector in place by walking basis-state indices
//! and testing bit masks. Qubit `q` is bit `q` of the index.

use num_complex::Complex64;
use rand::Rng;

use crate::counts::Counts;
use crate::error::{SelectError, SelectResult};
use crate::gate::{Gate, GateSequence};
use crate::qubit::QubitId;

/// Hard upper bound on register width, independent of any memory budget.
pub const MAX_QUBITS: usize = 30;

/// Bytes occupied by one amplitude.
pub const BYTES_PER_AMPLITUDE: u128 = std::mem::size_of::<Complex64>() as u128;

/// Bytes needed to hold the amplitudes of an `num_qubits`-qubit register.
pub fn required_bytes(num_qubits: usize) -> u128 {
    BYTES_PER_AMPLITUDE << num_qubits.min(100)
}

/// The state of an `n`-qubit register as `2^n` complex amplitudes.
#[derive(Debug, Clone)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl StateVector {
    /// Create a register initialised to |0...0⟩.
    pub fn new(num_qubits: usize) -> SelectResult<Self> {
        if num_qubits == 0 {
            return Err(SelectError::InvalidQubitCount(0));
        }
        if num_qubits > MAX_QUBITS {
            return Err(SelectError::SimulationOverflow {
                num_qubits,
                required_bytes: required_bytes(num_qubits),
                budget_bytes: required_bytes(MAX_QUBITS),
            });
        }
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (`2^n`).
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Always false; a register has at least two amplitudes.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// All amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of one basis state.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Probability of measuring `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |a| a.norm_sqr())
    }

    /// Measurement probabilities for every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes; 1 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    // =========================================================================
    // Gate application
    // =========================================================================

    /// Apply a single gate.
    pub fn apply(&mut self, gate: &Gate) -> SelectResult<()> {
        match gate {
            Gate::H(q) => self.apply_hadamard(*q),
            Gate::X(q) => self.apply_bit_flip(*q),
            Gate::Z(q) => self.apply_phase_flip(*q),
            Gate::Mcz { target, controls } => self.apply_controlled_phase_flip(*target, controls),
            Gate::Mcx { target, controls } => self.apply_controlled_bit_flip(*target, controls),
        }
    }

    /// Apply every gate of a sequence in order.
    pub fn apply_sequence(&mut self, sequence: &GateSequence) -> SelectResult<()> {
        if sequence.num_qubits() != self.num_qubits {
            return Err(SelectError::QubitOutOfRange {
                qubit: sequence.num_qubits().saturating_sub(1) as u32,
                num_qubits: self.num_qubits,
            });
        }
        for gate in sequence.iter() {
            self.apply(gate)?;
        }
        Ok(())
    }

    /// Hadamard on every qubit. From |0...0⟩ this yields the uniform
    /// superposition with every amplitude equal to `1/sqrt(2^n)`.
    pub fn apply_hadamard_all(&mut self) {
        for q in 0..self.num_qubits {
            self.hadamard_unchecked(1 << q);
        }
    }

    /// Hadamard on one qubit.
    pub fn apply_hadamard(&mut self, qubit: QubitId) -> SelectResult<()> {
        let mask = self.mask(qubit)?;
        self.hadamard_unchecked(mask);
        Ok(())
    }

    /// Swap amplitude pairs whose indices differ only in `qubit`.
    pub fn apply_bit_flip(&mut self, qubit: QubitId) -> SelectResult<()> {
        let mask = self.mask(qubit)?;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
        Ok(())
    }

    /// Negate amplitudes whose `qubit` bit is 1.
    pub fn apply_phase_flip(&mut self, qubit: QubitId) -> SelectResult<()> {
        let mask = self.mask(qubit)?;
        self.negate_where(mask);
        Ok(())
    }

    /// Negate amplitudes where the target and every control bit are 1.
    ///
    /// With no controls this is a plain phase flip on the target.
    pub fn apply_controlled_phase_flip(
        &mut self,
        target: QubitId,
        controls: &[QubitId],
    ) -> SelectResult<()> {
        let mask = self.mask(target)? | self.control_mask(controls)?;
        self.negate_where(mask);
        Ok(())
    }

    /// Flip the target bit on states where every control bit is 1.
    pub fn apply_controlled_bit_flip(
        &mut self,
        target: QubitId,
        controls: &[QubitId],
    ) -> SelectResult<()> {
        let tgt_mask = self.mask(target)?;
        let ctrl_mask = self.control_mask(controls)?;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & tgt_mask == 0 {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
        Ok(())
    }

    /// Negate the amplitudes of the listed basis states.
    ///
    /// A diagonal phase oracle in one pass over `indices`. Listing an index
    /// twice negates it twice.
    pub fn negate_amplitudes(&mut self, indices: &[usize]) -> SelectResult<()> {
        let size = self.amplitudes.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= size) {
            return Err(SelectError::IndexOutOfRange { index, size });
        }
        for &i in indices {
            self.amplitudes[i] = -self.amplitudes[i];
        }
        Ok(())
    }

    /// Reflect about the uniform superposition: `a_i -> a_i - 2·mean(a)`.
    ///
    /// Same operator as the H-X-MCZ-X-H diffusion sequence, in a single pass.
    pub fn invert_about_mean(&mut self) {
        let mean = self.amplitudes.iter().sum::<Complex64>() / self.amplitudes.len() as f64;
        let shift = 2.0 * mean;
        for amp in &mut self.amplitudes {
            *amp -= shift;
        }
    }

    fn hadamard_unchecked(&mut self, mask: usize) {
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn negate_where(&mut self, mask: usize) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn mask(&self, qubit: QubitId) -> SelectResult<usize> {
        if qubit.index() >= self.num_qubits {
            return Err(SelectError::QubitOutOfRange {
                qubit: qubit.0,
                num_qubits: self.num_qubits,
            });
        }
        Ok(qubit.mask())
    }

    fn control_mask(&self, controls: &[QubitId]) -> SelectResult<usize> {
        controls
            .iter()
            .try_fold(0usize, |acc, &c| -> SelectResult<usize> {
                Ok(acc | self.mask(c)?)
            })
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Sample a measurement outcome with one uniform draw over the cumulative
    /// distribution. The state is left untouched.
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        let mut last_nonzero = 0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > 0.0 {
                last_nonzero = i;
            }
            cumulative += p;
            if r < cumulative {
                return i;
            }
        }

        // Accumulated rounding left the sum just below r.
        last_nonzero
    }

    /// Sample `shots` outcomes into a histogram.
    pub fn sample_counts_with_rng<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> Counts {
        let mut counts = Counts::new();
        for _ in 0..shots {
            counts.insert(self.sample_with_rng(rng), 1);
        }
        counts
    }

    /// Convert a measurement outcome to a bitstring, most-significant qubit
    /// first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            StateVector::new(0),
            Err(SelectError::InvalidQubitCount(0))
        ));
    }

    #[test]
    fn test_too_many_qubits_rejected() {
        assert!(matches!(
            StateVector::new(MAX_QUBITS + 1),
            Err(SelectError::SimulationOverflow { .. })
        ));
    }

    #[test]
    fn test_hadamard_all_uniform() {
        for n in 1..=6 {
            let mut sv = StateVector::new(n).unwrap();
            sv.apply_hadamard_all();
            let expected = 1.0 / ((1 << n) as f64).sqrt();
            for amp in sv.amplitudes() {
                assert!(approx_eq(*amp, Complex64::new(expected, 0.0)));
            }
            assert!((sv.norm_sqr() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hadamard_twice_is_identity() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_bit_flip(QubitId(1)).unwrap();
        sv.apply_hadamard_all();
        sv.apply_hadamard_all();
        assert!(approx_eq(sv.amplitudes[0b010], Complex64::new(1.0, 0.0)));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bit_flip() {
        let mut sv = StateVector::new(1).unwrap();
        sv.apply_bit_flip(QubitId(0)).unwrap();

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_bit_flip_addresses_low_bit_first() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_bit_flip(QubitId(0)).unwrap();
        sv.apply_bit_flip(QubitId(2)).unwrap();
        assert!(approx_eq(sv.amplitudes[0b101], Complex64::new(1.0, 0.0)));
        assert_eq!(sv.outcome_to_bitstring(0b101), "101");
        assert_eq!(sv.outcome_to_bitstring(0b001), "001");
    }

    #[test]
    fn test_controlled_phase_flip_only_all_ones() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_hadamard_all();
        sv.apply_controlled_phase_flip(QubitId(2), &[QubitId(0), QubitId(1)])
            .unwrap();
        let a = 1.0 / 8.0_f64.sqrt();
        for (i, amp) in sv.amplitudes().iter().enumerate() {
            let expected = if i == 0b111 { -a } else { a };
            assert!(approx_eq(*amp, Complex64::new(expected, 0.0)), "index {i}");
        }
    }

    #[test]
    fn test_controlled_phase_flip_matches_h_mcx_h() {
        let mut direct = StateVector::new(3).unwrap();
        direct.apply_hadamard_all();
        direct.apply_bit_flip(QubitId(1)).unwrap();
        direct.apply_hadamard(QubitId(0)).unwrap();
        let mut decomposed = direct.clone();

        let controls = [QubitId(0), QubitId(1)];
        direct
            .apply_controlled_phase_flip(QubitId(2), &controls)
            .unwrap();

        decomposed.apply_hadamard(QubitId(2)).unwrap();
        decomposed
            .apply_controlled_bit_flip(QubitId(2), &controls)
            .unwrap();
        decomposed.apply_hadamard(QubitId(2)).unwrap();

        for (a, b) in direct.amplitudes().iter().zip(decomposed.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_empty_controls_is_phase_flip() {
        let mut a = StateVector::new(2).unwrap();
        a.apply_hadamard_all();
        let mut b = a.clone();
        a.apply_controlled_phase_flip(QubitId(1), &[]).unwrap();
        b.apply_phase_flip(QubitId(1)).unwrap();
        assert_eq!(a.amplitudes(), b.amplitudes());
    }

    #[test]
    fn test_out_of_range_qubit() {
        let mut sv = StateVector::new(2).unwrap();
        assert!(matches!(
            sv.apply_bit_flip(QubitId(2)),
            Err(SelectError::QubitOutOfRange { qubit: 2, .. })
        ));
        assert!(
            sv.apply_controlled_phase_flip(QubitId(0), &[QubitId(3)])
                .is_err()
        );
    }

    #[test]
    fn test_negate_amplitudes() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_hadamard_all();
        sv.negate_amplitudes(&[1, 3]).unwrap();
        let signs: Vec<f64> = sv.amplitudes().iter().map(|a| a.re.signum()).collect();
        assert_eq!(signs, vec![1.0, -1.0, 1.0, -1.0]);

        assert!(matches!(
            sv.negate_amplitudes(&[0, 4]),
            Err(SelectError::IndexOutOfRange { index: 4, size: 4 })
        ));
        // Nothing was touched by the rejected call.
        assert!(sv.amplitudes()[0].re > 0.0);
    }

    #[test]
    fn test_invert_about_mean_matches_gate_diffusion() {
        let mut direct = StateVector::new(3).unwrap();
        direct.apply_hadamard_all();
        direct.apply_bit_flip(QubitId(0)).unwrap();
        direct.apply_hadamard(QubitId(0)).unwrap();
        direct.negate_amplitudes(&[2, 7]).unwrap();
        let mut gates = direct.clone();

        direct.invert_about_mean();

        gates.apply_hadamard_all();
        for q in 0..3 {
            gates.apply_bit_flip(QubitId(q)).unwrap();
        }
        gates
            .apply_controlled_phase_flip(QubitId(2), &[QubitId(0), QubitId(1)])
            .unwrap();
        for q in 0..3 {
            gates.apply_bit_flip(QubitId(q)).unwrap();
        }
        gates.apply_hadamard_all();

        for (a, b) in direct.amplitudes().iter().zip(gates.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = StateVector::new(1).unwrap();
        sv.apply_bit_flip(QubitId(0)).unwrap();

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(sv.sample_with_rng(&mut rng), 1);
        }
    }

    #[test]
    fn test_sample_does_not_mutate() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_hadamard_all();
        let before = sv.amplitudes().to_vec();
        let mut rng = SmallRng::seed_from_u64(1);
        let counts = sv.sample_counts_with_rng(400, &mut rng);
        assert_eq!(sv.amplitudes(), &before[..]);
        assert_eq!(counts.shots(), 400);
        // Every outcome of a uniform 2-qubit state shows up.
        for i in 0..4 {
            assert!(counts.get(i) > 0);
        }
    }

    #[test]
    fn test_seeded_sampling_reproducible() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_hadamard_all();
        let a = sv.sample_counts_with_rng(64, &mut SmallRng::seed_from_u64(42));
        let b = sv.sample_counts_with_rng(64, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_required_bytes() {
        assert_eq!(required_bytes(1), 32);
        assert_eq!(required_bytes(20), 16 * 1024 * 1024);
    }
}
