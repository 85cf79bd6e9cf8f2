//! Example driving a small channel sequence through the kernel layer
//!
//! Prepares |00⟩⟨00|, flips qubit 0, partially damps it, and reads back the
//! outcome distribution.

use paulivec_state::{ptm::common, PauliVector};

fn main() {
    let mut state = PauliVector::new(2).unwrap();
    println!("ground state trace: {}", state.trace().unwrap());

    state.apply_single(&common::bit_flip(), 0).unwrap();
    state
        .apply_single(&common::amplitude_damping(0.1), 0)
        .unwrap();
    state.apply_diagonal(&common::dephasing(0.05), &[1]).unwrap();

    let (zero, one) = state.partial_trace(0).unwrap();
    println!("qubit 0: p(0) = {zero:.4}, p(1) = {one:.4}");

    println!("outcome distribution:");
    for (outcome, p) in state.diagonal().unwrap().iter().enumerate() {
        println!("  |{outcome:02b}⟩: {p:.4}");
    }
}
