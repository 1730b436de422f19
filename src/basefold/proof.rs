use serde::{Deserialize, Serialize};

pub use crate::merkle_tree::MerkleOpening;

/// Complete non-interactive Basefold proof.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
    serialize = "F: Serialize, EF: Serialize, [F; DIGEST_ELEMS]: Serialize",
    deserialize = "F: Deserialize<'de>, EF: Deserialize<'de>, [F; DIGEST_ELEMS]: Deserialize<'de>"
))]
pub struct BasefoldProof<F, EF, const DIGEST_ELEMS: usize> {
    /// Merkle roots of the initial codeword and of every folded codeword except the last.
    pub commitments: Vec<[F; DIGEST_ELEMS]>,

    /// The fully folded message, i.e. the polynomial evaluated at the folding challenges.
    ///
    /// This is the only evaluation claim the proof carries. The point is the sequence of
    /// Fiat–Shamir folding challenges; there is no way to open the commitment at a point
    /// chosen by the caller.
    pub final_value: EF,

    /// Query PoW witness, when grinding is enabled.
    pub pow_witness: Option<F>,

    /// One proof per sampled query index, in increasing index order.
    pub queries: Vec<QueryProof<F, EF, DIGEST_ELEMS>>,
}

impl<F, EF, const DIGEST_ELEMS: usize> BasefoldProof<F, EF, DIGEST_ELEMS> {
    /// Number of field elements carried by the proof, counting extension elements as one.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        let queries: usize = self
            .queries
            .iter()
            .map(|query| {
                query.initial.num_elements()
                    + query
                        .rounds
                        .iter()
                        .map(MerkleOpening::num_elements)
                        .sum::<usize>()
            })
            .sum();
        self.commitments.len() * DIGEST_ELEMS
            + 1
            + usize::from(self.pow_witness.is_some())
            + queries
    }
}

/// Openings of one query index across all committed rounds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
    serialize = "F: Serialize, EF: Serialize, [F; DIGEST_ELEMS]: Serialize",
    deserialize = "F: Deserialize<'de>, EF: Deserialize<'de>, [F; DIGEST_ELEMS]: Deserialize<'de>"
))]
pub struct QueryProof<F, EF, const DIGEST_ELEMS: usize> {
    /// Opening of the base field codeword.
    pub initial: MerkleOpening<F, F, DIGEST_ELEMS>,
    /// Openings of the folded codewords of rounds `1..num_variables`.
    pub rounds: Vec<MerkleOpening<F, EF, DIGEST_ELEMS>>,
}
