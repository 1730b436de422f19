//! Merkle commitments to codewords, one leaf per fold pair.
//!
//! A codeword of length `n` is committed as the `n/2 × 2` matrix whose row `i` is the fold pair
//! `(x_i, x_{i+n/2})`. Base field codewords go through [`MerkleTreeMmcs`] directly, folded
//! extension codewords through [`ExtensionMmcs`], which hashes their base field coordinates.

use p3_commit::{BatchOpeningRef, ExtensionMmcs, Mmcs};
use p3_field::{ExtensionField, Field};
use p3_matrix::{
    Dimensions,
    dense::{RowMajorMatrix, RowMajorMatrixView},
    extension::FlatMatrixView,
};
use p3_merkle_tree::{MerkleTree, MerkleTreeMmcs};
use p3_symmetric::{CryptographicHasher, Hash, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("leaf index {index} out of range for a tree with {len} leaves")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Prover data of a committed base field codeword.
pub type BaseMerkleTree<F, const DIGEST_ELEMS: usize> =
    MerkleTree<F, F, RowMajorMatrix<F>, DIGEST_ELEMS>;

/// Prover data of a committed extension field codeword.
pub type ExtensionMerkleTree<F, EF, const DIGEST_ELEMS: usize> =
    MerkleTree<F, F, FlatMatrixView<F, EF, RowMajorMatrix<EF>>, DIGEST_ELEMS>;

/// A fold pair `[x_p, x_{p+n/2}]` and its Merkle authentication path.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
    serialize = "F: Serialize, V: Serialize, [F; DIGEST_ELEMS]: Serialize",
    deserialize = "F: Deserialize<'de>, V: Deserialize<'de>, [F; DIGEST_ELEMS]: Deserialize<'de>"
))]
pub struct MerkleOpening<F, V, const DIGEST_ELEMS: usize> {
    pub values: [V; 2],
    pub path: Vec<[F; DIGEST_ELEMS]>,
}

impl<F, V, const DIGEST_ELEMS: usize> MerkleOpening<F, V, DIGEST_ELEMS> {
    #[must_use]
    pub fn num_elements(&self) -> usize {
        2 + self.path.len() * DIGEST_ELEMS
    }
}

/// Lays `codeword` out as `n/2` rows, row `i` holding the fold pair `(x_i, x_{i+n/2})`.
///
/// # Panics
/// Panics if the codeword has fewer than two elements or an odd length.
pub fn fold_pair_matrix<V>(codeword: &[V]) -> RowMajorMatrix<V>
where
    V: Copy + Default + Send + Sync,
{
    assert!(
        codeword.len() >= 2 && codeword.len() % 2 == 0,
        "a codeword must split into fold pairs"
    );
    RowMajorMatrixView::new(codeword, codeword.len() / 2).transpose()
}

/// The Merkle tree MMCS every commitment of a proof is made with.
#[derive(Debug, Clone)]
pub struct MerkleCommitter<F, H, C, const DIGEST_ELEMS: usize> {
    mmcs: MerkleTreeMmcs<F, F, H, C, DIGEST_ELEMS>,
}

impl<F, H, C, const DIGEST_ELEMS: usize> MerkleCommitter<F, H, C, DIGEST_ELEMS>
where
    F: Field,
    H: CryptographicHasher<F, [F; DIGEST_ELEMS]> + Sync,
    C: PseudoCompressionFunction<[F; DIGEST_ELEMS], 2> + Sync,
    [F; DIGEST_ELEMS]: Serialize + for<'de> Deserialize<'de>,
{
    pub fn new(hasher: H, compressor: C) -> Self {
        Self {
            mmcs: MerkleTreeMmcs::new(hasher, compressor),
        }
    }

    fn extension<EF: ExtensionField<F>>(
        &self,
    ) -> ExtensionMmcs<F, EF, MerkleTreeMmcs<F, F, H, C, DIGEST_ELEMS>> {
        ExtensionMmcs::new(self.mmcs.clone())
    }

    /// Commits to a base field codeword.
    #[instrument(skip_all, fields(len = codeword.len()))]
    pub fn commit(&self, codeword: &[F]) -> ([F; DIGEST_ELEMS], BaseMerkleTree<F, DIGEST_ELEMS>) {
        commit_pairs(&self.mmcs, codeword)
    }

    /// Commits to a folded extension field codeword.
    #[instrument(skip_all, fields(len = codeword.len()))]
    pub fn commit_extension<EF: ExtensionField<F>>(
        &self,
        codeword: &[EF],
    ) -> ([F; DIGEST_ELEMS], ExtensionMerkleTree<F, EF, DIGEST_ELEMS>) {
        commit_pairs(&self.extension::<EF>(), codeword)
    }

    /// Opens fold pair `index` of a tree over `2 * num_pairs` base field elements.
    pub fn open(
        &self,
        tree: &BaseMerkleTree<F, DIGEST_ELEMS>,
        num_pairs: usize,
        index: usize,
    ) -> Result<MerkleOpening<F, F, DIGEST_ELEMS>, MerkleError> {
        open_pair(&self.mmcs, tree, num_pairs, index)
    }

    /// Opens fold pair `index` of a tree over `2 * num_pairs` extension field elements.
    pub fn open_extension<EF: ExtensionField<F>>(
        &self,
        tree: &ExtensionMerkleTree<F, EF, DIGEST_ELEMS>,
        num_pairs: usize,
        index: usize,
    ) -> Result<MerkleOpening<F, EF, DIGEST_ELEMS>, MerkleError> {
        open_pair(&self.extension::<EF>(), tree, num_pairs, index)
    }

    /// Checks that `opening` is fold pair `index` of a base field codeword of `2^(log_pairs + 1)`
    /// elements committed under `root`.
    pub fn verify(
        &self,
        root: &[F; DIGEST_ELEMS],
        log_pairs: usize,
        index: usize,
        opening: &MerkleOpening<F, F, DIGEST_ELEMS>,
    ) -> bool {
        verify_pair(&self.mmcs, root, log_pairs, index, opening)
    }

    /// Same as [`Self::verify`] for an extension field codeword.
    pub fn verify_extension<EF: ExtensionField<F>>(
        &self,
        root: &[F; DIGEST_ELEMS],
        log_pairs: usize,
        index: usize,
        opening: &MerkleOpening<F, EF, DIGEST_ELEMS>,
    ) -> bool {
        verify_pair(&self.extension::<EF>(), root, log_pairs, index, opening)
    }
}

fn commit_pairs<F, V, M, const DIGEST_ELEMS: usize>(
    mmcs: &M,
    codeword: &[V],
) -> ([F; DIGEST_ELEMS], M::ProverData<RowMajorMatrix<V>>)
where
    V: Copy + Default + Send + Sync,
    M: Mmcs<V, Commitment = Hash<F, F, DIGEST_ELEMS>>,
{
    let (root, tree) = mmcs.commit_matrix(fold_pair_matrix(codeword));
    (root.into(), tree)
}

fn open_pair<F, V, M, const DIGEST_ELEMS: usize>(
    mmcs: &M,
    tree: &M::ProverData<RowMajorMatrix<V>>,
    num_pairs: usize,
    index: usize,
) -> Result<MerkleOpening<F, V, DIGEST_ELEMS>, MerkleError>
where
    V: Copy + Send + Sync,
    M: Mmcs<V, Proof = Vec<[F; DIGEST_ELEMS]>>,
{
    if index >= num_pairs {
        return Err(MerkleError::IndexOutOfRange {
            index,
            len: num_pairs,
        });
    }

    let opening = mmcs.open_batch(index, tree);
    let row = &opening.opened_values[0];
    Ok(MerkleOpening {
        values: [row[0], row[1]],
        path: opening.opening_proof,
    })
}

fn verify_pair<F, V, M, const DIGEST_ELEMS: usize>(
    mmcs: &M,
    root: &[F; DIGEST_ELEMS],
    log_pairs: usize,
    index: usize,
    opening: &MerkleOpening<F, V, DIGEST_ELEMS>,
) -> bool
where
    F: Copy,
    V: Copy + Send + Sync,
    M: Mmcs<V, Commitment = Hash<F, F, DIGEST_ELEMS>, Proof = Vec<[F; DIGEST_ELEMS]>>,
{
    if log_pairs >= usize::BITS as usize || index >> log_pairs != 0 {
        return false;
    }

    let commitment: Hash<F, F, DIGEST_ELEMS> = (*root).into();
    let dimensions = [Dimensions {
        height: 1 << log_pairs,
        width: 2,
    }];
    mmcs.verify_batch(
        &commitment,
        &dimensions,
        index,
        BatchOpeningRef {
            opened_values: &[opening.values.to_vec()],
            opening_proof: &opening.path,
        },
    )
    .is_ok()
}
