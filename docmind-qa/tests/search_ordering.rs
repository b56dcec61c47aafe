//! Property tests for vector index search ordering and the artifact
//! round-trip law.

use docmind_qa::document::Segment;
use docmind_qa::index::VectorIndex;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

fn segments_for(doc: &str, count: usize) -> Vec<Segment> {
    (0..count)
        .map(|i| Segment {
            id: format!("{doc}_{i}"),
            text: format!("segment {i}"),
            document_id: doc.to_string(),
        })
        .collect()
}

const DIM: usize = 16;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search results are ordered by descending similarity and bounded by k.
    #[test]
    fn results_ordered_descending_and_bounded_by_k(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let count = embeddings.len();
        let index = VectorIndex::build(segments_for("doc_1", count), embeddings).unwrap();
        let results = index.search(&query, k);

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= count);

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }

    /// Deserializing a serialized index returns the same ranked results for
    /// the same query.
    #[test]
    fn artifact_round_trip_preserves_ranking(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..12),
        query in arb_normalized_embedding(DIM),
    ) {
        let count = embeddings.len();
        let index = VectorIndex::build(segments_for("doc_1", count), embeddings).unwrap();

        let restored =
            VectorIndex::from_bytes("doc_1", &index.to_bytes().unwrap()).unwrap();

        let before = index.search(&query, count);
        let after = restored.search(&query, count);
        prop_assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            prop_assert_eq!(&a.segment, &b.segment);
            prop_assert_eq!(a.score, b.score);
        }
    }
}
