//! Property tests for in-memory vector store search ordering.

use std::collections::HashSet;

use proptest::prelude::*;
use ragchat_rag::inmemory::InMemoryVectorStore;
use ragchat_rag::vectorstore::VectorStore;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

fn arb_chunk(dim: usize) -> impl Strategy<Value = (String, String, Vec<f32>)> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim))
}

/// For any set of stored chunks, search returns at most `top_k` results,
/// never more than were stored, ordered by descending cosine similarity.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                for (id, text, embedding) in &chunks {
                    store.insert("test", id.clone(), text.clone(), embedding.clone()).await;
                }
                let unique: HashSet<&String> = chunks.iter().map(|(id, _, _)| id).collect();
                let results = store.search("test", &query, top_k).await.unwrap();
                (results, unique.len())
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(unique_count));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

#[tokio::test]
async fn nearest_chunk_comes_first() {
    let store = InMemoryVectorStore::new();
    store.insert("medical-chatbot", "acne", "Acne is a skin condition.", vec![1.0, 0.0, 0.0]).await;
    store
        .insert("medical-chatbot", "flu", "Influenza is a viral infection.", vec![0.0, 1.0, 0.0])
        .await;
    store.insert("medical-chatbot", "mix", "Skin and viruses.", vec![0.7, 0.7, 0.0]).await;

    let results = store.search("medical-chatbot", &[0.9, 0.1, 0.0], 2).await.unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["acne", "mix"]);
}
