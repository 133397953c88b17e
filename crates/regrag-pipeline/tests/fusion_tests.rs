use regrag_core::types::Candidate;
use regrag_pipeline::fuse::reciprocal_rank_fusion;

fn cand(id: &str, query_index: usize, rank: usize, score: f32) -> Candidate {
    Candidate {
        chunk_id: id.to_string(),
        query_index,
        rank,
        score,
    }
}

#[test]
fn consensus_across_queries_beats_single_strong_hit() {
    // "shared" is rank 2 in both queries, "solo" is rank 1 in one.
    let lists = vec![
        vec![cand("solo", 0, 1, 0.99), cand("shared", 0, 2, 0.5)],
        vec![cand("other", 1, 1, 0.9), cand("shared", 1, 2, 0.4)],
    ];
    let fused = reciprocal_rank_fusion(&lists, 60, 5);
    assert_eq!(fused[0].chunk_id, "shared");
    let expected = 1.0 / 62.0 + 1.0 / 62.0;
    assert!((fused[0].fused_score - expected).abs() < 1e-12);
    assert_eq!(fused[0].contributing, vec![(0, 2), (1, 2)]);
}

#[test]
fn fusion_is_scale_invariant_in_similarity() {
    let base = vec![
        vec![cand("a", 0, 1, 0.9), cand("b", 0, 2, 0.8)],
        vec![cand("b", 1, 1, 0.7), cand("c", 1, 2, 0.6)],
    ];
    let scaled: Vec<Vec<Candidate>> = base
        .iter()
        .map(|l| {
            l.iter()
                .map(|c| cand(&c.chunk_id, c.query_index, c.rank, c.score * 1000.0))
                .collect()
        })
        .collect();

    let order = |lists: &[Vec<Candidate>]| -> Vec<String> {
        reciprocal_rank_fusion(lists, 60, 5)
            .into_iter()
            .map(|f| f.chunk_id)
            .collect()
    };
    assert_eq!(order(&base), order(&scaled));
}

#[test]
fn fused_order_is_deterministic_across_runs() {
    let lists = vec![
        vec![cand("x", 0, 1, 0.9), cand("y", 0, 2, 0.8), cand("z", 0, 3, 0.7)],
        vec![cand("z", 1, 1, 0.6), cand("y", 1, 2, 0.5)],
    ];
    let first = reciprocal_rank_fusion(&lists, 60, 5);
    for _ in 0..10 {
        let again = reciprocal_rank_fusion(&lists, 60, 5);
        let ids: Vec<_> = again.iter().map(|f| f.chunk_id.clone()).collect();
        let expected: Vec<_> = first.iter().map(|f| f.chunk_id.clone()).collect();
        assert_eq!(ids, expected);
    }
}

#[test]
fn equal_scores_tie_break_by_chunk_id_ascending() {
    // Each chunk is rank 1 in exactly one query: identical fused score and
    // contributing count.
    let lists = vec![
        vec![cand("beta", 0, 1, 0.9)],
        vec![cand("alpha", 1, 1, 0.9)],
    ];
    let fused = reciprocal_rank_fusion(&lists, 60, 5);
    assert_eq!(fused[0].chunk_id, "alpha");
    assert_eq!(fused[1].chunk_id, "beta");
}

#[test]
fn more_contributing_queries_wins_score_ties() {
    // With k = 0: "both" at rank 2 twice scores 1.0, "once" at rank 1 once
    // scores 1.0. Same score, but "both" has broader consensus.
    let lists = vec![
        vec![cand("once", 0, 1, 0.9), cand("both", 0, 2, 0.8)],
        vec![cand("both", 1, 2, 0.7)],
    ];
    let fused = reciprocal_rank_fusion(&lists, 0, 5);
    assert!((fused[0].fused_score - fused[1].fused_score).abs() < 1e-12);
    assert_eq!(fused[0].chunk_id, "both");
}

#[test]
fn output_truncates_to_top_m() {
    let lists = vec![vec![
        cand("a", 0, 1, 0.9),
        cand("b", 0, 2, 0.8),
        cand("c", 0, 3, 0.7),
        cand("d", 0, 4, 0.6),
    ]];
    let fused = reciprocal_rank_fusion(&lists, 60, 2);
    assert_eq!(fused.len(), 2);
    assert_eq!(fused[0].chunk_id, "a");
    assert_eq!(fused[1].chunk_id, "b");
}

#[test]
fn empty_input_fuses_to_empty() {
    assert!(reciprocal_rank_fusion(&[], 60, 5).is_empty());
    assert!(reciprocal_rank_fusion(&[vec![], vec![]], 60, 5).is_empty());
}
