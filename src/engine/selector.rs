// src/engine/selector.rs

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::attempt::QuestionSnapshot;
use crate::models::exam::ExamQuestion;

/// Draws a uniformly random, duplicate-free subset of `count`
/// questions from the pool and snapshots them for an attempt.
///
/// Asking for more questions than the pool holds returns the whole
/// pool. The RNG is injected so sampling is reproducible under test.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[ExamQuestion],
    count: usize,
    rng: &mut R,
) -> Vec<QuestionSnapshot> {
    let mut picks: Vec<&ExamQuestion> = pool.iter().collect();
    picks.shuffle(rng);
    picks.truncate(count.min(pool.len()));
    picks.into_iter().map(QuestionSnapshot::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn pool(size: usize) -> Vec<ExamQuestion> {
        (0..size as i64)
            .map(|id| ExamQuestion {
                id,
                exam_type_id: 1,
                module: String::new(),
                question_text: format!("question {id}"),
                choices: vec![],
                answers: vec!["A".to_string()],
                points: 1,
                explanation: String::new(),
            })
            .collect()
    }

    #[test]
    fn returns_min_of_count_and_pool_size_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        for pool_size in [0usize, 1, 5, 20] {
            for count in [0usize, 1, 5, 50] {
                let questions = pool(pool_size);
                let sampled = sample_questions(&questions, count, &mut rng);
                assert_eq!(sampled.len(), count.min(pool_size));

                let ids: HashSet<i64> = sampled.iter().map(|q| q.id).collect();
                assert_eq!(ids.len(), sampled.len(), "sampled ids must be distinct");
                assert!(ids.iter().all(|id| (0..pool_size as i64).contains(id)));
            }
        }
    }

    #[test]
    fn oversized_request_returns_whole_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let sampled = sample_questions(&pool(3), 100, &mut rng);
        let ids: HashSet<i64> = sampled.iter().map(|q| q.id).collect();
        assert_eq!(ids, HashSet::from([0, 1, 2]));
    }

    #[test]
    fn same_seed_same_selection() {
        let questions = pool(30);
        let a = sample_questions(&questions, 10, &mut StdRng::seed_from_u64(42));
        let b = sample_questions(&questions, 10, &mut StdRng::seed_from_u64(42));
        let ids = |s: &[QuestionSnapshot]| s.iter().map(|q| q.id).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }
}
