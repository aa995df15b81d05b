use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::bank::question::{LevelFilter, Question, QuestionId};
use crate::bank::repository::norm_package;
use crate::session::record::SessionRecord;

/// Question IDs already consumed for `package` across all recorded sessions.
///
/// Records written by this app leave `all_ids` empty, so under the current
/// flow the set is empty too; histories that do carry IDs (imported or
/// hand-maintained files) are honored.
pub fn used_ids_for_package(history: &[SessionRecord], package: &str) -> HashSet<QuestionId> {
    let target = norm_package(package);
    history
        .iter()
        .filter(|record| norm_package(&record.package) == target)
        .flat_map(|record| record.all_ids.iter().cloned())
        .collect()
}

/// Select up to `n` questions, preferring ones not seen before for this
/// package.
///
/// The pool is first narrowed by the level filter. Fresh questions (ID not
/// in the history's used set) are drawn without replacement; if they don't
/// cover `n`, the shortfall is filled from the already-seen remainder. The
/// final order is shuffled so it carries no trace of the fresh/remainder
/// split. Returns fewer than `n` when the filtered pool is too small; that
/// is not an error.
///
/// Draws come from an OS-entropy RNG, so back-to-back sessions differ.
pub fn pick_fresh_priority(
    db: &[Question],
    n: usize,
    history: &[SessionRecord],
    package: &str,
    filter: LevelFilter,
) -> Vec<Question> {
    let pool: Vec<&Question> = db.iter().filter(|q| filter.admits(q)).collect();
    let used = used_ids_for_package(history, package);

    let fresh: Vec<&Question> = pool
        .iter()
        .copied()
        .filter(|q| q.id.as_ref().is_none_or(|id| !used.contains(id)))
        .collect();

    let mut rng = StdRng::from_entropy();
    let mut selected: Vec<Question> = if fresh.len() >= n {
        fresh
            .choose_multiple(&mut rng, n)
            .map(|q| (*q).clone())
            .collect()
    } else {
        let mut picked: Vec<Question> = fresh.iter().map(|q| (*q).clone()).collect();
        let picked_ids: HashSet<Option<&QuestionId>> =
            fresh.iter().map(|q| q.id.as_ref()).collect();
        let remainder: Vec<&Question> = pool
            .iter()
            .copied()
            .filter(|q| !picked_ids.contains(&q.id.as_ref()))
            .collect();
        picked.extend(
            remainder
                .choose_multiple(&mut rng, n - picked.len())
                .map(|q| (*q).clone()),
        );
        picked
    };

    selected.shuffle(&mut rng);
    selected
}
