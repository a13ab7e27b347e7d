use crate::replay::fixture::{entries_for, MockFixture};
use crate::types::MockKind;

/// Number of entries recorded for `id` across exactly the given
/// `(context, kind)` pairs. Absent contexts and ids count as zero.
pub fn frame_count(id: &str, fixture: &MockFixture, kinds: &[MockKind], contexts: &[String]) -> usize {
    contexts
        .iter()
        .flat_map(|context| kinds.iter().map(move |&kind| (context, kind)))
        .filter_map(|(context, kind)| entries_for(fixture, context, kind, id))
        .map(<[_]>::len)
        .sum()
}
