use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::crossword::{Crossword, SlotId, WordId};
use crate::domains::Domains;

/// A directed constraint between two neighboring slots: every word left in `x` needs a word in
/// `y` that agrees with it where they cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub x: SlotId,
    pub y: SlotId,
}

/// Data structure used in `ac3` to track which arcs we still need to visit. Arcs come out in the
/// order they went in, and an arc that's already waiting isn't queued a second time.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<Arc>,
    queued: HashSet<Arc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
        where
            Items: IntoIterator<Item=Arc>
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Results from a call to `ac3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs were revised.
    pub revisions: u64,
    /// How many words were removed from domains in total.
    pub eliminations: u64,
}

/// `ac3` emptied the domain of `slot_id`, so the puzzle can't be filled. The counts cover the
/// pruning done before that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub slot_id: SlotId,
    pub revisions: u64,
    pub eliminations: u64,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Every ordered pair of neighboring slots.
pub fn all_arcs(crossword: &Crossword) -> Vec<Arc> {
    crossword.variables()
        .flat_map(|x| crossword.neighbors(x).iter().map(move |&y| Arc { x, y }))
        .collect()
}

/// Remove every word from `arc.x`'s domain that has no supporting word in `arc.y`'s domain.
/// Returns true if anything at all was removed. A word too short to reach the shared cell neither
/// gives nor gets support.
pub fn revise(crossword: &Crossword, domains: &mut Domains, arc: Arc) -> bool {
    let Arc { x, y } = arc;

    // Slots that don't cross can't rule anything out.
    let overlap = match crossword.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    // Which letters can `y` still put in the shared cell? A word in `x` is supported exactly when
    // its own letter in that cell is one of these.
    let supported_chars: HashSet<char> = domains.iter(y)
        .filter_map(|word_id| crossword.word(word_id).chars.get(overlap.second).copied())
        .collect();

    let unsupported: Vec<WordId> = domains.iter(x)
        .filter(|&word_id| {
            crossword.word(word_id).chars.get(overlap.first)
                .map_or(true, |letter| !supported_chars.contains(letter))
        })
        .collect();

    let mut revised = false;
    for word_id in unsupported {
        revised |= domains.remove(x, word_id);
    }

    revised
}

/// Make every arc consistent, starting from `arcs` or, if that's `None`, from every arc in the
/// grid. Fails as soon as any slot's domain is emptied.
pub fn ac3(crossword: &Crossword, domains: &mut Domains, arcs: Option<Vec<Arc>>) -> ArcConsistencyResult {
    let arcs = arcs.unwrap_or_else(|| all_arcs(crossword));
    let mut queue = ConsistencyQueue::with_initial_queue(arcs);

    let mut revisions = 0;
    let mut eliminations = 0;

    while let Some(arc) = queue.pop_front() {
        let before = domains.len(arc.x);

        if !revise(crossword, domains, arc) {
            continue;
        }

        revisions += 1;
        eliminations += (before - domains.len(arc.x)) as u64;

        if domains.is_empty(arc.x) {
            debug!("Arc consistency emptied slot {} after {} revisions", arc.x, revisions);
            return Err(ArcConsistencyFailure { slot_id: arc.x, revisions, eliminations });
        }

        // `x` shrank, so arcs pointing into it may have lost their support.
        for &z in crossword.neighbors(arc.x) {
            if z != arc.y {
                queue.enqueue(Arc { x: z, y: arc.x });
            }
        }
    }

    debug!("Arc consistency reached after {} revisions, {} words eliminated", revisions, eliminations);

    Ok(ArcConsistencySuccess { revisions, eliminations })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(structure: &str, words: &str) -> (Crossword, Domains) {
        let crossword = Crossword::new(structure, words).unwrap();
        let mut domains = Domains::initialize(&crossword);
        domains.enforce_node_consistency(&crossword);
        (crossword, domains)
    }

    fn domain_strings(crossword: &Crossword, domains: &Domains, slot_id: SlotId) -> Vec<String> {
        domains.iter(slot_id).map(|word_id| crossword.word(word_id).string.clone()).collect()
    }

    #[test]
    fn test_revise_reports_earlier_removals() {
        // Only the first word in `x`'s domain is unsupported. The change flag has to survive the
        // later, supported words.
        let (crossword, mut domains) = prepared("___\n_##\n_##", "ant\nbee\nbat");

        // Down slot keeps only words starting with 'B'.
        domains.remove(1, 0);

        assert!(revise(&crossword, &mut domains, Arc { x: 0, y: 1 }));
        assert_eq!(domain_strings(&crossword, &domains, 0), vec!["BAT", "BEE"]);
        assert!(!revise(&crossword, &mut domains, Arc { x: 0, y: 1 }));
    }

    #[test]
    fn test_revise_ignores_slots_that_dont_cross() {
        // ___
        // ###
        // ___
        let (crossword, mut domains) = prepared("___\n###\n___", "abc\nxyz");
        let before = domains.clone();

        assert!(!revise(&crossword, &mut domains, Arc { x: 0, y: 1 }));
        assert_eq!(domains, before);
    }

    #[test]
    fn test_ac3_leaves_supported_domains() {
        // __
        // #_
        // #_
        let (crossword, mut domains) = prepared("__\n#_\n#_", "at\non\ngo\ntoe\nnib\nxyz");
        let result = ac3(&crossword, &mut domains, None).unwrap();

        // Nothing down starts with 'O', and nothing across ends in 'X'.
        assert_eq!(domain_strings(&crossword, &domains, 0), vec!["AT", "ON"]);
        assert_eq!(domain_strings(&crossword, &domains, 1), vec!["NIB", "TOE"]);
        assert_eq!(result.eliminations, 2);
    }

    #[test]
    fn test_ac3_propagates_through_chains() {
        // ___
        // ##_
        // #__
        //
        // The short across slot only allows an 'X' at the bottom of the down slot, which in turn
        // decides the last letter of the top across slot.
        let (crossword, mut domains) = prepared("___\n##_\n#__", "ox\nbox\ntan\ncab\nsot");

        assert!(ac3(&crossword, &mut domains, None).is_ok());

        assert_eq!(domain_strings(&crossword, &domains, 0), vec!["CAB"]);
        assert_eq!(domain_strings(&crossword, &domains, 1), vec!["OX"]);
        assert_eq!(domain_strings(&crossword, &domains, 2), vec!["BOX"]);

        for arc in all_arcs(&crossword) {
            let overlap = crossword.overlap(arc.x, arc.y).unwrap();
            for word_id in domains.iter(arc.x) {
                let letter = crossword.word(word_id).char_at(overlap.first);
                assert!(domains.iter(arc.y).any(|other| crossword.word(other).char_at(overlap.second) == letter));
            }
        }
    }

    #[test]
    fn test_ac3_fails_on_empty_domain() {
        let (crossword, mut domains) = prepared("___\n_##\n_##", "cat\ndog");
        let mut starved = domains.clone();

        // Pairing up first letters is impossible once each slot only has a different word.
        domains.remove(0, 1);
        domains.remove(1, 0);
        assert_eq!(
            ac3(&crossword, &mut domains, None),
            Err(ArcConsistencyFailure { slot_id: 0, revisions: 1, eliminations: 1 }),
        );

        // Starting from just one arc only touches the slots it reaches.
        starved.remove(1, 0);
        starved.remove(1, 1);
        let result = ac3(&crossword, &mut starved, Some(vec![Arc { x: 0, y: 1 }]));
        assert_eq!(result.map_err(|failure| failure.slot_id), Err(0));
    }

    #[test]
    fn test_ac3_before_node_consistency_skips_short_words() {
        // __
        // #_
        // #_
        //
        // Nothing has been filtered by length yet, so "A" sits in the down slot's domain even
        // though it has no letter at the crossing.
        let crossword = Crossword::new("__\n#_\n#_", "a\nat\ntoe").unwrap();
        let mut domains = Domains::initialize(&crossword);

        assert!(ac3(&crossword, &mut domains, None).is_ok());

        assert_eq!(domain_strings(&crossword, &domains, 0), vec!["AT"]);
        assert_eq!(domain_strings(&crossword, &domains, 1), vec!["TOE"]);
    }

    #[test]
    fn test_ac3_without_crossings_is_trivially_consistent() {
        let (crossword, mut domains) = prepared("____", "abc");

        assert_eq!(
            ac3(&crossword, &mut domains, None),
            Ok(ArcConsistencySuccess { revisions: 0, eliminations: 0 }),
        );
        assert!(domains.is_empty(0));
    }
}
