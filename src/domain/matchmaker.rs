//! Partner selection.
//!
//! The policy is deterministic first-eligible: the waiting pool is scanned in
//! insertion order and the first compatible entry wins. Changing this changes
//! observable pairing order.

use super::{Identity, PairingTable, WaitingPool};

/// Picks a partner for `seeker` from `pool`.
///
/// Returns `None` when `seeker` is already paired or no waiting entry is
/// eligible. An entry is eligible if it is a different connection, has a
/// different email, and is not paired itself.
#[must_use]
pub fn select_partner<'a>(
    pool: &'a WaitingPool,
    pairings: &PairingTable,
    seeker: &Identity,
) -> Option<&'a Identity> {
    if pairings.is_paired(seeker.connection_id) {
        return None;
    }
    pool.iter().find(|candidate| {
        candidate.connection_id != seeker.connection_id
            && candidate.email != seeker.email
            && !pairings.is_paired(candidate.connection_id)
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;

    fn ident(email: &str) -> Identity {
        Identity::new(ConnectionId::new(), email)
    }

    #[test]
    fn picks_first_eligible_in_insertion_order() {
        let mut pool = WaitingPool::new();
        let a = ident("a@x");
        let b = ident("b@x");
        let c = ident("c@x");
        pool.push_back(a.clone());
        pool.push_back(b.clone());
        pool.push_back(c.clone());

        let picked = select_partner(&pool, &PairingTable::new(), &c);
        assert_eq!(picked.map(|i| i.connection_id), Some(a.connection_id));
    }

    #[test]
    fn skips_self_and_same_email() {
        let mut pool = WaitingPool::new();
        let a = ident("a@x");
        let a_again = ident("a@x");
        let b = ident("b@x");
        pool.push_back(a.clone());
        pool.push_back(a_again.clone());
        pool.push_back(b.clone());

        let picked = select_partner(&pool, &PairingTable::new(), &a_again);
        assert_eq!(picked.map(|i| i.connection_id), Some(b.connection_id));
    }

    #[test]
    fn none_when_only_same_email_waits() {
        let mut pool = WaitingPool::new();
        let a = ident("a@x");
        let c = ident("a@x");
        pool.push_back(a.clone());
        pool.push_back(c.clone());

        assert!(select_partner(&pool, &PairingTable::new(), &a).is_none());
        assert!(select_partner(&pool, &PairingTable::new(), &c).is_none());
    }

    #[test]
    fn paired_seeker_gets_nothing() {
        let mut pool = WaitingPool::new();
        let seeker = ident("s@x");
        pool.push_back(ident("w@x"));

        let mut pairings = PairingTable::new();
        let Ok(_) = pairings.insert(seeker.clone(), ident("p@x")) else {
            panic!("pairing");
        };
        assert!(select_partner(&pool, &pairings, &seeker).is_none());
    }

    #[test]
    fn skips_candidates_that_are_paired() {
        let mut pool = WaitingPool::new();
        let stale = ident("stale@x");
        let fresh = ident("fresh@x");
        pool.push_back(stale.clone());
        pool.push_back(fresh.clone());

        let mut pairings = PairingTable::new();
        let Ok(_) = pairings.insert(stale, ident("other@x")) else {
            panic!("pairing");
        };
        let picked = select_partner(&pool, &pairings, &ident("seeker@x"));
        assert_eq!(picked.map(|i| i.connection_id), Some(fresh.connection_id));
    }

    #[test]
    fn seeker_need_not_be_waiting() {
        let mut pool = WaitingPool::new();
        let w = ident("w@x");
        pool.push_back(w.clone());
        let picked = select_partner(&pool, &PairingTable::new(), &ident("s@x"));
        assert_eq!(picked.map(|i| i.connection_id), Some(w.connection_id));
    }
}
