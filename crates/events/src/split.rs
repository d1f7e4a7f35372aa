//! Helpers that turn a total into exact shares.
//!
//! Both helpers guarantee the returned shares sum to `total` exactly, so the
//! resulting expense always passes `ExpenseEvent::validate`. Leftover minor
//! units are handed out deterministically, favouring lower user identities.

use std::collections::HashSet;

use splitledger_core::{InvalidEventReason, Money, UserId};

use crate::Share;

fn ensure_unique(users: impl IntoIterator<Item = UserId>) -> Result<(), InvalidEventReason> {
    let mut seen = HashSet::new();
    for user_id in users {
        if !seen.insert(user_id) {
            return Err(InvalidEventReason::DuplicateParticipant { user_id });
        }
    }
    Ok(())
}

/// Split `total` equally among `participants`.
///
/// When the total does not divide evenly, the first `remainder` participants
/// in ascending identity order each receive one extra minor unit. Shares are
/// returned in the order the participants were given.
pub fn split_equally(total: Money, participants: &[UserId]) -> Result<Vec<Share>, InvalidEventReason> {
    if !total.is_positive() {
        return Err(InvalidEventReason::NonPositiveAmount);
    }
    if participants.is_empty() {
        return Err(InvalidEventReason::NoShares);
    }
    ensure_unique(participants.iter().copied())?;

    let count = participants.len() as i64;
    let base = total.minor() / count;
    let remainder = (total.minor() % count) as usize;

    let mut by_identity: Vec<UserId> = participants.to_vec();
    by_identity.sort();
    let extra: HashSet<UserId> = by_identity.into_iter().take(remainder).collect();

    Ok(participants
        .iter()
        .map(|&user_id| {
            let bump = if extra.contains(&user_id) { 1 } else { 0 };
            Share::new(user_id, Money::from_minor(base + bump))
        })
        .collect())
}

/// Split `total` proportionally to integer weights.
///
/// Each share is floored first; the leftover minor units go to the largest
/// fractional remainders (ties to the lower identity).
pub fn split_by_weights(
    total: Money,
    weights: &[(UserId, i64)],
) -> Result<Vec<Share>, InvalidEventReason> {
    if !total.is_positive() {
        return Err(InvalidEventReason::NonPositiveAmount);
    }
    if weights.is_empty() {
        return Err(InvalidEventReason::NoShares);
    }
    if let Some(&(user_id, _)) = weights.iter().find(|(_, w)| *w <= 0) {
        return Err(InvalidEventReason::InvalidWeight { user_id });
    }
    ensure_unique(weights.iter().map(|(u, _)| *u))?;

    let total_weight: i128 = weights.iter().map(|(_, w)| *w as i128).sum();
    let amount = total.wide();

    let mut floors: Vec<i128> = Vec::with_capacity(weights.len());
    let mut order: Vec<(i128, UserId, usize)> = Vec::with_capacity(weights.len());
    for (idx, &(user_id, weight)) in weights.iter().enumerate() {
        let scaled = amount * weight as i128;
        floors.push(scaled / total_weight);
        order.push((scaled % total_weight, user_id, idx));
    }

    let allocated: i128 = floors.iter().sum();
    let leftover = (amount - allocated) as usize;

    order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, _, idx) in order.iter().take(leftover) {
        floors[idx] += 1;
    }

    // Every floor is at most `total`, so narrowing cannot fail.
    Ok(weights
        .iter()
        .zip(floors)
        .map(|(&(user_id, _), minor)| Share::new(user_id, Money::from_minor(minor as i64)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    fn amounts(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.minor()).collect()
    }

    #[test]
    fn equal_split_divides_evenly() {
        let shares = split_equally(Money::from_minor(90), &[user(1), user(2), user(3)]).unwrap();
        assert_eq!(amounts(&shares), vec![30, 30, 30]);
    }

    #[test]
    fn equal_split_gives_remainder_to_lowest_identities() {
        // Input order deliberately differs from identity order.
        let shares = split_equally(Money::from_minor(100), &[user(3), user(1), user(2)]).unwrap();
        assert_eq!(shares[0].user_id, user(3));
        assert_eq!(amounts(&shares), vec![33, 34, 33]);
    }

    #[test]
    fn equal_split_rejects_bad_input() {
        assert_eq!(
            split_equally(Money::from_minor(10), &[]),
            Err(InvalidEventReason::NoShares)
        );
        assert_eq!(
            split_equally(Money::ZERO, &[user(1)]),
            Err(InvalidEventReason::NonPositiveAmount)
        );
        assert_eq!(
            split_equally(Money::from_minor(10), &[user(1), user(1)]),
            Err(InvalidEventReason::DuplicateParticipant { user_id: user(1) })
        );
    }

    #[test]
    fn weighted_split_is_proportional() {
        let shares =
            split_by_weights(Money::from_minor(100), &[(user(1), 1), (user(2), 3)]).unwrap();
        assert_eq!(amounts(&shares), vec![25, 75]);
    }

    #[test]
    fn weighted_split_distributes_leftover_by_remainder() {
        // 10 * 1/3 = 3.33, 10 * 2/3 = 6.67 -> the larger fraction gets the unit.
        let shares =
            split_by_weights(Money::from_minor(10), &[(user(1), 1), (user(2), 2)]).unwrap();
        assert_eq!(amounts(&shares), vec![3, 7]);
    }

    #[test]
    fn weighted_split_rejects_non_positive_weight() {
        assert_eq!(
            split_by_weights(Money::from_minor(10), &[(user(1), 1), (user(2), 0)]),
            Err(InvalidEventReason::InvalidWeight { user_id: user(2) })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: equal shares always sum to the total and differ by at most one unit.
        #[test]
        fn equal_split_is_exact(total in 1i64..10_000_000i64, n in 1u128..12u128) {
            let users: Vec<UserId> = (1..=n).map(user).collect();
            let shares = split_equally(Money::from_minor(total), &users).unwrap();

            let sum: i64 = shares.iter().map(|s| s.amount.minor()).sum();
            prop_assert_eq!(sum, total);

            let min = shares.iter().map(|s| s.amount.minor()).min().unwrap();
            let max = shares.iter().map(|s| s.amount.minor()).max().unwrap();
            prop_assert!(max - min <= 1);
        }

        /// Property: weighted shares always sum to the total.
        #[test]
        fn weighted_split_is_exact(
            total in 1i64..10_000_000i64,
            weights in prop::collection::vec(1i64..1_000i64, 1..10)
        ) {
            let pairs: Vec<(UserId, i64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (user(i as u128 + 1), *w))
                .collect();
            let shares = split_by_weights(Money::from_minor(total), &pairs).unwrap();

            let sum: i64 = shares.iter().map(|s| s.amount.minor()).sum();
            prop_assert_eq!(sum, total);
            prop_assert!(shares.iter().all(|s| !s.amount.is_negative()));
        }
    }
}
