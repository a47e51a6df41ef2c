use std::collections::BTreeMap;

use crate::error::ReconcileError;
use crate::types::{LogSide, ProbeAttempt, ProbeCapture, ProtocolNumber};

/// Both sides' records for one protocol number. At least one side is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinedPair<'a> {
    pub attempt: Option<&'a ProbeAttempt>,
    pub capture: Option<&'a ProbeCapture>,
}

impl JoinedPair<'_> {
    fn empty() -> Self {
        Self {
            attempt: None,
            capture: None,
        }
    }
}

/// Full outer join on protocol number.
///
/// The returned map's keys are exactly the union of both sides' protocol
/// numbers. A protocol number repeated within one side is rejected rather
/// than resolved.
pub fn outer_join<'a>(
    attempts: &'a [ProbeAttempt],
    captures: &'a [ProbeCapture],
) -> Result<BTreeMap<ProtocolNumber, JoinedPair<'a>>, ReconcileError> {
    let mut joined: BTreeMap<ProtocolNumber, JoinedPair<'a>> = BTreeMap::new();

    for a in attempts {
        let slot = joined
            .entry(a.protocol_number)
            .or_insert_with(JoinedPair::empty);
        if slot.attempt.is_some() {
            return Err(ReconcileError::DuplicateKey {
                side: LogSide::Sender,
                protocol_number: a.protocol_number,
            });
        }
        slot.attempt = Some(a);
    }

    for c in captures {
        let slot = joined
            .entry(c.protocol_number)
            .or_insert_with(JoinedPair::empty);
        if slot.capture.is_some() {
            return Err(ReconcileError::DuplicateKey {
                side: LogSide::Receiver,
                protocol_number: c.protocol_number,
            });
        }
        slot.capture = Some(c);
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(pn: u8, send: Option<u64>) -> ProbeAttempt {
        ProbeAttempt {
            protocol_number: pn,
            send_time_micros: send,
            columns: Vec::new(),
        }
    }

    fn capture(pn: u8, recv: Option<u64>) -> ProbeCapture {
        ProbeCapture {
            protocol_number: pn,
            recv_time_micros: recv,
            source_address: None,
            columns: Vec::new(),
        }
    }

    #[test]
    fn keys_are_union_of_both_sides() {
        let a = [attempt(6, Some(1)), attempt(17, Some(2))];
        let c = [capture(6, Some(3)), capture(253, None)];
        let j = outer_join(&a, &c).unwrap();

        assert_eq!(j.keys().copied().collect::<Vec<_>>(), vec![6, 17, 253]);
        assert!(j[&6].attempt.is_some() && j[&6].capture.is_some());
        assert!(j[&17].attempt.is_some() && j[&17].capture.is_none());
        assert!(j[&253].attempt.is_none() && j[&253].capture.is_some());
    }

    #[test]
    fn duplicate_attempt_rejected() {
        let a = [attempt(6, Some(100)), attempt(6, Some(200))];
        let err = outer_join(&a, &[]).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::DuplicateKey {
                side: LogSide::Sender,
                protocol_number: 6
            }
        );
    }

    #[test]
    fn duplicate_capture_rejected() {
        let c = [capture(1, None), capture(2, None), capture(1, Some(5))];
        let err = outer_join(&[], &c).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::DuplicateKey {
                side: LogSide::Receiver,
                protocol_number: 1
            }
        );
    }

    #[test]
    fn same_key_on_both_sides_is_not_a_duplicate() {
        let a = [attempt(6, None)];
        let c = [capture(6, None)];
        let j = outer_join(&a, &c).unwrap();
        assert_eq!(j.len(), 1);
    }

    #[test]
    fn both_empty() {
        assert!(outer_join(&[], &[]).unwrap().is_empty());
    }
}
