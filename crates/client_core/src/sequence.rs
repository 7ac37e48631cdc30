/// Orders responses by the time their requests were issued.
///
/// Every request draws a number from [`SequenceGate::issue`]; a response is
/// applied only while its number is newer than everything already applied.
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: u64,
    last_applied: u64,
}

impl SequenceGate {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Accepts `seq` if it is newer than the last applied response.
    pub fn admit(&mut self, seq: u64) -> bool {
        if seq <= self.last_applied {
            return false;
        }
        self.last_applied = seq;
        true
    }

    /// Marks everything issued up to `seq` as superseded.
    pub fn advance_to(&mut self, seq: u64) {
        self.last_applied = self.last_applied.max(seq);
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceGate;

    #[test]
    fn late_responses_are_rejected() {
        let mut gate = SequenceGate::default();
        let first = gate.issue();
        let second = gate.issue();

        assert!(gate.admit(second));
        assert!(!gate.admit(first));
        assert_eq!(gate.last_applied(), second);
    }

    #[test]
    fn same_sequence_is_applied_once() {
        let mut gate = SequenceGate::default();
        let seq = gate.issue();
        assert!(gate.admit(seq));
        assert!(!gate.admit(seq));
    }

    #[test]
    fn advance_never_moves_backwards() {
        let mut gate = SequenceGate::default();
        let older = gate.issue();
        let newer = gate.issue();
        assert!(gate.admit(newer));

        gate.advance_to(older);
        assert_eq!(gate.last_applied(), newer);

        let latest = gate.issue();
        gate.advance_to(latest);
        assert!(!gate.admit(newer));
    }
}
