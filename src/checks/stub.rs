//! Placeholder checker: registered and routed, never reports.

use super::{CheckError, Checker, CheckerId, Payload};
use crate::classify::ArtifactKind;
use crate::models::CheckerResult;

pub struct StubChecker {
    id: CheckerId,
    accepts: &'static [ArtifactKind],
}

impl StubChecker {
    pub fn new(id: CheckerId, accepts: &'static [ArtifactKind]) -> Self {
        StubChecker { id, accepts }
    }
}

impl Checker for StubChecker {
    fn id(&self) -> CheckerId {
        self.id
    }

    fn accepts(&self) -> &'static [ArtifactKind] {
        self.accepts
    }

    fn check(&self, _payload: Payload<'_>, _out: &mut CheckerResult) -> Result<(), CheckError> {
        Ok(())
    }
}
