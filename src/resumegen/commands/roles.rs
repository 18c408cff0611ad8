use super::CmdResult;
use crate::error::Result;
use crate::source::RecordSource;

pub fn run<S: RecordSource>(source: &S) -> Result<CmdResult> {
    Ok(CmdResult::default().with_roles(source.roles()))
}
