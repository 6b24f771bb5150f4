use vergen_gitcl::{Emitter, GitclBuilder};

// emits VERGEN_GIT_* for the /health version
fn main() -> anyhow::Result<()> {
    let gitcl = GitclBuilder::default()
        .branch(true)
        .sha(true)
        .dirty(true)
        .build()?;
    Emitter::default().add_instructions(&gitcl)?.emit()?;

    Ok(())
}
