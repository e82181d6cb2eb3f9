use anyhow::Result;

/// The tracker is single threaded: input, ticks and report completions interleave on one thread.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
