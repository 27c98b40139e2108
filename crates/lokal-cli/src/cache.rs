use crate::Context;

/// Drops the cached directory, and with `all` the remembered location too.
///
/// # Errors
///
/// Returns an error if the cache store cannot remove its entries.
pub(crate) async fn run_cache_clear(ctx: &Context, all: bool) -> anyhow::Result<()> {
    ctx.resolver.cache().invalidate().await?;
    if all {
        ctx.last_location.forget().await?;
    }
    println!(
        "cleared directory cache{}",
        if all { " and last location" } else { "" }
    );
    Ok(())
}
