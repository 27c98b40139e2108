//! Read-only commands: `resolve`, `listings`, `announcements`.

use std::sync::Arc;

use clap::Args;
use lokal_compose::{
    build_announcement_query, build_listing_query, AnnouncementFilters, FilterState,
};
use lokal_location::{LastLocation, PageSession, Resolution, ResolvedLocation};

use crate::Context;

#[derive(Debug, Clone, Default, Args)]
pub struct ListingArgs {
    /// Free-text search over title and description
    #[arg(long, default_value = "")]
    pub search: String,
    /// Category id
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub property_type: String,
    #[arg(long, default_value = "")]
    pub vehicle_type: String,
    #[arg(long, default_value = "")]
    pub min_price: String,
    #[arg(long, default_value = "")]
    pub max_price: String,
    /// Barangay name; only applied with a municipality
    #[arg(long, default_value = "")]
    pub barangay: String,
    /// Ignore the municipality and show everything in the province
    #[arg(long)]
    pub province_wide: bool,
    /// Sort order (e.g. -created_at, price)
    #[arg(long, default_value = "")]
    pub ordering: String,
    #[arg(long)]
    pub page: Option<u32>,
}

impl From<&ListingArgs> for FilterState {
    fn from(args: &ListingArgs) -> Self {
        FilterState {
            search: args.search.clone(),
            category: args.category.clone(),
            property_type: args.property_type.clone(),
            vehicle_type: args.vehicle_type.clone(),
            min_price: args.min_price.clone(),
            max_price: args.max_price.clone(),
            barangay: args.barangay.clone(),
            province_wide: args.province_wide,
            ordering: args.ordering.clone(),
            page: args.page,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct AnnouncementArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    /// Priority (e.g. urgent, normal)
    #[arg(long, default_value = "")]
    pub priority: String,
    /// Announcement type (e.g. alert, event)
    #[arg(long = "type", default_value = "")]
    pub announcement_type: String,
    #[arg(long)]
    pub province_wide: bool,
    #[arg(long)]
    pub include_expired: bool,
    #[arg(long)]
    pub page: Option<u32>,
}

impl From<&AnnouncementArgs> for AnnouncementFilters {
    fn from(args: &AnnouncementArgs) -> Self {
        AnnouncementFilters {
            search: args.search.clone(),
            priority: args.priority.clone(),
            announcement_type: args.announcement_type.clone(),
            province_wide: args.province_wide,
            include_expired: args.include_expired,
            page: args.page,
        }
    }
}

/// Resolves a location the way a page would, remembering it when the
/// province is known.
pub(crate) async fn locate(
    ctx: &Context,
    province: &str,
    municipality: Option<&str>,
) -> anyhow::Result<Arc<ResolvedLocation>> {
    let page = PageSession::new(ctx.resolver.clone());
    let location = page
        .navigate(province, municipality)
        .await
        .ok_or_else(|| anyhow::anyhow!("location lookup for '{province}' was abandoned"))?;
    remember(ctx, &location, province, municipality).await;
    Ok(location)
}

async fn remember(
    ctx: &Context,
    location: &ResolvedLocation,
    province: &str,
    municipality: Option<&str>,
) {
    if !location.province.is_resolved() {
        return;
    }
    let last = LastLocation::new(province, municipality);
    if let Err(e) = ctx.last_location.remember(&last).await {
        tracing::warn!(error = %e, "could not remember last location");
    }
}

fn describe(level: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::Resolved(record) => format!(
            "{level:<14}{:<28}id={:<8}geocode={}",
            record.name,
            record.id,
            record.geocode().unwrap_or("\u{2014}")
        ),
        Resolution::Fallback { display_name } => {
            format!("{level:<14}{display_name:<28}(not in directory)")
        }
    }
}

/// Prints what a set of slugs resolves to.
///
/// # Errors
///
/// Returns an error only if the lookup is abandoned; directory failures
/// print fallback names.
pub(crate) async fn run_resolve(
    ctx: &Context,
    province: &str,
    municipality: Option<&str>,
    barangay: Option<&str>,
) -> anyhow::Result<()> {
    let location = match (municipality, barangay) {
        (Some(m), Some(b)) => {
            let location = ctx.resolver.resolve_with_barangay(province, m, b).await;
            remember(ctx, &location, province, municipality).await;
            location
        }
        _ => locate(ctx, province, municipality).await?,
    };

    println!("{}", describe("PROVINCE", &location.province));
    if let Some(m) = &location.municipality {
        println!("{}", describe("MUNICIPALITY", m));
    }
    if let Some(b) = &location.barangay {
        println!("{}", describe("BARANGAY", b));
    }
    if location.provinces.is_empty() {
        println!("directory unavailable; showing names derived from the URL");
    } else if location.municipality.is_none() && !location.municipalities.is_empty() {
        println!();
        println!("{} municipalities:", location.municipalities.len());
        for m in &location.municipalities {
            println!("  {:<32}{}", m.slug, m.name);
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_owned()
    }
}

/// Lists listings for a location.
///
/// # Errors
///
/// Returns an error if the listing request fails.
pub(crate) async fn run_listings(
    ctx: &Context,
    province: &str,
    municipality: Option<&str>,
    args: &ListingArgs,
) -> anyhow::Result<()> {
    let location = locate(ctx, province, municipality).await?;
    let params = build_listing_query(&location, &FilterState::from(args));
    tracing::debug!(?params, "listing query");

    let page = ctx.client.list_listings(&params).await?;
    if page.results.is_empty() {
        println!("no listings in {}", location.display_province());
        return Ok(());
    }

    println!("{:<8}{:<16}{:<20}TITLE", "ID", "PRICE", "MUNICIPALITY");
    for listing in &page.results {
        println!(
            "{:<8}{:<16}{:<20}{}",
            listing.id,
            listing.price.as_deref().unwrap_or("\u{2014}"),
            truncate(listing.municipality_name.as_deref().unwrap_or("\u{2014}"), 18),
            truncate(&listing.title, 50)
        );
    }
    println!(
        "{} of {} listing(s){}",
        page.results.len(),
        page.count,
        if page.has_next { "; more with --page" } else { "" }
    );
    Ok(())
}

/// Lists announcements for a location.
///
/// # Errors
///
/// Returns an error if the announcement request fails.
pub(crate) async fn run_announcements(
    ctx: &Context,
    province: &str,
    municipality: Option<&str>,
    args: &AnnouncementArgs,
) -> anyhow::Result<()> {
    let location = locate(ctx, province, municipality).await?;
    let params = build_announcement_query(&location, &AnnouncementFilters::from(args));
    tracing::debug!(?params, "announcement query");

    let page = ctx.client.list_announcements(&params).await?;
    if page.results.is_empty() {
        println!("no announcements in {}", location.display_province());
        return Ok(());
    }

    println!("{:<8}{:<10}{:<10}TITLE", "ID", "PRIORITY", "SCOPE");
    for item in &page.results {
        let scope = if item.is_province_wide { "province" } else { "local" };
        println!(
            "{:<8}{:<10}{:<10}{}",
            item.id,
            item.priority.as_deref().unwrap_or("\u{2014}"),
            scope,
            truncate(&item.title, 60)
        );
    }
    Ok(())
}
