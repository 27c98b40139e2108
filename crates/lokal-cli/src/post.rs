//! `post`: compose and submit a new listing.

use std::path::PathBuf;

use clap::Args;
use futures::future::join_all;
use lokal_client::{ClientError, ListingForm};
use lokal_compose::{apply_location, generate_preview, ExistingAsset, MediaStaging, Preview, StagedImage};
use lokal_core::LocalFile;

use crate::browse::locate;
use crate::Context;

#[derive(Debug, Clone, Args)]
pub struct PostArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Asking price; omit for "contact for price"
    #[arg(long)]
    pub price: Option<String>,
    /// Category id
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub condition: Option<String>,
    #[arg(long)]
    pub property_type: Option<String>,
    #[arg(long)]
    pub vehicle_type: Option<String>,
    /// Province slug; defaults to the last location browsed
    #[arg(long)]
    pub province: Option<String>,
    /// Municipality slug; defaults to the last location browsed
    #[arg(long)]
    pub municipality: Option<String>,
    /// Show the listing in every municipality of the province
    #[arg(long)]
    pub province_wide: bool,
    /// Id of a previously uploaded image to reuse (repeatable)
    #[arg(long = "reuse")]
    pub reuse: Vec<i64>,
    /// Local image file to upload (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
    /// Print the composed listing without submitting it
    #[arg(long)]
    pub dry_run: bool,
}

fn stage(args: &PostArgs) -> anyhow::Result<MediaStaging> {
    let mut staging = MediaStaging::new();
    for id in &args.reuse {
        staging.add_reused(ExistingAsset {
            id: *id,
            preview_url: String::new(),
            title: String::new(),
        })?;
    }
    for path in &args.images {
        staging.add_new(LocalFile::from_path(path))?;
    }
    Ok(staging)
}

/// Generates all pending previews concurrently and attaches the results.
async fn attach_previews(staging: &mut MediaStaging) {
    let pending = staging.pending_previews();
    let results = join_all(pending.iter().map(|(ticket, file)| async move {
        (*ticket, generate_preview(file).await)
    }))
    .await;
    for (ticket, result) in results {
        if let Err(e) = staging.attach_preview(ticket, result) {
            tracing::debug!(error = %e, "preview for an unstaged file");
        }
    }
}

fn print_staged(staging: &MediaStaging) {
    for (pos, item) in staging.iter().enumerate() {
        match item {
            StagedImage::Reused(asset) => println!("  {:>2}. reuse asset {}", pos + 1, asset.id),
            StagedImage::New { file, preview, .. } => {
                let note = match preview {
                    Preview::Ready(url) => format!("{} byte preview", url.len()),
                    Preview::Pending => "preview pending".to_owned(),
                    Preview::Unavailable => "no preview".to_owned(),
                };
                println!("  {:>2}. upload {} ({note})", pos + 1, file.path().display());
            }
        }
    }
}

/// Composes a listing from arguments, the resolved location, and staged
/// images, then submits it.
///
/// # Errors
///
/// Returns an error if no province is given or remembered, staging rejects
/// an image, or the service rejects the submission.
pub(crate) async fn run_post(ctx: &Context, args: PostArgs) -> anyhow::Result<()> {
    let remembered = ctx.last_location.recall().await;
    let (province, municipality) = match (&args.province, remembered) {
        (Some(p), _) => (p.clone(), args.municipality.clone()),
        (None, Some(last)) => (
            last.province_slug,
            args.municipality.clone().or(last.municipality_slug),
        ),
        (None, None) => anyhow::bail!("no --province given and no location remembered yet"),
    };

    let mut staging = stage(&args)?;
    let location = locate(ctx, &province, municipality.as_deref()).await?;
    if location.province_record().is_none() {
        anyhow::bail!(
            "province '{}' is not in the directory; cannot post there",
            location.display_province()
        );
    }

    let mut form = ListingForm {
        title: args.title,
        description: args.description,
        price: args.price,
        category: args.category,
        condition: args.condition,
        property_type: args.property_type,
        vehicle_type: args.vehicle_type,
        is_province_wide: args.province_wide,
        ..ListingForm::default()
    };
    apply_location(&mut form, &location);

    if args.dry_run {
        attach_previews(&mut staging).await;
        println!("listing for {}:", location.display_province());
        for (name, value) in form.fields() {
            println!("  {name:<18}{value}");
        }
        println!("{} image(s), {} slot(s) left", staging.len(), staging.remaining());
        print_staged(&staging);
        return Ok(());
    }

    let payload = staging.to_submission_payload();
    match ctx
        .client
        .create_listing(&form, &payload.reused_ids, &payload.new_files)
        .await
    {
        Ok(created) => {
            println!(
                "created listing {} \"{}\" with {} image(s)",
                created.id,
                created.title,
                created.images.len()
            );
            Ok(())
        }
        Err(ClientError::SubmissionRejected { fields }) => {
            eprintln!("listing rejected:");
            for (field, messages) in &fields {
                for message in messages {
                    eprintln!("  {field}: {message}");
                }
            }
            anyhow::bail!("service rejected the listing ({} field(s))", fields.len())
        }
        Err(e) => Err(e.into()),
    }
}
