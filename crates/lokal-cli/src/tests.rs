use clap::Parser;

use super::*;

#[test]
fn parses_resolve_with_municipality() {
    let cli = Cli::try_parse_from(["lokal", "resolve", "davao-del-norte", "city-of-tagum"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Resolve {
            province,
            municipality,
            barangay,
        } => {
            assert_eq!(province, "davao-del-norte");
            assert_eq!(municipality.as_deref(), Some("city-of-tagum"));
            assert_eq!(barangay, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn barangay_requires_municipality() {
    let result = Cli::try_parse_from(["lokal", "resolve", "siquijor", "--barangay", "poblacion"]);
    assert!(result.is_err());
}

#[test]
fn listing_filters_default_to_blank() {
    let cli = Cli::try_parse_from(["lokal", "listings", "siquijor"]).unwrap();
    let Commands::Listings { filters, .. } = cli.command else {
        panic!("expected listings command");
    };
    let state = lokal_compose::FilterState::from(&filters);
    assert_eq!(state, lokal_compose::FilterState::default());
}

#[test]
fn listing_filters_map_onto_filter_state() {
    let cli = Cli::try_parse_from([
        "lokal",
        "listings",
        "davao-del-norte",
        "all",
        "--category",
        "5",
        "--province-wide",
        "--page",
        "2",
    ])
    .unwrap();
    let Commands::Listings {
        municipality,
        filters,
        ..
    } = cli.command
    else {
        panic!("expected listings command");
    };
    assert_eq!(municipality.as_deref(), Some("all"));
    let state = lokal_compose::FilterState::from(&filters);
    assert_eq!(state.category, "5");
    assert!(state.province_wide);
    assert_eq!(state.page, Some(2));
}

#[test]
fn announcement_type_flag_is_named_type() {
    let cli = Cli::try_parse_from(["lokal", "announcements", "siquijor", "--type", "alert"]).unwrap();
    let Commands::Announcements { filters, .. } = cli.command else {
        panic!("expected announcements command");
    };
    assert_eq!(
        lokal_compose::AnnouncementFilters::from(&filters).announcement_type,
        "alert"
    );
}

#[test]
fn post_collects_repeated_images() {
    let cli = Cli::try_parse_from([
        "lokal", "post", "--title", "Bungalow", "--reuse", "3", "--reuse", "9", "--image",
        "a.jpg", "--image", "b.png", "--dry-run",
    ])
    .unwrap();
    let Commands::Post(args) = cli.command else {
        panic!("expected post command");
    };
    assert_eq!(args.reuse, vec![3, 9]);
    assert_eq!(args.images.len(), 2);
    assert!(args.dry_run);
    assert_eq!(args.province, None);
}

#[test]
fn parses_cache_clear_all() {
    let cli = Cli::try_parse_from(["lokal", "cache", "clear", "--all"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Cache {
            command: CacheCommands::Clear { all: true }
        }
    ));
}
